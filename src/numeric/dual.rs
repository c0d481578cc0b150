//! Forward-mode dual numbers and the `gradient` entry point.
//!
//! A [`Dual`] pairs a value with its tangent vector `∂value/∂θ`. Seeding one
//! tangent per coordinate of θ and running a [`Real`]-generic kernel yields
//! the kernel's value and its full gradient in a single pass. Parameter
//! vectors in this crate are short (three entries per mixture component), so
//! dense forward mode is the right trade: no tape, no graph, and gradient and
//! value can never drift apart when a density formula changes.
//!
//! An empty tangent stands for an identically-zero derivative, which keeps
//! constants lifted through [`Real::constant`] allocation-free.
use std::ops::{Add, Div, Mul, Neg, Sub};

use ndarray::Array1;

use crate::numeric::real::Real;

const FRAC_2_SQRT_PI: f64 = std::f64::consts::FRAC_2_SQRT_PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Dual {
    /// Primal value.
    pub re: f64,
    /// Tangent vector; empty means zero.
    pub eps: Array1<f64>,
}

impl Dual {
    /// Coordinate `index` of a `dim`-dimensional input.
    pub fn variable(value: f64, index: usize, dim: usize) -> Self {
        let mut eps = Array1::zeros(dim);
        eps[index] = 1.0;
        Self { re: value, eps }
    }

    /// Dense tangent, materializing zeros for constants.
    pub fn tangent(&self, dim: usize) -> Array1<f64> {
        if self.eps.is_empty() { Array1::zeros(dim) } else { self.eps.clone() }
    }

    /// Apply a scalar function with value `re` and derivative `d` at `self.re`.
    #[inline]
    fn chain(self, re: f64, d: f64) -> Self {
        Self { re, eps: self.eps.mapv_into(|e| e * d) }
    }
}

/// `ca * a + cb * b` for tangents, treating empty arrays as zero.
fn combine(a: Array1<f64>, ca: f64, b: Array1<f64>, cb: f64) -> Array1<f64> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => a,
        (true, false) => b.mapv_into(|v| v * cb),
        (false, true) => a.mapv_into(|v| v * ca),
        (false, false) => {
            let mut out = a.mapv_into(|v| v * ca);
            out.scaled_add(cb, &b);
            out
        }
    }
}

impl Add for Dual {
    type Output = Dual;
    fn add(self, rhs: Dual) -> Dual {
        Dual { re: self.re + rhs.re, eps: combine(self.eps, 1.0, rhs.eps, 1.0) }
    }
}

impl Sub for Dual {
    type Output = Dual;
    fn sub(self, rhs: Dual) -> Dual {
        Dual { re: self.re - rhs.re, eps: combine(self.eps, 1.0, rhs.eps, -1.0) }
    }
}

impl Mul for Dual {
    type Output = Dual;
    fn mul(self, rhs: Dual) -> Dual {
        let (a, b) = (self.re, rhs.re);
        Dual { re: a * b, eps: combine(self.eps, b, rhs.eps, a) }
    }
}

impl Div for Dual {
    type Output = Dual;
    fn div(self, rhs: Dual) -> Dual {
        let (a, b) = (self.re, rhs.re);
        Dual { re: a / b, eps: combine(self.eps, 1.0 / b, rhs.eps, -a / (b * b)) }
    }
}

impl Neg for Dual {
    type Output = Dual;
    fn neg(self) -> Dual {
        let re = -self.re;
        self.chain(re, -1.0)
    }
}

impl Add<f64> for Dual {
    type Output = Dual;
    fn add(self, rhs: f64) -> Dual {
        Dual { re: self.re + rhs, eps: self.eps }
    }
}

impl Sub<f64> for Dual {
    type Output = Dual;
    fn sub(self, rhs: f64) -> Dual {
        Dual { re: self.re - rhs, eps: self.eps }
    }
}

impl Mul<f64> for Dual {
    type Output = Dual;
    fn mul(self, rhs: f64) -> Dual {
        let re = self.re * rhs;
        self.chain(re, rhs)
    }
}

impl Div<f64> for Dual {
    type Output = Dual;
    fn div(self, rhs: f64) -> Dual {
        let re = self.re / rhs;
        self.chain(re, 1.0 / rhs)
    }
}

impl Real for Dual {
    fn constant(value: f64) -> Self {
        Dual { re: value, eps: Array1::zeros(0) }
    }

    fn value(&self) -> f64 {
        self.re
    }

    fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    fn ln(self) -> Self {
        let x = self.re;
        self.chain(x.ln(), 1.0 / x)
    }

    fn ln_1p(self) -> Self {
        let x = self.re;
        self.chain(x.ln_1p(), 1.0 / (1.0 + x))
    }

    fn abs(self) -> Self {
        if self.re < 0.0 { -self } else { self }
    }

    fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        self.chain(s, 0.5 / s)
    }

    fn erfc(self) -> Self {
        let x = self.re;
        let d = -FRAC_2_SQRT_PI * (-x * x).exp();
        self.chain(statrs::function::erf::erfc(x), d)
    }

    fn floor_at(self, floor: f64) -> Self {
        if self.re >= floor { self } else { Dual::constant(floor) }
    }
}

/// Value and gradient of `f` at `x`.
///
/// `f` receives one seeded [`Dual`] per coordinate of `x`; whatever it returns
/// is read back as `(f(x), ∇f(x))`. A result that does not depend on `x`
/// yields a zero gradient of the right length.
pub fn gradient<F>(f: F, x: &Array1<f64>) -> (f64, Array1<f64>)
where
    F: FnOnce(&[Dual]) -> Dual,
{
    match try_gradient(|vars| Ok::<_, std::convert::Infallible>(f(vars)), x) {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Fallible [`gradient`]: errors raised by `f` are returned unchanged.
pub fn try_gradient<F, E>(f: F, x: &Array1<f64>) -> Result<(f64, Array1<f64>), E>
where
    F: FnOnce(&[Dual]) -> Result<Dual, E>,
{
    let dim = x.len();
    let vars: Vec<Dual> =
        x.iter().enumerate().map(|(index, &value)| Dual::variable(value, index, dim)).collect();
    let out = f(&vars)?;
    let grad = out.tangent(dim);
    Ok((out.re, grad))
}

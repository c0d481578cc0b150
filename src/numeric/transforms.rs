//! Numerically stable transforms, generic over [`Real`].
//!
//! Guarded forms of `ln(1 + exp(x))`, its inverse, the logistic sigmoid,
//! softmax and log-sum-exp. Softplus uses the explicit cutoff `x > 20.0`
//! above which `ln(1 + exp(x)) == x` in `f64`. Softmax and log-sum-exp shift
//! by the primal maximum; the shift is a constant, so tangents are exact.
use crate::numeric::real::Real;

/// Cutoff above which softplus and its inverse are the identity in `f64`.
pub const SOFTPLUS_CUTOFF: f64 = 20.0;

/// Stable `ln(1 + exp(x))`, mapping ℝ → (0, ∞).
pub fn softplus<T: Real>(x: T) -> T {
    if x.value() > SOFTPLUS_CUTOFF { x } else { x.exp().ln_1p() }
}

/// Inverse of [`softplus`] on `(0, ∞)`: `ln(exp(x) - 1)`.
///
/// Callers pass finite `x > 0`; spreads are floored before they reach here.
pub fn softplus_inv(x: f64) -> f64 {
    if x > SOFTPLUS_CUTOFF { x } else { x.exp_m1().ln() }
}

/// Logistic sigmoid `1 / (1 + exp(-x))`, branching on sign so that `exp`
/// never overflows.
pub fn sigmoid<T: Real>(x: T) -> T {
    if x.value() >= 0.0 {
        T::constant(1.0) / ((-x).exp() + 1.0)
    } else {
        let e = x.exp();
        e.clone() / (e + 1.0)
    }
}

/// `ln Σ exp(x_i)` with max-shift. Returns `-inf` for an empty slice or when
/// every term is `-inf`.
pub fn log_sum_exp<T: Real>(xs: &[T]) -> T {
    let m = xs.iter().map(|x| x.value()).fold(f64::NEG_INFINITY, f64::max);
    if !m.is_finite() {
        return T::constant(m);
    }
    let mut iter = xs.iter().map(|x| (x.clone() - m).exp());
    let first = match iter.next() {
        Some(first) => first,
        None => return T::constant(f64::NEG_INFINITY),
    };
    iter.fold(first, |acc, e| acc + e).ln() + m
}

/// Max-shifted softmax; output sums to one.
pub fn softmax<T: Real>(xs: &[T]) -> Vec<T> {
    let m = xs.iter().map(|x| x.value()).fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<T> = xs.iter().map(|x| (x.clone() - m).exp()).collect();
    let total = match exps.iter().cloned().reduce(|acc, e| acc + e) {
        Some(total) => total,
        None => return Vec::new(),
    };
    exps.into_iter().map(|e| e / total.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::dual::gradient;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Agreement with naive formulas on safe grids, tail behavior, and
    // tangents flowing through the shifted reductions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Softplus matches `ln(1 + exp(x))` where the naive form is safe, and its
    // inverse recovers the input.
    fn softplus_matches_naive_and_inverts() {
        for &x in &[-30.0, -5.0, -0.3, 0.0, 0.7, 4.0, 19.0, 25.0] {
            let sp = softplus(x);
            if x < 19.5 {
                assert!((sp - (1.0 + f64::exp(x)).ln()).abs() < 1e-12);
            }
            if sp > 1e-10 {
                assert!((softplus_inv(sp) - x).abs() < 1e-8, "x = {x}");
            }
        }
        assert_eq!(softplus(1000.0), 1000.0);
    }

    #[test]
    // Purpose
    // -------
    // Sigmoid is finite in both tails and symmetric: σ(-x) = 1 - σ(x).
    fn sigmoid_tails_and_symmetry() {
        assert!(sigmoid(-800.0_f64) >= 0.0);
        assert_eq!(sigmoid(800.0_f64), 1.0);
        for &x in &[-3.0_f64, -0.5, 0.0, 1.2, 6.0] {
            assert!((sigmoid(-x) - (1.0 - sigmoid(x))).abs() < 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // Log-sum-exp survives huge inputs and handles all-`-inf` slices.
    fn log_sum_exp_is_stable() {
        let big = log_sum_exp(&[1000.0_f64, 1000.0]);
        assert!((big - (1000.0 + std::f64::consts::LN_2)).abs() < 1e-12);
        assert_eq!(log_sum_exp(&[f64::NEG_INFINITY, f64::NEG_INFINITY]), f64::NEG_INFINITY);
        assert_eq!(log_sum_exp::<f64>(&[]), f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Softmax conserves mass, and the gradient of log-sum-exp is the
    // softmax of its arguments.
    fn softmax_mass_and_lse_gradient() {
        let x = array![0.2, -1.0, 3.0];
        let probs = softmax(x.as_slice().unwrap());
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-14);

        let (_, grad) = gradient(|v| log_sum_exp(v), &x);
        for (g, p) in grad.iter().zip(probs.iter()) {
            assert!((g - p).abs() < 1e-12);
        }
    }
}

//! The scalar abstraction every differentiable kernel is written against.
//!
//! Kernels in [`crate::kernels`] and the traced losses in
//! [`crate::conditions`] are generic over [`Real`]. Instantiated with `f64`
//! they compute plain values; instantiated with [`super::Dual`] the same code
//! carries tangents and yields exact gradients. Only the operations the
//! location-scale kernels need are part of the trait.
use std::ops::{Add, Div, Mul, Neg, Sub};

pub trait Real:
    Clone
    + std::fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Lift a constant; its derivative is zero.
    fn constant(value: f64) -> Self;

    /// Primal value, used for branching and reporting.
    fn value(&self) -> f64;

    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn ln_1p(self) -> Self;
    fn abs(self) -> Self;
    fn sqrt(self) -> Self;

    /// Complementary error function.
    fn erfc(self) -> Self;

    /// `max(self, floor)`. Below the floor the result is constant.
    fn floor_at(self, floor: f64) -> Self;
}

impl Real for f64 {
    #[inline]
    fn constant(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn ln_1p(self) -> Self {
        f64::ln_1p(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn erfc(self) -> Self {
        statrs::function::erf::erfc(self)
    }

    #[inline]
    fn floor_at(self, floor: f64) -> Self {
        if self >= floor { self } else { floor }
    }
}

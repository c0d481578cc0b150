//! Scale — affine map between a real support `[low, high]` and `[0, 1]`.
//!
//! Every distribution and condition stores its parameters relative to a
//! [`Scale`]: locations are mapped with `normalize_point` and spreads are
//! divided by `width`. Fitting happens on the normalized support so that the
//! optimizer sees numbers of order one regardless of the question's units.
//!
//! Invariants
//! ----------
//! - `low` and `high` are finite and `width = high - low > 0` (checked in
//!   [`Scale::new`]).
//! - `denormalize_point(normalize_point(x)) == x` up to floating rounding.
use crate::errors::{DistError, DistResult};

/// Affine support scale `[low, high]`.
///
/// Small `Copy` value shared by every component of a mixture; two scales are
/// considered the same when their bounds compare equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub low: f64,
    pub high: f64,
}

impl Scale {
    /// Build a validated scale.
    ///
    /// # Errors
    /// [`DistError::InvalidScale`] when a bound is non-finite or `low >= high`.
    pub fn new(low: f64, high: f64) -> DistResult<Self> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(DistError::InvalidScale { low, high });
        }
        Ok(Self { low, high })
    }

    /// The canonical normalized scale `[0, 1]`.
    pub const fn unit() -> Self {
        Self { low: 0.0, high: 1.0 }
    }

    /// Scale spanned by a data set.
    ///
    /// A data set with a single distinct value gets a unit-width scale
    /// centred on that value.
    ///
    /// # Errors
    /// - [`DistError::EmptyData`] for an empty slice.
    /// - [`DistError::NonFiniteData`] for the first NaN/±inf entry.
    pub fn from_data(data: &[f64]) -> DistResult<Self> {
        if data.is_empty() {
            return Err(DistError::EmptyData);
        }
        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for (index, &value) in data.iter().enumerate() {
            if !value.is_finite() {
                return Err(DistError::NonFiniteData { index, value });
            }
            low = low.min(value);
            high = high.max(value);
        }
        if high - low <= 0.0 {
            return Scale::new(low - 0.5, high + 0.5);
        }
        Scale::new(low, high)
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn normalize_point(&self, x: f64) -> f64 {
        (x - self.low) / self.width()
    }

    pub fn denormalize_point(&self, x: f64) -> f64 {
        x * self.width() + self.low
    }

    /// Express a true-scale spread relative to this scale.
    pub fn normalize_width(&self, w: f64) -> f64 {
        w / self.width()
    }

    pub fn denormalize_width(&self, w: f64) -> f64 {
        w * self.width()
    }

    pub fn normalize_points(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.normalize_point(x)).collect()
    }

    pub fn denormalize_points(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.denormalize_point(x)).collect()
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::unit()
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scale(low={}, high={})", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Normalizing then denormalizing returns the original point across the
    // support, including the bounds.
    fn normalize_denormalize_round_trip() {
        let scale = Scale::new(-3.5, 1250.0).unwrap();
        for i in 0..=50 {
            let x = scale.low + scale.width() * (i as f64) / 50.0;
            let back = scale.denormalize_point(scale.normalize_point(x));
            assert!((back - x).abs() < 1e-9 * scale.width(), "x = {x}, back = {back}");
        }
        assert_eq!(scale.normalize_point(scale.low), 0.0);
        assert_eq!(scale.normalize_point(scale.high), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Reject inverted, empty and non-finite bounds.
    fn new_rejects_degenerate_bounds() {
        assert!(matches!(Scale::new(1.0, 1.0), Err(DistError::InvalidScale { .. })));
        assert!(matches!(Scale::new(2.0, 1.0), Err(DistError::InvalidScale { .. })));
        assert!(matches!(Scale::new(f64::NAN, 1.0), Err(DistError::InvalidScale { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `from_data` spans the sample and widens a constant sample.
    fn from_data_spans_sample() {
        let scale = Scale::from_data(&[0.2, 0.1, 0.9]).unwrap();
        assert_eq!((scale.low, scale.high), (0.1, 0.9));

        let flat = Scale::from_data(&[4.0, 4.0]).unwrap();
        assert_eq!((flat.low, flat.high), (3.5, 4.5));

        assert_eq!(Scale::from_data(&[]), Err(DistError::EmptyData));
        assert!(matches!(
            Scale::from_data(&[1.0, f64::INFINITY]),
            Err(DistError::NonFiniteData { index: 1, .. })
        ));
    }
}

//! IntervalCondition — "P(min ≤ X ≤ max) = p".
//!
//! A percentile statement is an interval with one open side: the 90th
//! percentile at 42 is `IntervalCondition::new(0.9, None, Some(42.0), w)`.
//! The loss is the weighted squared gap between the probability the
//! distribution assigns to the interval and `p`.
use crate::conditions::{traced_view, validate_unit, validate_weight};
use crate::distributions::{Distribution, TracedDist};
use crate::errors::{DistError, DistResult};
use crate::numeric::Real;
use crate::scale::Scale;

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalCondition {
    p: f64,
    min: Option<f64>,
    max: Option<f64>,
    weight: f64,
}

impl IntervalCondition {
    /// # Errors
    /// [`DistError::InvalidConditionParam`] for `p` outside `[0, 1]`, a
    /// negative or non-finite weight, a NaN bound, or `min > max`.
    pub fn new(p: f64, min: Option<f64>, max: Option<f64>, weight: f64) -> DistResult<Self> {
        let p = validate_unit("p", p)?;
        let weight = validate_weight(weight)?;
        for (name, bound) in [("min", min), ("max", max)] {
            if let Some(value) = bound.filter(|b| b.is_nan()) {
                return Err(DistError::InvalidConditionParam { name, value, reason: "bound is NaN" });
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(DistError::InvalidConditionParam {
                    name: "min",
                    value: lo,
                    reason: "lower bound exceeds upper bound",
                });
            }
        }
        Ok(Self { p, min, max, weight })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.min, self.max)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Probability `dist` assigns to the (normalized) interval.
    pub fn probability_inside<T: Real>(&self, dist: &TracedDist<T>) -> T {
        let upper = dist.cdf(self.max.unwrap_or(f64::INFINITY));
        let lower = dist.cdf(self.min.unwrap_or(f64::NEG_INFINITY));
        upper - lower
    }

    pub fn traced_loss<T: Real>(&self, dist: &TracedDist<T>) -> T {
        let gap = self.probability_inside(dist) - self.p;
        gap.clone() * gap * self.weight
    }

    /// Loss against `dist`, with this condition stated on the true scale.
    ///
    /// # Errors
    /// Propagates decoding errors of the distribution's flat parameters.
    pub fn loss<D: Distribution + ?Sized>(&self, dist: &D) -> DistResult<f64> {
        Ok(self.normalize(dist.scale()).traced_loss(&traced_view(dist)?))
    }

    /// Flat form `[p, min, max, weight]`; absent bounds become `∓inf`.
    pub fn destructure(&self) -> Vec<f64> {
        vec![
            self.p,
            self.min.unwrap_or(f64::NEG_INFINITY),
            self.max.unwrap_or(f64::INFINITY),
            self.weight,
        ]
    }

    /// # Errors
    /// [`DistError::ParamsLengthMismatch`] unless exactly four values, plus
    /// the validation of [`IntervalCondition::new`].
    pub fn structure(params: &[f64]) -> DistResult<Self> {
        let [p, min, max, weight] = params else {
            return Err(DistError::ParamsLengthMismatch { expected: 4, actual: params.len() });
        };
        let min = (*min != f64::NEG_INFINITY).then_some(*min);
        let max = (*max != f64::INFINITY).then_some(*max);
        Self::new(*p, min, max, *weight)
    }

    pub fn normalize(&self, scale: Scale) -> Self {
        Self {
            min: self.min.map(|x| scale.normalize_point(x)),
            max: self.max.map(|x| scale.normalize_point(x)),
            ..*self
        }
    }

    pub fn denormalize(&self, scale: Scale) -> Self {
        Self {
            min: self.min.map(|x| scale.denormalize_point(x)),
            max: self.max.map(|x| scale.denormalize_point(x)),
            ..*self
        }
    }
}

impl std::fmt::Display for IntervalCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pct = self.p * 100.0;
        match (self.min, self.max) {
            (None, None) => write!(f, "There is a {pct:.0}% chance that the value is anywhere"),
            (None, Some(hi)) => write!(f, "There is a {pct:.0}% chance that the value is < {hi}"),
            (Some(lo), None) => write!(f, "There is a {pct:.0}% chance that the value is > {lo}"),
            (Some(lo), Some(hi)) => {
                write!(f, "There is a {pct:.0}% chance that the value is in [{lo}, {hi}]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::DistKind;

    #[test]
    // Purpose
    // -------
    // The loss is the weighted squared gap between achieved and stated
    // probability, with open sides treated as ±inf.
    //
    // Given
    // -----
    // - Normalized Logistic(0.5, 0.1); its median is 0.5.
    //
    // Expect
    // ------
    // - P(X ≤ 0.5) = 0.5 gives zero loss.
    // - Claiming 0.9 with weight 2 gives 2 · 0.4².
    fn loss_is_weighted_squared_gap() {
        let dist = TracedDist::from_params(DistKind::Logistic, &[0.5, 0.1]).unwrap();
        let median = IntervalCondition::new(0.5, None, Some(0.5), 1.0).unwrap();
        assert!(median.traced_loss(&dist).abs() < 1e-15);

        let wrong = IntervalCondition::new(0.9, None, Some(0.5), 2.0).unwrap();
        assert!((wrong.traced_loss(&dist) - 2.0 * 0.16).abs() < 1e-12);

        let everything = IntervalCondition::new(1.0, None, None, 1.0).unwrap();
        assert_eq!(everything.traced_loss(&dist), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Open bounds survive the flat round trip and bad inputs are rejected.
    fn structure_round_trip_and_validation() {
        let cond = IntervalCondition::new(0.3, Some(-2.0), None, 0.5).unwrap();
        assert_eq!(IntervalCondition::structure(&cond.destructure()).unwrap(), cond);
        assert!(IntervalCondition::structure(&[0.3, 1.0]).is_err());
        assert!(IntervalCondition::new(1.2, None, Some(1.0), 1.0).is_err());
        assert!(IntervalCondition::new(0.2, Some(3.0), Some(1.0), 1.0).is_err());
        assert!(IntervalCondition::new(0.2, None, Some(1.0), -1.0).is_err());
    }
}

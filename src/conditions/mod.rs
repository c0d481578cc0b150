//! conditions — evidence that scores a candidate distribution.
//!
//! Purpose
//! -------
//! Represent the closed set of evidence types (interval/percentile
//! statements, full cross-entropy targets, partial cross-entropy targets) as
//! one [`Condition`] enum with a uniform surface: a loss against a
//! distribution, a flat codec for traced evaluation, normalization onto a
//! scale, and a human-readable description.
//!
//! Key behaviors
//! -------------
//! - Every condition type has a `loss(&dist)`; [`Condition::loss`]
//!   delegates to it. It normalizes the condition onto the distribution's
//!   scale and evaluates the traced loss at the distribution's flat
//!   parameters; the object path and the kernel path share one formula.
//! - [`Condition::traced_loss`] is generic over [`Real`], so kernels
//!   differentiate it with [`crate::numeric::Dual`].
//! - `destructure`/`structure` round-trip through `(CondKind, Array1<f64>)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Conditions are immutable value objects; `normalize`/`denormalize`
//!   return new values.
//! - Weights are finite and `>= 0`; losses are `>= 0` for intervals and
//!   histograms.
//!
//! Downstream usage
//! ----------------
//! - `kernels` structures conditions from flat parameters keyed by
//!   [`CondKind`].
//! - `fitting` normalizes conditions onto the fit scale once, up front.
pub mod crossentropy;
pub mod interval;

use ndarray::Array1;

use crate::distributions::{Distribution, TracedDist};
use crate::errors::{DistError, DistResult};
use crate::numeric::Real;
use crate::scale::Scale;

/// Flat-parameter view of `dist` on its normalized support.
pub(crate) fn traced_view<D: Distribution + ?Sized>(dist: &D) -> DistResult<TracedDist<f64>> {
    let (kind, params) = dist.destructure();
    TracedDist::from_params(kind, &params.to_vec())
}

// ---- Re-exports ----

pub use self::crossentropy::{CrossEntropyCondition, PartialCrossEntropyCondition};
pub use self::interval::IntervalCondition;

/// Type tag of a condition, used as a static key by `structure` and by the
/// kernel cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CondKind {
    Interval,
    CrossEntropy,
    PartialCrossEntropy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Interval(IntervalCondition),
    CrossEntropy(CrossEntropyCondition),
    PartialCrossEntropy(PartialCrossEntropyCondition),
}

/// Summary of how well a distribution meets a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FitDescription {
    pub description: String,
    pub loss: f64,
    /// Probability the distribution assigns to an interval condition's range.
    pub achieved_p: Option<f64>,
}

impl std::fmt::Display for FitDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (loss {:.6}", self.description, self.loss)?;
        if let Some(p) = self.achieved_p {
            write!(f, ", achieved {:.1}%", p * 100.0)?;
        }
        write!(f, ")")
    }
}

impl Condition {
    pub fn kind(&self) -> CondKind {
        match self {
            Condition::Interval(_) => CondKind::Interval,
            Condition::CrossEntropy(_) => CondKind::CrossEntropy,
            Condition::PartialCrossEntropy(_) => CondKind::PartialCrossEntropy,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Condition::Interval(c) => c.weight(),
            Condition::CrossEntropy(c) => c.weight(),
            Condition::PartialCrossEntropy(c) => c.weight(),
        }
    }

    /// Loss of an already-normalized condition against a traced
    /// distribution on the unit scale.
    pub fn traced_loss<T: Real>(&self, dist: &TracedDist<T>) -> T {
        match self {
            Condition::Interval(c) => c.traced_loss(dist),
            Condition::CrossEntropy(c) => c.traced_loss(dist),
            Condition::PartialCrossEntropy(c) => c.traced_loss(dist),
        }
    }

    /// Loss of this (true-scale) condition against `dist`.
    ///
    /// # Errors
    /// Propagates decoding errors of the distribution's flat parameters.
    pub fn loss<D: Distribution + ?Sized>(&self, dist: &D) -> DistResult<f64> {
        match self {
            Condition::Interval(c) => c.loss(dist),
            Condition::CrossEntropy(c) => c.loss(dist),
            Condition::PartialCrossEntropy(c) => c.loss(dist),
        }
    }

    pub fn destructure(&self) -> (CondKind, Array1<f64>) {
        let params = match self {
            Condition::Interval(c) => c.destructure(),
            Condition::CrossEntropy(c) => c.destructure(),
            Condition::PartialCrossEntropy(c) => c.destructure(),
        };
        (self.kind(), Array1::from(params))
    }

    /// Rebuild a condition from its flat form.
    ///
    /// # Errors
    /// Length and validation errors of the variant's `structure`.
    pub fn structure(kind: CondKind, params: &[f64]) -> DistResult<Self> {
        Ok(match kind {
            CondKind::Interval => Condition::Interval(IntervalCondition::structure(params)?),
            CondKind::CrossEntropy => {
                Condition::CrossEntropy(CrossEntropyCondition::structure(params)?)
            }
            CondKind::PartialCrossEntropy => {
                Condition::PartialCrossEntropy(PartialCrossEntropyCondition::structure(params)?)
            }
        })
    }

    /// Express the condition relative to `scale`. Histograms already live on
    /// the normalized grid and pass through.
    pub fn normalize(&self, scale: Scale) -> Self {
        match self {
            Condition::Interval(c) => Condition::Interval(c.normalize(scale)),
            Condition::CrossEntropy(_) => self.clone(),
            Condition::PartialCrossEntropy(c) => Condition::PartialCrossEntropy(c.normalize(scale)),
        }
    }

    pub fn denormalize(&self, scale: Scale) -> Self {
        match self {
            Condition::Interval(c) => Condition::Interval(c.denormalize(scale)),
            Condition::CrossEntropy(_) => self.clone(),
            Condition::PartialCrossEntropy(c) => {
                Condition::PartialCrossEntropy(c.denormalize(scale))
            }
        }
    }

    /// Describe how `dist` meets this condition.
    ///
    /// # Errors
    /// As [`Condition::loss`].
    pub fn describe_fit<D: Distribution + ?Sized>(&self, dist: &D) -> DistResult<FitDescription> {
        let loss = self.loss(dist)?;
        let achieved_p = match self {
            Condition::Interval(c) => {
                let (lo, hi) = c.bounds();
                let upper = hi.map_or(1.0, |x| dist.cdf(x));
                let lower = lo.map_or(0.0, |x| dist.cdf(x));
                Some(upper - lower)
            }
            _ => None,
        };
        Ok(FitDescription { description: self.to_string(), loss, achieved_p })
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Interval(c) => std::fmt::Display::fmt(c, f),
            Condition::CrossEntropy(c) => std::fmt::Display::fmt(c, f),
            Condition::PartialCrossEntropy(c) => std::fmt::Display::fmt(c, f),
        }
    }
}

impl From<IntervalCondition> for Condition {
    fn from(c: IntervalCondition) -> Self {
        Condition::Interval(c)
    }
}

impl From<CrossEntropyCondition> for Condition {
    fn from(c: CrossEntropyCondition) -> Self {
        Condition::CrossEntropy(c)
    }
}

impl From<PartialCrossEntropyCondition> for Condition {
    fn from(c: PartialCrossEntropyCondition) -> Self {
        Condition::PartialCrossEntropy(c)
    }
}

// ---- Shared validation ----

pub(crate) fn validate_weight(weight: f64) -> DistResult<f64> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(DistError::InvalidConditionParam {
            name: "weight",
            value: weight,
            reason: "must be finite and >= 0",
        });
    }
    Ok(weight)
}

pub(crate) fn validate_unit(name: &'static str, value: f64) -> DistResult<f64> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DistError::InvalidConditionParam { name, value, reason: "must lie in [0, 1]" });
    }
    Ok(value)
}

pub mod prelude {
    pub use super::{
        CondKind, Condition, CrossEntropyCondition, FitDescription, IntervalCondition,
        PartialCrossEntropyCondition,
    };
}

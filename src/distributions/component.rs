//! Component — one logistic or normal location-scale distribution.
//!
//! Purpose
//! -------
//! Store a single component in normalized form `(loc, s)` relative to its
//! [`Scale`], together with the cached true-scale pair `(true_loc, true_s)`,
//! and evaluate the family's closed forms on the true scale.
//!
//! Key behaviors
//! -------------
//! - Two construction modes: true-scale parameters plus a scale (normalized
//!   internally), or trusted normalized parameters (stored as-is).
//! - `pdf(x) = exp(logpdf(normalize(x))) / width`; `logpdf` takes a
//!   normalized point.
//! - `ppf` is the family's closed-form inverse, denormalized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Degenerate spreads are clamped, never rejected: the true-scale mode
//!   floors `true_s` at `EVAL_SPREAD_FLOOR`, the normalized mode floors `s`.
//!   Relabeling never floors again.
//! - `true_s == s * scale.width()` and
//!   `true_loc == scale.denormalize_point(loc)`.
//! - Immutable; `normalize`/`denormalize` return new values.
use ndarray::{Array1, array};
use rand::RngCore;

use crate::distributions::{DistKind, Distribution, Family};
use crate::errors::{DistError, DistResult};
use crate::kernels::EVAL_SPREAD_FLOOR;
use crate::scale::Scale;

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    family: Family,
    loc: f64,
    s: f64,
    scale: Scale,
    true_loc: f64,
    true_s: f64,
    metadata: Option<String>,
}

impl Component {
    /// General constructor.
    ///
    /// Parameters
    /// ----------
    /// - `loc`, `s`: true-scale location and spread, or normalized ones when
    ///   `normalized` is set.
    /// - `scale`: support of the component. Optional only in normalized mode,
    ///   where it defaults to `Scale(0, 1)`.
    ///
    /// Errors
    /// ------
    /// - [`DistError::MissingScale`] when `scale` is `None` and `normalized` is
    ///   not set.
    pub fn new(
        family: Family, loc: f64, s: f64, scale: Option<Scale>, normalized: bool,
    ) -> DistResult<Self> {
        match (scale, normalized) {
            (scale, true) => Ok(Self::from_normalized(family, loc, s, scale.unwrap_or_default())),
            (Some(scale), false) => Ok(Self::from_true(family, loc, s, scale)),
            (None, false) => Err(DistError::MissingScale),
        }
    }

    /// True-scale logistic component.
    pub fn logistic(loc: f64, s: f64, scale: Scale) -> Self {
        Self::from_true(Family::Logistic, loc, s, scale)
    }

    /// True-scale normal component; `s` is the standard deviation.
    pub fn normal(loc: f64, s: f64, scale: Scale) -> Self {
        Self::from_true(Family::Normal, loc, s, scale)
    }

    /// Trusted path: `(loc, s)` are already normalized to `scale`.
    pub fn from_normalized(family: Family, loc: f64, s: f64, scale: Scale) -> Self {
        Self::assemble(family, loc, s.max(EVAL_SPREAD_FLOOR), scale)
    }

    // The floor applies to the true spread only; on a wide scale the
    // normalized spread may sit below it.
    fn from_true(family: Family, loc: f64, s: f64, scale: Scale) -> Self {
        let s = scale.normalize_width(s.max(EVAL_SPREAD_FLOOR));
        Self::assemble(family, scale.normalize_point(loc), s, scale)
    }

    fn assemble(family: Family, loc: f64, s: f64, scale: Scale) -> Self {
        Self {
            family,
            loc,
            s,
            scale,
            true_loc: scale.denormalize_point(loc),
            true_s: scale.denormalize_width(s),
            metadata: None,
        }
    }

    /// Attach free-form metadata; it survives `normalize`/`denormalize`.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Normalized location.
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Normalized spread.
    pub fn s(&self) -> f64 {
        self.s
    }

    pub fn true_loc(&self) -> f64 {
        self.true_loc
    }

    pub fn true_s(&self) -> f64 {
        self.true_s
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    fn relabel(&self, scale: Scale) -> Self {
        Self {
            metadata: self.metadata.clone(),
            ..Self::assemble(self.family, self.loc, self.s, scale)
        }
    }
}

impl Distribution for Component {
    fn kind(&self) -> DistKind {
        self.family.component_kind()
    }

    fn scale(&self) -> Scale {
        self.scale
    }

    fn logpdf(&self, x: f64) -> f64 {
        self.family.logpdf(x, self.loc, self.s)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.family.cdf(self.scale.normalize_point(x), self.loc, self.s)
    }

    fn ppf(&self, q: f64) -> f64 {
        self.scale.denormalize_point(self.family.ppf(q, self.loc, self.s))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let z = self.family.sample_std(rng);
        self.scale.denormalize_point(self.loc + self.s * z)
    }

    fn normalize(&self) -> Self {
        self.relabel(Scale::unit())
    }

    fn denormalize(&self, scale: Scale) -> Self {
        self.relabel(scale)
    }

    fn destructure(&self) -> (DistKind, Array1<f64>) {
        (self.kind(), array![self.loc, self.s])
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(loc={:.4}, s={:.4})", self.family.name(), self.true_loc, self.true_s)
    }
}

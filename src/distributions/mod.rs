//! distributions — location-scale components, mixtures and their flat codec.
//!
//! Purpose
//! -------
//! Define the [`Distribution`] capability shared by single components and
//! mixtures, the closed set of families ([`Family`]) and kind tags
//! ([`DistKind`]), and the object ⇄ flat-vector round trip used to cross into
//! differentiated computations ([`Distribution::destructure`],
//! [`Dist::structure`], [`TracedDist`]).
//!
//! Key behaviors
//! -------------
//! - Parameters are stored normalized to a [`Scale`]; `pdf`, `cdf`, `ppf` and
//!   `sample` speak the true scale, `logpdf` takes a normalized point.
//! - [`Dist`] dispatches statically over the four kinds behind one interface.
//! - [`Distribution::percentiles`] summarizes a distribution as interval
//!   conditions at fixed quantiles.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every distribution is immutable; `normalize`/`denormalize` return new
//!   values.
//! - `destructure` emits normalized parameters only; the scale travels
//!   separately and is supplied again to `structure`.
//!
//! Conventions
//! -----------
//! - Flat layout: `(loc, s)` for a component, rows `(loc, s, prob)` for a
//!   mixture.
//!
//! Downstream usage
//! ----------------
//! - `conditions` score distributions through their destructured form.
//! - `kernels` and `fitting` only ever see `(DistKind, params)`.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its closed forms and invariants;
//!   quadrature and fit-recovery properties live in `tests/`.
pub mod component;
pub mod family;
pub mod histogram;
pub mod mixture;
pub mod traced;
pub mod truncated;

use ndarray::Array1;
use rand::RngCore;

use crate::conditions::IntervalCondition;
use crate::errors::DistResult;
use crate::scale::Scale;

// ---- Re-exports ----

pub use self::component::Component;
pub use self::family::{DistKind, Family};
pub use self::histogram::Histogram;
pub use self::mixture::Mixture;
pub use self::traced::TracedDist;
pub use self::truncated::TruncatedMixture;

/// Quantiles reported by [`Distribution::percentiles`] by default.
pub const DEFAULT_PERCENTILES: [f64; 7] = [0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99];

/// Capability shared by every distribution kind.
pub trait Distribution {
    fn kind(&self) -> DistKind;

    fn scale(&self) -> Scale;

    /// Log-density at a normalized point.
    fn logpdf(&self, x: f64) -> f64;

    /// Density at a true-scale point; the `1/width` factor is the Jacobian
    /// of the normalization.
    fn pdf(&self, x: f64) -> f64 {
        let scale = self.scale();
        self.logpdf(scale.normalize_point(x)).exp() / scale.width()
    }

    fn cdf(&self, x: f64) -> f64;

    /// Quantile function on the true scale. Never fails.
    fn ppf(&self, q: f64) -> f64;

    fn sample(&self, rng: &mut dyn RngCore) -> f64;

    /// `n` independent draws.
    fn sample_n(&self, rng: &mut dyn RngCore, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }

    /// Same parameters relabeled onto `Scale(0, 1)`.
    fn normalize(&self) -> Self
    where
        Self: Sized;

    /// Same normalized parameters placed on `scale`.
    fn denormalize(&self, scale: Scale) -> Self
    where
        Self: Sized;

    /// Kind tag and flat normalized parameters.
    fn destructure(&self) -> (DistKind, Array1<f64>);

    /// One `P(X <= ppf(q)) = q` condition per quantile.
    ///
    /// # Errors
    /// Propagates [`IntervalCondition::new`] validation for `q` outside
    /// `[0, 1]`.
    fn percentiles(&self, qs: &[f64]) -> DistResult<Vec<IntervalCondition>> {
        qs.iter().map(|&q| IntervalCondition::new(q, None, Some(self.ppf(q)), 1.0)).collect()
    }
}

/// Closed set of distribution values behind one interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Dist {
    Component(Component),
    Mixture(Mixture),
}

impl Dist {
    /// Rebuild a distribution from its destructured form on `scale`.
    ///
    /// # Errors
    /// Length and invariant errors from [`TracedDist::from_params`] and
    /// [`Mixture::from_params`].
    pub fn structure(kind: DistKind, params: &[f64], scale: Scale) -> DistResult<Self> {
        // Shared length validation with the traced path.
        TracedDist::from_params(kind, params)?;
        let family = kind.family();
        if kind.is_mixture() {
            Mixture::from_params(family, params, scale).map(Dist::Mixture)
        } else {
            Ok(Dist::Component(Component::from_normalized(family, params[0], params[1], scale)))
        }
    }

    /// View as a mixture; a component becomes a one-component mixture.
    pub fn into_mixture(self) -> Mixture {
        match self {
            Dist::Mixture(m) => m,
            Dist::Component(c) => Mixture::from_single(c),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $d:ident => $body:expr) => {
        match $self {
            Dist::Component($d) => $body,
            Dist::Mixture($d) => $body,
        }
    };
}

impl Distribution for Dist {
    fn kind(&self) -> DistKind {
        dispatch!(self, d => d.kind())
    }

    fn scale(&self) -> Scale {
        dispatch!(self, d => d.scale())
    }

    fn logpdf(&self, x: f64) -> f64 {
        dispatch!(self, d => d.logpdf(x))
    }

    fn cdf(&self, x: f64) -> f64 {
        dispatch!(self, d => d.cdf(x))
    }

    fn ppf(&self, q: f64) -> f64 {
        dispatch!(self, d => d.ppf(q))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        dispatch!(self, d => d.sample(rng))
    }

    fn normalize(&self) -> Self {
        match self {
            Dist::Component(c) => Dist::Component(c.normalize()),
            Dist::Mixture(m) => Dist::Mixture(m.normalize()),
        }
    }

    fn denormalize(&self, scale: Scale) -> Self {
        match self {
            Dist::Component(c) => Dist::Component(c.denormalize(scale)),
            Dist::Mixture(m) => Dist::Mixture(m.denormalize(scale)),
        }
    }

    fn destructure(&self) -> (DistKind, Array1<f64>) {
        dispatch!(self, d => d.destructure())
    }
}

impl std::fmt::Display for Dist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        dispatch!(self, d => std::fmt::Display::fmt(d, f))
    }
}

pub mod prelude {
    pub use super::{
        Component, DEFAULT_PERCENTILES, Dist, DistKind, Distribution, Family, Histogram, Mixture,
        TracedDist, TruncatedMixture,
    };
}

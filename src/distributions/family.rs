//! Location-scale families and the distribution type tag.
//!
//! [`Family`] carries the closed forms for one standardized component:
//! log-density, cdf, quantile function and sampler. Everything that varies by
//! family is matched here, so components, mixtures and the static kernels
//! dispatch on a `Copy` tag instead of on trait objects.
use rand::{Rng, RngCore};
use rand_distr::{Open01, StandardNormal};
use statrs::function::erf::erf_inv;

use crate::numeric::{Real, sigmoid};

const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// Closed set of location-scale families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Logistic,
    Normal,
}

/// Type tag of a distribution, used as a static key by `structure` and by the
/// kernel cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistKind {
    Logistic,
    Normal,
    LogisticMixture,
    NormalMixture,
}

impl Family {
    /// Log-density of the standardized variable `y = (x - loc) / s`,
    /// without the `-ln s` Jacobian.
    pub fn logpdf_std<T: Real>(self, y: T) -> T {
        match self {
            // -|y| - 2 ln(1 + e^{-|y|}) is symmetric and never overflows.
            Family::Logistic => {
                let a = y.abs();
                -a.clone() - (-a).exp().ln_1p() * 2.0
            }
            Family::Normal => -(y.clone() * y) * 0.5 - LN_SQRT_2PI,
        }
    }

    /// Log-density at `x` of the component `(loc, s)`.
    pub fn logpdf<T: Real>(self, x: T, loc: T, s: T) -> T {
        let y = (x - loc) / s.clone();
        self.logpdf_std(y) - s.ln()
    }

    /// Cdf at `x` of the component `(loc, s)`.
    pub fn cdf<T: Real>(self, x: T, loc: T, s: T) -> T {
        let y = (x - loc) / s;
        match self {
            Family::Logistic => sigmoid(y),
            Family::Normal => (-y * std::f64::consts::FRAC_1_SQRT_2).erfc() * 0.5,
        }
    }

    /// Standard quantile function; `±inf` at `q ∈ {0, 1}`.
    pub fn ppf_std(self, q: f64) -> f64 {
        match self {
            Family::Logistic => (q / (1.0 - q)).ln(),
            Family::Normal => std::f64::consts::SQRT_2 * erf_inv(2.0 * q - 1.0),
        }
    }

    pub fn ppf(self, q: f64, loc: f64, s: f64) -> f64 {
        loc + s * self.ppf_std(q)
    }

    /// One draw from the standardized family.
    pub fn sample_std(self, rng: &mut dyn RngCore) -> f64 {
        match self {
            Family::Logistic => {
                let u: f64 = rng.sample(Open01);
                (u / (1.0 - u)).ln()
            }
            Family::Normal => rng.sample(StandardNormal),
        }
    }

    pub fn component_kind(self) -> DistKind {
        match self {
            Family::Logistic => DistKind::Logistic,
            Family::Normal => DistKind::Normal,
        }
    }

    pub fn mixture_kind(self) -> DistKind {
        match self {
            Family::Logistic => DistKind::LogisticMixture,
            Family::Normal => DistKind::NormalMixture,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Family::Logistic => "Logistic",
            Family::Normal => "Normal",
        }
    }
}

impl DistKind {
    pub fn family(self) -> Family {
        match self {
            DistKind::Logistic | DistKind::LogisticMixture => Family::Logistic,
            DistKind::Normal | DistKind::NormalMixture => Family::Normal,
        }
    }

    pub fn is_mixture(self) -> bool {
        matches!(self, DistKind::LogisticMixture | DistKind::NormalMixture)
    }
}

impl std::fmt::Display for DistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let family = self.family().name();
        if self.is_mixture() { write!(f, "{family}Mixture") } else { write!(f, "{family}") }
    }
}

//! fitting — distributions from samples and from conditions.
//!
//! Purpose
//! -------
//! Turn evidence into distributions: maximum-likelihood mixtures and
//! components from samples ([`Mixture::from_samples`],
//! [`Mixture::from_samples_fd`], [`Component::from_samples`]) and
//! minimum-loss distributions from lists of conditions ([`fit_conditions`]).
//!
//! Key behaviors
//! -------------
//! - Every fit works on the normalized support of its scale and returns an
//!   object placed back on that scale.
//! - Parameters are optimized in an unconstrained θ space (see [`params`]);
//!   spreads go through softplus and mixing weights through softmax.
//! - Objectives implement [`Objective`] and run through
//!   [`maximize`](crate::optimization::maximizer::maximize).
//! - Each fit logs its start and outcome at `debug` level.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fitted mixtures have probabilities summing to one and spreads above the
//!   evaluation floor.
//! - Condition fits evaluate the same amplified loss as the public kernels.
//!
//! Conventions
//! -----------
//! - Errors are [`OptError`](crate::optimization::errors::OptError); input
//!   validation failures arrive wrapped as `OptError::Dist`.
//!
//! Testing notes
//! -------------
//! - Unit tests check objectives against the kernels and run small fits.
//! - Integration tests cover parameter recovery on larger samples and
//!   agreement of the gradient and finite-difference fits.
//!
//! [`Mixture::from_samples`]: crate::distributions::Mixture::from_samples
//! [`Mixture::from_samples_fd`]: crate::distributions::Mixture::from_samples_fd
//! [`Component::from_samples`]: crate::distributions::Component::from_samples
//! [`Objective`]: crate::optimization::maximizer::Objective
pub mod conditions;
pub mod params;
pub mod samples;

use crate::optimization::maximizer::MLEOptions;

/// Starting point of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init {
    /// Component locations at evenly spaced data quantiles. Condition fits
    /// have no data and start evenly spaced.
    #[default]
    Quantiles,
    /// Component locations evenly spaced across `[0, 1]`.
    Even,
}

/// Options shared by sample and condition fits.
///
/// Default: default maximizer options, quantile initialization, joint
/// condition kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub mle_opts: MLEOptions,
    pub init: Init,
    /// Condition fits: evaluate the whole list in one kernel (`true`) or sum
    /// per-condition kernels.
    pub joint_conditions: bool,
}

impl FitOptions {
    pub fn new(mle_opts: MLEOptions, init: Init, joint_conditions: bool) -> Self {
        Self { mle_opts, init, joint_conditions }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { mle_opts: MLEOptions::default(), init: Init::default(), joint_conditions: true }
    }
}

// ---- Re-exports ----

pub use self::conditions::{ConditionObjective, fit_conditions};
pub use self::params::{params_to_theta, theta_len, theta_to_params};
pub use self::samples::SampleLikelihood;

pub mod prelude {
    pub use super::{FitOptions, Init, fit_conditions};
}

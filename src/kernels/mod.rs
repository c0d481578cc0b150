//! kernels — pure functions of flat parameter vectors.
//!
//! Purpose
//! -------
//! Give the optimizer and the differentiation machinery an interface that
//! never touches live objects: log-likelihoods of mixture rows, negative
//! log-losses of tagged distributions, and multi-condition losses, each with
//! an autodiff gradient.
//!
//! Key behaviors
//! -------------
//! - Mixture log-likelihood kernels ([`params_logpdf1`], [`params_logpdf`],
//!   [`params_gradlogpdf`]) floor spreads at [`OPT_SPREAD_FLOOR`].
//! - Condition-loss kernels come in a per-condition and a joint flavor that
//!   agree to rounding; both scale the summed loss by
//!   [`LOSS_AMPLIFICATION`].
//! - Loss kernels are resolved once per static key and kept in a process-wide
//!   [`KernelCache`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Distribution parameters are normalized: `(loc, s)` for a component and
//!   rows `(loc, s, prob)` for a mixture.
//! - Condition parameters are destructured conditions already normalized to
//!   the unit scale.
//! - Gradients are exact derivatives of the value path (same generic code).
//!
//! Conventions
//! -----------
//! - Errors are [`crate::errors::DistError`] and come only from decoding
//!   malformed flat vectors.
//! - The cache logs at `debug` level the first time a kernel is built.
//!
//! Testing notes
//! -------------
//! - Unit tests compare kernels with the object path, check the two
//!   aggregation paths against each other and gradients against central
//!   differences.
pub mod cache;
pub mod condition;
pub mod mixture;

/// Factor applied to every summed condition loss.
pub const LOSS_AMPLIFICATION: f64 = 100.0;

/// Spread floor inside the optimization kernels.
pub const OPT_SPREAD_FLOOR: f64 = 0.01;

/// Spread floor of every constructed distribution.
pub const EVAL_SPREAD_FLOOR: f64 = 1e-7;

// ---- Re-exports ----

pub use self::cache::{KernelCache, KernelKey};
pub use self::condition::{
    LossKernel, condition_loss, condition_loss_grad, describe_fit, jitted_condition_loss,
    jitted_condition_loss_grad, single_condition_loss, single_condition_loss_grad,
};
pub use self::mixture::{
    dist_grad_logloss, dist_logloss, params_gradlogpdf, params_logpdf, params_logpdf1,
    wasserstein_distance,
};

pub mod prelude {
    pub use super::{
        EVAL_SPREAD_FLOOR, KernelCache, KernelKey, LOSS_AMPLIFICATION, OPT_SPREAD_FLOOR,
        condition_loss, condition_loss_grad, jitted_condition_loss, jitted_condition_loss_grad,
        params_gradlogpdf, params_logpdf,
    };
}

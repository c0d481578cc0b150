//! maximizer — argmin-powered maximization of fitting objectives.
//!
//! Purpose
//! -------
//! Provide one optimization entry point for every fit in the crate: the
//! log-likelihood of samples under a mixture and the negated condition loss
//! of a distribution. Callers implement [`Objective`] and invoke
//! [`maximize`] to run L-BFGS with a configurable line search, tolerances
//! and a finite-difference fallback.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `f(θ)` into the argmin cost
//!   `c(θ) = -f(θ)`.
//! - [`maximize`] validates the starting point with [`Objective::check`],
//!   builds a solver via [`builders`], runs it via [`run::run_lbfgs`] and
//!   returns an [`OptimOutcome`].
//! - [`finite_diff`] differentiates the cost when [`Objective::grad`] is not
//!   implemented.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes**; implementors return `f(θ)` and
//!   `∇f(θ)`, never the cost.
//! - Objectives report invalid inputs as [`OptError`] values, not panics.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`]; mapping into
//!   distribution parameters is the objective's job.
//! - [`OptimOutcome::value`] is expressed in objective terms.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions ([`adapter`]), solver construction
//!   ([`builders`]), finite differences and validation, and full solves of a
//!   toy objective ([`api`]).
//! - Distribution fits in `crate::fitting` exercise the layer end to end.
//!
//! [`OptError`]: crate::optimization::errors::OptError
pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, MLEOptions, Objective, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, MLEOptions, Objective, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}

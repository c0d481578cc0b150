//! numeric — scalar substrate for value and gradient evaluation.
//!
//! Purpose
//! -------
//! Provide the [`Real`] scalar abstraction that every density, loss and
//! fitting kernel is written against, the forward-mode [`Dual`] number that
//! turns those kernels into exact gradients, and the stable transforms
//! (softplus, sigmoid, softmax, log-sum-exp) used by the mixture kernels and
//! the unconstrained parameterization.
//!
//! Key behaviors
//! -------------
//! - `f64` implements [`Real`]; generic code instantiated with `f64` is the
//!   plain value path.
//! - [`gradient`] seeds one tangent per coordinate of the input and returns
//!   `(f(x), ∇f(x))` from a single pass.
//! - Transforms branch on primal values only, so the same code is valid for
//!   both instantiations.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite unless stated otherwise (`log_sum_exp` accepts `-inf`).
//! - Branches are taken on the primal value; derivatives at branch points are
//!   one-sided.
//!
//! Conventions
//! -----------
//! - No logging, no I/O, no global state; safe in inner loops.
//!
//! Downstream usage
//! ----------------
//! - `kernels` uses [`gradient`] for every `*_grad` function.
//! - `fitting` maps optimizer θ through [`softplus`]/[`softmax`].
pub mod dual;
pub mod real;
pub mod transforms;

// ---- Re-exports ----

pub use self::dual::{Dual, gradient, try_gradient};
pub use self::real::Real;
pub use self::transforms::{log_sum_exp, sigmoid, softmax, softplus, softplus_inv};

pub mod prelude {
    pub use super::dual::{Dual, gradient};
    pub use super::real::Real;
    pub use super::transforms::{log_sum_exp, sigmoid, softmax, softplus, softplus_inv};
}

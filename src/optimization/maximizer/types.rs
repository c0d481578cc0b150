//! maximizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and L-BFGS aliases used by the maximizer so
//! the adapter, builders and runner agree on one `(Theta, Grad, Cost)`
//! triple without spelling out `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have length equal to the number of free
//!   (unconstrained) parameters of the objective.
//! - `Cost` is the scalar handed to argmin, i.e. the negated objective.
//! - `DEFAULT_LBFGS_MEM` is the history size used when
//!   [`MLEOptions::lbfgs_mem`](super::MLEOptions) is `None`.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar cost `c(θ) = -f(θ)` minimized by argmin.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver
/// (e.g. `"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

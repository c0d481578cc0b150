//! maximizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers for the maximizer with either line search, applying
//! the history size and the optional gradient / cost-change tolerances from
//! [`MLEOptions`]. The initial point and the iteration cap are runtime
//! concerns applied by [`run_lbfgs`](super::run::run_lbfgs).
//!
//! Conventions
//! -----------
//! - History size is `opts.lbfgs_mem`, or [`DEFAULT_LBFGS_MEM`] when `None`.
//! - An absent tolerance leaves argmin's default in place.
//! - argmin's configuration errors surface as [`OptError`] through
//!   `From<argmin::core::Error>`.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    maximizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search, configured from `opts`.
///
/// # Errors
/// When argmin rejects one of the tolerances.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search, configured from `opts`.
///
/// # Errors
/// When argmin rejects one of the tolerances.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional tolerances of `opts` to an L-BFGS solver, whatever its
/// line search.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

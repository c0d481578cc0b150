//! High-level entry point for maximizing an [`Objective`].
//!
//! Selects an L-BFGS solver with Hager–Zhang or More–Thuente line search,
//! wraps the objective in an [`ArgMinAdapter`] (which *minimizes* `-f(θ)`),
//! and delegates the run to [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    maximizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, MLEOptions, Objective},
    },
};

/// Maximize `f(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the starting point via `f.check(&theta0, data)`.
/// - Builds the solver named by `opts.line_searcher`.
/// - Runs it and returns the best `θ̂` with `f(θ̂)` and diagnostics.
///
/// # Errors
/// - Anything `f.check` rejects.
/// - Builder errors (invalid tolerances).
/// - Runtime errors from the solver or the objective.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_distfit::optimization::errors::OptResult;
/// use rust_distfit::optimization::maximizer::{maximize, MLEOptions, Objective, Theta};
///
/// struct Bowl;
/// impl Objective for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_distfit::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use crate::optimization::maximizer::{Grad, validation::validate_theta0};
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // End-to-end solves of a concave toy objective with both line searches,
    // with and without an analytic gradient, plus `check` short-circuiting.
    // -------------------------------------------------------------------------

    /// f(θ) = -Σ (θ_i - c_i)², maximized at θ = c.
    struct Bowl {
        analytic: bool,
    }

    impl Objective for Bowl {
        type Data = Array1<f64>;

        fn value(&self, theta: &Theta, centre: &Array1<f64>) -> OptResult<f64> {
            Ok(-(theta - centre).mapv(|d| d * d).sum())
        }

        fn check(&self, theta: &Theta, centre: &Array1<f64>) -> OptResult<()> {
            validate_theta0(theta, centre.len())
        }

        fn grad(&self, theta: &Theta, centre: &Array1<f64>) -> OptResult<Grad> {
            if self.analytic {
                Ok((theta - centre).mapv(|d| -2.0 * d))
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // `maximize` finds the maximizer of a concave quadratic for every line
    // search and gradient source.
    //
    // Given
    // -----
    // - Centre (1.5, -0.5), start (0, 0).
    //
    // Expect
    // ------
    // - θ̂ within 1e-4 of the centre and f(θ̂) ≈ 0.
    fn maximize_recovers_quadratic_optimum() {
        let centre = array![1.5, -0.5];
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            for analytic in [true, false] {
                let opts = MLEOptions { line_searcher: searcher, ..MLEOptions::default() };
                let out = maximize(&Bowl { analytic }, array![0.0, 0.0], &centre, &opts).unwrap();
                for (t, c) in out.theta_hat.iter().zip(centre.iter()) {
                    assert!((t - c).abs() < 1e-4, "{searcher:?}/{analytic}: {t} vs {c}");
                }
                assert!(out.value.abs() < 1e-7);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A starting point rejected by `check` never reaches the solver.
    fn check_failure_short_circuits() {
        let centre = array![0.0, 0.0];
        let res = maximize(&Bowl { analytic: true }, array![0.0], &centre, &MLEOptions::default());
        assert_eq!(res, Err(OptError::ThetaLengthMismatch { expected: 2, actual: 1 }));
    }
}

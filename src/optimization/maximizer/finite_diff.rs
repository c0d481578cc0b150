//! maximizer::finite_diff — derivative-free gradients of the cost.
//!
//! Purpose
//! -------
//! Approximate the gradient of the argmin cost when an [`Objective`] has no
//! analytic gradient. This is the path behind `from_samples_fd`.
//!
//! Key behaviors
//! -------------
//! - [`cost_gradient`] tries central differences first and falls back to
//!   forward differences when the central pass hits an evaluation error or
//!   yields a non-finite gradient.
//! - Errors raised inside the objective cannot cross the `finitediff`
//!   closure boundary; they are parked in a [`RefCell`] slot, the closure
//!   returns `NaN`, and the parked error is surfaced afterwards.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any gradient returned here satisfies [`validate_grad`].
//!
//! [`Objective`]: super::Objective
use crate::optimization::{
    errors::OptResult,
    maximizer::{Grad, Theta, validation::validate_grad},
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference gradient of a fallible `cost` at `theta`.
///
/// # Errors
/// - The first error raised by `cost` on the forward-difference pass.
/// - Validation errors if the forward-difference gradient is non-finite.
pub fn cost_gradient<C>(theta: &Theta, cost: C) -> OptResult<Grad>
where
    C: Fn(&Theta) -> Result<f64, Error>,
{
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let func = |theta: &Theta| -> f64 {
        match cost(theta) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let central = theta.central_diff(&func);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, &func, &closure_err)
}

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, then returns the captured error
/// if `func` parked one, or the validated gradient otherwise.
///
/// # Errors
/// As [`cost_gradient`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Central/forward finite differences on smooth costs, error capture from
    // failing costs, and the central→forward fallback.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A smooth quadratic is differentiated accurately by the central pass.
    fn quadratic_gradient_is_accurate() {
        let theta = array![1.0, -2.0];
        let grad = cost_gradient(&theta, |t: &Theta| Ok(t.dot(t))).unwrap();
        assert!((grad[0] - 2.0).abs() < 1e-5);
        assert!((grad[1] + 4.0).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // An error raised by the cost is surfaced instead of a NaN gradient.
    //
    // Given
    // -----
    // - A cost failing whenever θ₀ > 0.5.
    //
    // Expect
    // ------
    // - The parked `OptError` is returned unchanged.
    fn closure_error_is_propagated() {
        let theta = array![0.5];
        let res = cost_gradient(&theta, |t: &Theta| {
            if t[0] > 0.5 {
                Err(OptError::NonFiniteCost { value: f64::NAN }.into())
            } else {
                Ok(t[0] * t[0])
            }
        });
        assert!(matches!(res, Err(OptError::NonFiniteCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A gradient that is non-finite on every pass yields `InvalidGradient`.
    fn non_finite_gradient_is_rejected() {
        let theta = array![0.0];
        let res = cost_gradient(&theta, |t: &Theta| Ok(if t[0] == 0.0 { 0.0 } else { f64::INFINITY }));
        assert!(matches!(res, Err(OptError::InvalidGradient { .. })));
    }
}

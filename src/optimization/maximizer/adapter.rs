//! Adapter that exposes an [`Objective`] as an `argmin` problem.
//!
//! Maximization of `f(θ)` becomes minimization of `c(θ) = -f(θ)`. Analytic
//! gradients are negated accordingly. Without an analytic gradient the
//! **cost** is finite-differenced, so that branch needs no sign flip.
use crate::optimization::{
    errors::OptError,
    maximizer::{
        finite_diff::cost_gradient,
        traits::Objective,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges an [`Objective`] and its data to argmin's `CostFunction` and
/// `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(θ) = -f(θ)`; a non-finite objective is an [`OptError::NonFiniteCost`].
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `-∇f(θ)` when the objective provides it, otherwise a finite-difference
    /// gradient of the cost (central, then forward on failure).
    ///
    /// # Errors
    /// Objective errors other than [`OptError::GradientNotImplemented`],
    /// cost errors raised during differencing, and gradient validation
    /// failures.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                Ok(cost_gradient(theta, |t: &Theta| self.cost(t))?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Sign conventions of the cost and of both gradient branches.
    // -------------------------------------------------------------------------

    struct Paraboloid {
        analytic: bool,
    }

    impl Objective for Paraboloid {
        type Data = f64;

        fn value(&self, theta: &Theta, shift: &f64) -> OptResult<f64> {
            Ok(-theta.mapv(|t| (t - shift).powi(2)).sum())
        }

        fn check(&self, _theta: &Theta, _shift: &f64) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, shift: &f64) -> OptResult<Grad> {
            if self.analytic {
                Ok(theta.mapv(|t| -2.0 * (t - shift)))
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The cost is the negated objective and both gradient branches return the
    // gradient of that cost.
    //
    // Given
    // -----
    // - f(θ) = -Σ(θ_i - 1)² at θ = (3, -1).
    //
    // Expect
    // ------
    // - c(θ) = 8, ∇c(θ) = (4, -4) analytically and by finite differences.
    fn cost_and_gradients_are_sign_flipped() {
        let shift = 1.0;
        let theta = array![3.0, -1.0];
        for analytic in [true, false] {
            let f = Paraboloid { analytic };
            let adapter = ArgMinAdapter::new(&f, &shift);
            assert_eq!(adapter.cost(&theta).unwrap(), 8.0);
            let g = adapter.gradient(&theta).unwrap();
            assert!((g[0] - 4.0).abs() < 1e-5, "analytic={analytic}: {g:?}");
            assert!((g[1] + 4.0).abs() < 1e-5, "analytic={analytic}: {g:?}");
        }
    }
}

//! Fitting a distribution to a list of conditions.
//!
//! Conditions are normalized onto the fit scale and destructured into
//! `(CondKind, params)` pairs. [`ConditionObjective`] maximizes the negated
//! amplified loss through the cached loss kernels, on either the joint path
//! (one kernel for the whole list) or the per-condition path (one kernel per
//! condition, summed).
use std::sync::Arc;

use ndarray::Array1;

use crate::conditions::{CondKind, Condition};
use crate::distributions::{Dist, DistKind};
use crate::errors::DistResult;
use crate::fitting::FitOptions;
use crate::fitting::params::{params_to_theta, theta_len, theta_to_params};
use crate::fitting::samples::even_params;
use crate::kernels::{KernelCache, LossKernel};
use crate::numeric::try_gradient;
use crate::optimization::errors::{OptError, OptResult};
use crate::optimization::maximizer::{
    Cost, Grad, Objective, Theta, maximize, validation::validate_theta0,
};
use crate::scale::Scale;

/// Negated condition loss as a function of θ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionObjective {
    pub kind: DistKind,
    pub num_components: usize,
    /// Evaluate the whole list in one kernel instead of summing per-condition
    /// kernels.
    pub joint: bool,
}

type Destructured = Vec<(CondKind, Array1<f64>)>;

/// A resolved kernel with the conditions it evaluates.
type BoundKernel = (Arc<LossKernel>, Vec<Condition>);

impl ConditionObjective {
    fn kernels(&self, conditions: &Destructured) -> DistResult<Vec<BoundKernel>> {
        let cache = KernelCache::global();
        if self.joint {
            let (kinds, params): (Vec<CondKind>, Vec<&Array1<f64>>) =
                conditions.iter().map(|(kind, params)| (*kind, params)).unzip();
            let kernel = cache.joint(self.kind, kinds);
            let decoded = kernel.decode(&params)?;
            return Ok(vec![(kernel, decoded)]);
        }
        conditions
            .iter()
            .map(|(kind, params)| {
                let kernel = cache.single(self.kind, *kind);
                let decoded = kernel.decode(&[params])?;
                Ok((kernel, decoded))
            })
            .collect()
    }
}

impl Objective for ConditionObjective {
    type Data = Destructured;

    fn value(&self, theta: &Theta, conditions: &Destructured) -> OptResult<Cost> {
        let params = theta_to_params(self.kind, &theta.to_vec());
        let loss = self
            .kernels(conditions)?
            .iter()
            .try_fold(0.0, |total, (kernel, decoded)| {
                Ok::<_, OptError>(total + kernel.loss(&params, decoded)?)
            })?;
        Ok(-loss)
    }

    fn check(&self, theta: &Theta, conditions: &Destructured) -> OptResult<()> {
        if conditions.is_empty() {
            return Err(OptError::NoConditions);
        }
        validate_theta0(theta, theta_len(self.kind, self.num_components)?)
    }

    fn grad(&self, theta: &Theta, conditions: &Destructured) -> OptResult<Grad> {
        let kind = self.kind;
        self.kernels(conditions)?.iter().try_fold(
            Array1::zeros(theta.len()),
            |total, (kernel, decoded)| {
                let (_, grad) =
                    try_gradient(|vars| kernel.loss(&theta_to_params(kind, vars), decoded), theta)?;
                Ok::<_, OptError>(total - grad)
            },
        )
    }
}

/// Fit a distribution of `kind` to `conditions` stated on `scale`.
///
/// `num_components` must be 1 for component kinds. Starting parameters are
/// evenly spaced components; `options.mle_opts` drives the maximizer and
/// `options.joint_conditions` selects the kernel path.
///
/// # Errors
/// - [`OptError::NoConditions`] for an empty list.
/// - [`OptError::Dist`] for an invalid component count or a condition that
///   cannot be evaluated.
/// - Optimizer errors from [`maximize`].
pub fn fit_conditions(
    kind: DistKind, num_components: usize, conditions: &[Condition], scale: Scale,
    options: &FitOptions,
) -> OptResult<Dist> {
    if conditions.is_empty() {
        return Err(OptError::NoConditions);
    }
    theta_len(kind, num_components)?;
    let destructured: Destructured =
        conditions.iter().map(|c| c.normalize(scale).destructure()).collect();

    let start = if kind.is_mixture() {
        even_params(num_components)
    } else {
        even_params(1)[..2].to_vec()
    };
    let theta0 = Array1::from(params_to_theta(kind, &start));

    log::debug!(
        "fitting {kind} with {num_components} component(s) to {} condition(s) on {scale} ({} kernel)",
        conditions.len(),
        if options.joint_conditions { "joint" } else { "per-condition" },
    );
    let objective = ConditionObjective { kind, num_components, joint: options.joint_conditions };
    let outcome = maximize(&objective, theta0, &destructured, &options.mle_opts)?;
    log::debug!(
        "{kind} condition fit finished: loss = {:.6}, {} iterations, status = {}",
        -outcome.value,
        outcome.iterations,
        outcome.status
    );

    let params = theta_to_params(kind, &outcome.theta_hat.to_vec());
    Ok(Dist::structure(kind, &params, scale)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::IntervalCondition;
    use crate::distributions::Distribution;
    use crate::kernels::{condition_loss, jitted_condition_loss};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Objective values against the public loss kernels, gradient agreement
    // between the two paths, and small end-to-end condition fits.
    // -------------------------------------------------------------------------

    fn destructured(conditions: &[Condition]) -> Destructured {
        conditions.iter().map(|c| c.destructure()).collect()
    }

    fn quartiles() -> Vec<Condition> {
        vec![
            IntervalCondition::new(0.25, None, Some(0.4), 1.0).unwrap().into(),
            IntervalCondition::new(0.5, None, Some(0.5), 1.0).unwrap().into(),
            IntervalCondition::new(0.75, None, Some(0.6), 1.0).unwrap().into(),
        ]
    }

    #[test]
    // Purpose
    // -------
    // The objective is the negated kernel loss of the mapped parameters, and
    // both paths give the same value and gradient.
    fn objective_matches_kernels_on_both_paths() {
        let conditions = destructured(&quartiles());
        let theta = Array1::from(vec![0.3, -2.0, 0.2, 0.6, -1.5, -0.4]);
        let params = Array1::from(theta_to_params(DistKind::LogisticMixture, &theta.to_vec()));

        let joint = ConditionObjective { kind: DistKind::LogisticMixture, num_components: 2, joint: true };
        let split = ConditionObjective { joint: false, ..joint };

        let expected = jitted_condition_loss(DistKind::LogisticMixture, &params, &conditions).unwrap();
        let per = condition_loss(DistKind::LogisticMixture, &params, &conditions).unwrap();
        assert!((joint.value(&theta, &conditions).unwrap() + expected).abs() < 1e-12);
        assert!((split.value(&theta, &conditions).unwrap() + per).abs() < 1e-12);

        let gj = joint.grad(&theta, &conditions).unwrap();
        let gs = split.grad(&theta, &conditions).unwrap();
        for (a, b) in gj.iter().zip(gs.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // An empty condition list is rejected.
    fn empty_conditions_are_rejected() {
        let res = fit_conditions(
            DistKind::Logistic,
            1,
            &[],
            Scale::unit(),
            &FitOptions::default(),
        );
        assert_eq!(res, Err(OptError::NoConditions));
    }

    #[test]
    // Purpose
    // -------
    // A single logistic fitted to symmetric quartile conditions on a
    // non-unit scale recovers the implied location and matches the
    // conditions closely.
    //
    // Given
    // -----
    // - Scale [0, 100]; P(X ≤ 40) = 0.25, P(X ≤ 50) = 0.5, P(X ≤ 60) = 0.75.
    //
    // Expect
    // ------
    // - Median ≈ 50 and cdf(40), cdf(60) within 0.01 of their targets, on
    //   both kernel paths.
    fn logistic_fit_to_quartiles() {
        let scale = Scale::new(0.0, 100.0).unwrap();
        let conditions: Vec<Condition> = vec![
            IntervalCondition::new(0.25, None, Some(40.0), 1.0).unwrap().into(),
            IntervalCondition::new(0.5, None, Some(50.0), 1.0).unwrap().into(),
            IntervalCondition::new(0.75, None, Some(60.0), 1.0).unwrap().into(),
        ];
        for joint_conditions in [true, false] {
            let options = FitOptions { joint_conditions, ..FitOptions::default() };
            let dist = fit_conditions(DistKind::Logistic, 1, &conditions, scale, &options).unwrap();
            assert_eq!(dist.kind(), DistKind::Logistic);
            assert!((dist.ppf(0.5) - 50.0).abs() < 0.5, "median {}", dist.ppf(0.5));
            assert!((dist.cdf(40.0) - 0.25).abs() < 0.01);
            assert!((dist.cdf(60.0) - 0.75).abs() < 0.01);
        }
    }
}

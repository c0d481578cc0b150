//! Condition-loss kernels over flat parameters.
//!
//! Two aggregation paths produce the same number:
//! - per-condition: [`condition_loss`] sums [`single_condition_loss`] over
//!   the list, each condition with its own kernel and its own gradient pass;
//! - joint: [`jitted_condition_loss`] evaluates the whole list in one kernel
//!   and differentiates the sum in one pass.
//!
//! Every loss is `Σ condition.loss(dist) · LOSS_AMPLIFICATION`. Distribution
//! parameters are normalized flat vectors; conditions arrive destructured and
//! normalized to the same unit scale.
use ndarray::Array1;

use crate::conditions::{
    CondKind, Condition, CrossEntropyCondition, FitDescription, IntervalCondition,
    PartialCrossEntropyCondition,
};
use crate::distributions::{Dist, DistKind, TracedDist};
use crate::errors::{DistError, DistResult};
use crate::kernels::LOSS_AMPLIFICATION;
use crate::kernels::cache::KernelCache;
use crate::numeric::{Real, try_gradient};
use crate::scale::Scale;

type Decoder = fn(&[f64]) -> DistResult<Condition>;

fn decode_interval(params: &[f64]) -> DistResult<Condition> {
    IntervalCondition::structure(params).map(Condition::Interval)
}

fn decode_cross_entropy(params: &[f64]) -> DistResult<Condition> {
    CrossEntropyCondition::structure(params).map(Condition::CrossEntropy)
}

fn decode_partial_cross_entropy(params: &[f64]) -> DistResult<Condition> {
    PartialCrossEntropyCondition::structure(params).map(Condition::PartialCrossEntropy)
}

fn decoder(kind: CondKind) -> Decoder {
    match kind {
        CondKind::Interval => decode_interval,
        CondKind::CrossEntropy => decode_cross_entropy,
        CondKind::PartialCrossEntropy => decode_partial_cross_entropy,
    }
}

/// A loss specialized to one distribution kind and a fixed list of
/// condition kinds.
#[derive(Debug)]
pub struct LossKernel {
    dist_kind: DistKind,
    cond_kinds: Vec<CondKind>,
    decoders: Vec<Decoder>,
}

impl LossKernel {
    pub fn build(dist_kind: DistKind, cond_kinds: Vec<CondKind>) -> Self {
        let decoders = cond_kinds.iter().map(|&kind| decoder(kind)).collect();
        Self { dist_kind, cond_kinds, decoders }
    }

    pub fn dist_kind(&self) -> DistKind {
        self.dist_kind
    }

    pub fn cond_kinds(&self) -> &[CondKind] {
        &self.cond_kinds
    }

    /// Structure the kernel's conditions from their flat parameters.
    ///
    /// # Errors
    /// [`DistError::ParamsLengthMismatch`] when the number of parameter
    /// vectors differs from the kernel's arity, and any `structure` error.
    pub fn decode(&self, cond_params: &[&Array1<f64>]) -> DistResult<Vec<Condition>> {
        if cond_params.len() != self.decoders.len() {
            return Err(DistError::ParamsLengthMismatch {
                expected: self.decoders.len(),
                actual: cond_params.len(),
            });
        }
        self.decoders
            .iter()
            .zip(cond_params)
            .map(|(decode, params)| decode(&params.to_vec()))
            .collect()
    }

    /// Amplified loss of decoded conditions at `dist_params`.
    ///
    /// # Errors
    /// Decoding errors of [`TracedDist::from_params`].
    pub fn loss<T: Real>(&self, dist_params: &[T], conditions: &[Condition]) -> DistResult<T> {
        let dist = TracedDist::from_params(self.dist_kind, dist_params)?;
        let total = conditions
            .iter()
            .map(|c| c.traced_loss(&dist))
            .fold(T::constant(0.0), |acc, loss| acc + loss);
        Ok(total * LOSS_AMPLIFICATION)
    }

    /// # Errors
    /// As [`LossKernel::decode`] and [`LossKernel::loss`].
    pub fn value(&self, dist_params: &Array1<f64>, cond_params: &[&Array1<f64>]) -> DistResult<f64> {
        let conditions = self.decode(cond_params)?;
        self.loss(&dist_params.to_vec(), &conditions)
    }

    /// # Errors
    /// As [`LossKernel::decode`] and [`LossKernel::loss`].
    pub fn value_and_grad(
        &self, dist_params: &Array1<f64>, cond_params: &[&Array1<f64>],
    ) -> DistResult<(f64, Array1<f64>)> {
        let conditions = self.decode(cond_params)?;
        try_gradient(|vars| self.loss(vars, &conditions), dist_params)
    }
}

/// Amplified loss of one destructured condition.
///
/// # Errors
/// Decoding errors of the distribution or condition parameters.
pub fn single_condition_loss(
    kind: DistKind, dist_params: &Array1<f64>, cond_kind: CondKind, cond_params: &Array1<f64>,
) -> DistResult<f64> {
    KernelCache::global().single(kind, cond_kind).value(dist_params, &[cond_params])
}

/// Gradient of [`single_condition_loss`] with respect to `dist_params`.
///
/// # Errors
/// As [`single_condition_loss`].
pub fn single_condition_loss_grad(
    kind: DistKind, dist_params: &Array1<f64>, cond_kind: CondKind, cond_params: &Array1<f64>,
) -> DistResult<Array1<f64>> {
    let kernel = KernelCache::global().single(kind, cond_kind);
    kernel.value_and_grad(dist_params, &[cond_params]).map(|(_, grad)| grad)
}

/// Per-condition path: sum of [`single_condition_loss`].
///
/// # Errors
/// The first decoding error among the conditions.
pub fn condition_loss(
    kind: DistKind, dist_params: &Array1<f64>, conditions: &[(CondKind, Array1<f64>)],
) -> DistResult<f64> {
    conditions.iter().try_fold(0.0, |total, (cond_kind, cond_params)| {
        Ok(total + single_condition_loss(kind, dist_params, *cond_kind, cond_params)?)
    })
}

/// Per-condition path: sum of [`single_condition_loss_grad`].
///
/// # Errors
/// As [`condition_loss`].
pub fn condition_loss_grad(
    kind: DistKind, dist_params: &Array1<f64>, conditions: &[(CondKind, Array1<f64>)],
) -> DistResult<Array1<f64>> {
    conditions.iter().try_fold(Array1::zeros(dist_params.len()), |total, (cond_kind, cond_params)| {
        Ok(total + single_condition_loss_grad(kind, dist_params, *cond_kind, cond_params)?)
    })
}

fn joint_parts(conditions: &[(CondKind, Array1<f64>)]) -> (Vec<CondKind>, Vec<&Array1<f64>>) {
    conditions.iter().map(|(kind, params)| (*kind, params)).unzip()
}

/// Joint path: the whole condition list in one kernel.
///
/// # Errors
/// As [`condition_loss`].
pub fn jitted_condition_loss(
    kind: DistKind, dist_params: &Array1<f64>, conditions: &[(CondKind, Array1<f64>)],
) -> DistResult<f64> {
    let (kinds, params) = joint_parts(conditions);
    KernelCache::global().joint(kind, kinds).value(dist_params, &params)
}

/// Joint path: gradient of the whole sum in one pass.
///
/// # Errors
/// As [`condition_loss`].
pub fn jitted_condition_loss_grad(
    kind: DistKind, dist_params: &Array1<f64>, conditions: &[(CondKind, Array1<f64>)],
) -> DistResult<Array1<f64>> {
    let (kinds, params) = joint_parts(conditions);
    let kernel = KernelCache::global().joint(kind, kinds);
    kernel.value_and_grad(dist_params, &params).map(|(_, grad)| grad)
}

/// Structure both sides on the unit scale and describe the fit.
///
/// # Errors
/// Decoding errors of either side.
pub fn describe_fit(
    kind: DistKind, dist_params: &Array1<f64>, cond_kind: CondKind, cond_params: &Array1<f64>,
) -> DistResult<FitDescription> {
    let dist = Dist::structure(kind, &dist_params.to_vec(), Scale::unit())?;
    let condition = Condition::structure(cond_kind, &cond_params.to_vec())?;
    condition.describe_fit(&dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Family, Histogram, Mixture};
    use crate::kernels::cache::KernelKey;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Amplification, agreement of the two aggregation paths, gradients
    // against central differences, and cache population through the public
    // kernels.
    // -------------------------------------------------------------------------

    fn conditions() -> Vec<Condition> {
        vec![
            IntervalCondition::new(0.5, None, Some(0.4), 1.0).unwrap().into(),
            IntervalCondition::new(0.8, Some(0.1), Some(0.9), 2.0).unwrap().into(),
            CrossEntropyCondition::new(
                Histogram::from_densities(&[1.0, 3.0, 5.0, 3.0, 1.0]).unwrap(),
                0.3,
            )
            .unwrap()
            .into(),
            PartialCrossEntropyCondition::new(vec![0.35, 0.6], vec![0.4, 0.2], 0.5).unwrap().into(),
        ]
    }

    fn destructured() -> Vec<(CondKind, Array1<f64>)> {
        conditions().iter().map(Condition::destructure).collect()
    }

    fn params() -> Array1<f64> {
        array![0.3, 0.1, 0.45, 0.65, 0.15, 0.55]
    }

    #[test]
    // Purpose
    // -------
    // A single-condition kernel is the object-level loss times 100.
    fn single_loss_is_amplified_object_loss() {
        let dist = Mixture::from_params(Family::Logistic, &params().to_vec(), Scale::unit()).unwrap();
        for cond in conditions() {
            let (cond_kind, cond_params) = cond.destructure();
            let kernel =
                single_condition_loss(DistKind::LogisticMixture, &params(), cond_kind, &cond_params)
                    .unwrap();
            let object = cond.loss(&dist).unwrap();
            assert!((kernel - LOSS_AMPLIFICATION * object).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Joint and per-condition paths agree on value and gradient.
    fn joint_and_per_condition_paths_agree() {
        let conds = destructured();
        let kind = DistKind::LogisticMixture;
        let a = condition_loss(kind, &params(), &conds).unwrap();
        let b = jitted_condition_loss(kind, &params(), &conds).unwrap();
        assert!((a - b).abs() < 1e-9);

        let ga = condition_loss_grad(kind, &params(), &conds).unwrap();
        let gb = jitted_condition_loss_grad(kind, &params(), &conds).unwrap();
        for (x, y) in ga.iter().zip(gb.iter()) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // The joint gradient matches central differences of the joint loss.
    fn joint_gradient_matches_finite_differences() {
        let conds = destructured();
        let kind = DistKind::NormalMixture;
        let p = params();
        let grad = jitted_condition_loss_grad(kind, &p, &conds).unwrap();
        let h = 1e-6;
        for i in 0..p.len() {
            let (mut up, mut down) = (p.clone(), p.clone());
            up[i] += h;
            down[i] -= h;
            let fd = (jitted_condition_loss(kind, &up, &conds).unwrap()
                - jitted_condition_loss(kind, &down, &conds).unwrap())
                / (2.0 * h);
            assert!((grad[i] - fd).abs() < 1e-4 * (1.0 + fd.abs()), "i = {i}: {} vs {fd}", grad[i]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Calling the public kernels populates the global cache under the
    // expected keys.
    fn public_kernels_populate_global_cache() {
        let conds = destructured();
        let kind = DistKind::NormalMixture;
        jitted_condition_loss(kind, &params(), &conds).unwrap();
        condition_loss(kind, &params(), &conds).unwrap();

        let cache = KernelCache::global();
        let kinds: Vec<CondKind> = conds.iter().map(|(k, _)| *k).collect();
        assert!(cache.contains(&KernelKey::Joint(kind, kinds)));
        assert!(cache.contains(&KernelKey::Single(kind, CondKind::PartialCrossEntropy)));
    }

    #[test]
    // Purpose
    // -------
    // A parameter vector of the wrong length is reported, not evaluated.
    fn malformed_condition_params_propagate() {
        let err = single_condition_loss(
            DistKind::Logistic,
            &array![0.5, 0.1],
            CondKind::Interval,
            &array![0.5],
        )
        .unwrap_err();
        assert_eq!(err, DistError::ParamsLengthMismatch { expected: 4, actual: 1 });
    }

    #[test]
    // Purpose
    // -------
    // `describe_fit` reports the achieved probability of an interval.
    fn describe_fit_from_flat_params() {
        let cond = IntervalCondition::new(0.5, None, Some(0.5), 1.0).unwrap();
        let (kind, cond_params) = Condition::from(cond).destructure();
        let desc = describe_fit(DistKind::Logistic, &array![0.5, 0.1], kind, &cond_params).unwrap();
        assert!((desc.achieved_p.unwrap() - 0.5).abs() < 1e-12);
        assert!(desc.loss < 1e-20);
    }
}

//! Cross-entropy conditions against a full or partial reference.
//!
//! - [`CrossEntropyCondition`] compares a candidate with a [`Histogram`] on
//!   the normalized grid.
//! - [`PartialCrossEntropyCondition`] scores a candidate on weighted points
//!   `(xs, ps)` whose masses need not sum to one, so it can describe part of
//!   a distribution.
use ndarray::Array1;

use crate::conditions::{traced_view, validate_weight};
use crate::distributions::{Distribution, Histogram, TracedDist};
use crate::errors::{DistError, DistResult};
use crate::numeric::Real;
use crate::scale::Scale;

#[derive(Debug, Clone, PartialEq)]
pub struct CrossEntropyCondition {
    p_dist: Histogram,
    weight: f64,
}

impl CrossEntropyCondition {
    /// # Errors
    /// [`DistError::InvalidConditionParam`] for a negative or non-finite
    /// weight; [`DistError::EmptyData`] for an empty histogram.
    pub fn new(p_dist: Histogram, weight: f64) -> DistResult<Self> {
        if p_dist.is_empty() {
            return Err(DistError::EmptyData);
        }
        Ok(Self { p_dist, weight: validate_weight(weight)? })
    }

    pub fn p_dist(&self) -> &Histogram {
        &self.p_dist
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn traced_loss<T: Real>(&self, dist: &TracedDist<T>) -> T {
        self.p_dist.cross_entropy(dist) * self.weight
    }

    /// Loss against `dist`; the histogram already lives on the normalized
    /// grid.
    ///
    /// # Errors
    /// Propagates decoding errors of the distribution's flat parameters.
    pub fn loss<D: Distribution + ?Sized>(&self, dist: &D) -> DistResult<f64> {
        Ok(self.traced_loss(&traced_view(dist)?))
    }

    /// Flat form `[weight, logps...]`.
    pub fn destructure(&self) -> Vec<f64> {
        std::iter::once(self.weight).chain(self.p_dist.logps().iter().copied()).collect()
    }

    /// # Errors
    /// [`DistError::ParamsLengthMismatch`] for fewer than two values.
    pub fn structure(params: &[f64]) -> DistResult<Self> {
        let [weight, logps @ ..] = params else {
            return Err(DistError::ParamsLengthMismatch { expected: 2, actual: 0 });
        };
        if logps.is_empty() {
            return Err(DistError::ParamsLengthMismatch { expected: 2, actual: params.len() });
        }
        Self::new(Histogram::from_logps(Array1::from(logps.to_vec())), *weight)
    }
}

impl std::fmt::Display for CrossEntropyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Minimize the cross-entropy of the two distributions")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialCrossEntropyCondition {
    xs: Vec<f64>,
    ps: Vec<f64>,
    weight: f64,
}

impl PartialCrossEntropyCondition {
    /// # Errors
    /// - [`DistError::EmptyData`] for no points.
    /// - [`DistError::ParamsLengthMismatch`] when `xs` and `ps` differ in
    ///   length.
    /// - [`DistError::NonFiniteData`] for a non-finite `x`.
    /// - [`DistError::InvalidProbability`] for a negative or non-finite mass.
    /// - [`DistError::InvalidConditionParam`] for an unusable weight.
    pub fn new(xs: Vec<f64>, ps: Vec<f64>, weight: f64) -> DistResult<Self> {
        if xs.is_empty() {
            return Err(DistError::EmptyData);
        }
        if xs.len() != ps.len() {
            return Err(DistError::ParamsLengthMismatch { expected: xs.len(), actual: ps.len() });
        }
        if let Some((index, &value)) = xs.iter().enumerate().find(|(_, x)| !x.is_finite()) {
            return Err(DistError::NonFiniteData { index, value });
        }
        if let Some((index, &value)) =
            ps.iter().enumerate().find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(DistError::InvalidProbability { index, value });
        }
        Ok(Self { xs, ps, weight: validate_weight(weight)? })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ps(&self) -> &[f64] {
        &self.ps
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn traced_loss<T: Real>(&self, dist: &TracedDist<T>) -> T {
        let log_score = self
            .xs
            .iter()
            .zip(&self.ps)
            .map(|(&x, &p)| dist.logpdf(x) * p)
            .fold(T::constant(0.0), |acc, term| acc + term);
        -log_score * self.weight
    }

    /// Loss against `dist`, with `xs` stated on the true scale.
    ///
    /// # Errors
    /// Propagates decoding errors of the distribution's flat parameters.
    pub fn loss<D: Distribution + ?Sized>(&self, dist: &D) -> DistResult<f64> {
        Ok(self.normalize(dist.scale()).traced_loss(&traced_view(dist)?))
    }

    /// Flat form `[weight, xs..., ps...]`.
    pub fn destructure(&self) -> Vec<f64> {
        std::iter::once(self.weight)
            .chain(self.xs.iter().copied())
            .chain(self.ps.iter().copied())
            .collect()
    }

    /// # Errors
    /// [`DistError::ParamsLengthMismatch`] unless the length is `1 + 2n` with
    /// `n >= 1`, plus the validation of [`PartialCrossEntropyCondition::new`].
    pub fn structure(params: &[f64]) -> DistResult<Self> {
        let [weight, rest @ ..] = params else {
            return Err(DistError::ParamsLengthMismatch { expected: 3, actual: 0 });
        };
        if rest.is_empty() || rest.len() % 2 != 0 {
            return Err(DistError::ParamsLengthMismatch {
                expected: 1 + 2 * (rest.len() / 2).max(1),
                actual: params.len(),
            });
        }
        let (xs, ps) = rest.split_at(rest.len() / 2);
        Self::new(xs.to_vec(), ps.to_vec(), *weight)
    }

    pub fn normalize(&self, scale: Scale) -> Self {
        Self { xs: scale.normalize_points(&self.xs), ps: self.ps.clone(), weight: self.weight }
    }

    pub fn denormalize(&self, scale: Scale) -> Self {
        Self { xs: scale.denormalize_points(&self.xs), ps: self.ps.clone(), weight: self.weight }
    }
}

impl std::fmt::Display for PartialCrossEntropyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Minimize the cross-entropy of the two distributions (p may be partial)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::DistKind;

    #[test]
    // Purpose
    // -------
    // Partial cross-entropy is `-w Σ p_i logpdf(x_i)` and is lowest for the
    // candidate centred on the heaviest points.
    fn partial_cross_entropy_prefers_matching_location() {
        let cond = PartialCrossEntropyCondition::new(vec![0.4, 0.5, 0.6], vec![0.2, 0.5, 0.2], 3.0)
            .unwrap();
        let at = |loc: f64| {
            let d = TracedDist::from_params(DistKind::Normal, &[loc, 0.1]).unwrap();
            cond.traced_loss(&d)
        };
        let d = TracedDist::from_params(DistKind::Normal, &[0.5, 0.1]).unwrap();
        let expected = -3.0
            * (0.2 * d.logpdf(0.4) + 0.5 * d.logpdf(0.5) + 0.2 * d.logpdf(0.6));
        assert!((at(0.5) - expected).abs() < 1e-12);
        assert!(at(0.3) > at(0.5));
        assert!(at(0.7) > at(0.5));
    }

    #[test]
    // Purpose
    // -------
    // Flat layouts round-trip and reject malformed lengths.
    fn structure_layouts() {
        let partial =
            PartialCrossEntropyCondition::new(vec![1.0, 2.0], vec![0.3, 0.3], 1.5).unwrap();
        assert_eq!(PartialCrossEntropyCondition::structure(&partial.destructure()).unwrap(), partial);
        assert!(PartialCrossEntropyCondition::structure(&[1.0, 2.0]).is_err());
        assert!(PartialCrossEntropyCondition::structure(&[]).is_err());

        let hist = Histogram::from_densities(&[1.0, 2.0, 1.0]).unwrap();
        let full = CrossEntropyCondition::new(hist, 0.7).unwrap();
        assert_eq!(CrossEntropyCondition::structure(&full.destructure()).unwrap(), full);
        assert!(CrossEntropyCondition::structure(&[0.7]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Normalizing maps the support points and leaves masses untouched.
    fn normalize_maps_points_only() {
        let scale = Scale::new(10.0, 20.0).unwrap();
        let cond = PartialCrossEntropyCondition::new(vec![12.0, 15.0], vec![0.1, 0.9], 1.0).unwrap();
        let n = cond.normalize(scale);
        assert_eq!(n.xs(), &[0.2, 0.5]);
        assert_eq!(n.ps(), cond.ps());
        let back = n.denormalize(scale);
        assert!((back.xs()[0] - 12.0).abs() < 1e-12);
    }
}

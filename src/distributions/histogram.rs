//! Histogram — a reference distribution on a fixed normalized grid.
//!
//! The grid has `n` bin centres `x_i = (i + 0.5) / n` on `[0, 1]`. Masses are
//! stored as log-probabilities that sum (in probability space) to one. The
//! histogram is the `p` side of a cross-entropy condition; its
//! [`Histogram::cross_entropy`] scores a candidate `q` evaluated on the same
//! grid and renormalized there.
use ndarray::Array1;

use crate::distributions::{Distribution, TracedDist};
use crate::errors::{DistError, DistResult};
use crate::numeric::{Real, log_sum_exp};

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    logps: Array1<f64>,
}

impl Histogram {
    /// Build from non-negative bin densities; masses are normalized.
    ///
    /// # Errors
    /// - [`DistError::EmptyData`] for no bins.
    /// - [`DistError::InvalidProbability`] for a negative or non-finite bin.
    /// - [`DistError::ZeroMass`] when every bin is zero.
    pub fn from_densities(ps: &[f64]) -> DistResult<Self> {
        if ps.is_empty() {
            return Err(DistError::EmptyData);
        }
        if let Some((index, &value)) =
            ps.iter().enumerate().find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(DistError::InvalidProbability { index, value });
        }
        let total: f64 = ps.iter().sum();
        if total <= 0.0 {
            return Err(DistError::ZeroMass);
        }
        Ok(Self { logps: ps.iter().map(|p| (p / total).ln()).collect() })
    }

    /// Trusted path for log-probabilities already normalized on the grid.
    pub fn from_logps(logps: Array1<f64>) -> Self {
        Self { logps }
    }

    /// Discretize a distribution onto an `n`-bin grid over its normalized
    /// support.
    ///
    /// # Errors
    /// [`DistError::EmptyData`] when `n == 0`.
    pub fn from_distribution<D: Distribution + ?Sized>(dist: &D, n: usize) -> DistResult<Self> {
        if n == 0 {
            return Err(DistError::EmptyData);
        }
        let scores: Vec<f64> = Self::grid(n).iter().map(|&x| dist.logpdf(x)).collect();
        let norm = log_sum_exp(&scores);
        Ok(Self { logps: scores.iter().map(|s| s - norm).collect() })
    }

    /// Bin centres `(i + 0.5) / n`.
    pub fn grid(n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|i| (i as f64 + 0.5) / n as f64))
    }

    pub fn logps(&self) -> &Array1<f64> {
        &self.logps
    }

    pub fn len(&self) -> usize {
        self.logps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logps.is_empty()
    }

    /// `H(p, q) = -Σ p_i ln q̂_i` with `q̂` the grid-renormalized density of
    /// `q`.
    pub fn cross_entropy<T: Real>(&self, q: &TracedDist<T>) -> T {
        let grid = Self::grid(self.len());
        let q_scores: Vec<T> = grid.iter().map(|&x| q.logpdf(x)).collect();
        let norm = log_sum_exp(&q_scores);
        self.logps
            .iter()
            .zip(q_scores)
            .map(|(&logp, score)| (score - norm.clone()) * -logp.exp())
            .fold(T::constant(0.0), |acc, term| acc + term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Component, DistKind};
    use crate::scale::Scale;

    #[test]
    // Purpose
    // -------
    // Cross-entropy is minimized, and equals the entropy, when `q` is the
    // distribution the histogram was built from.
    fn cross_entropy_is_minimal_at_source() {
        let source = Component::logistic(0.4, 0.08, Scale::unit());
        let hist = Histogram::from_distribution(&source, 100).unwrap();
        let entropy: f64 = -hist.logps().iter().map(|l| l.exp() * l).sum::<f64>();

        let at = |loc: f64| {
            let q = TracedDist::from_params(DistKind::Logistic, &[loc, 0.08]).unwrap();
            hist.cross_entropy(&q)
        };
        assert!((at(0.4) - entropy).abs() < 1e-9);
        assert!(at(0.5) > at(0.4));
        assert!(at(0.3) > at(0.4));
    }

    #[test]
    // Purpose
    // -------
    // Densities are normalized and invalid bins rejected.
    fn from_densities_normalizes() {
        let hist = Histogram::from_densities(&[1.0, 3.0]).unwrap();
        assert!((hist.logps()[1].exp() - 0.75).abs() < 1e-12);
        assert_eq!(Histogram::from_densities(&[0.0, 0.0]), Err(DistError::ZeroMass));
        assert!(matches!(
            Histogram::from_densities(&[1.0, -1.0]),
            Err(DistError::InvalidProbability { index: 1, .. })
        ));
    }
}

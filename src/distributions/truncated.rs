//! TruncatedMixture — a mixture restricted to `[floor, ceiling]` for display.
//!
//! Density and cdf are renormalized by the mass the untruncated mixture
//! assigns to the window. Not used by any fitting path; the log-domain
//! kernels never see the truncation.
use crate::distributions::{Distribution, Mixture};
use crate::errors::{DistError, DistResult};

#[derive(Debug, Clone, PartialEq)]
pub struct TruncatedMixture {
    mixture: Mixture,
    floor: f64,
    ceiling: f64,
}

impl TruncatedMixture {
    /// Truncate `mixture` to the true-scale window `[floor, ceiling]`.
    ///
    /// # Errors
    /// - [`DistError::InvalidScale`] when `floor >= ceiling`.
    /// - [`DistError::ZeroMass`] when the window carries no probability.
    pub fn new(mixture: Mixture, floor: f64, ceiling: f64) -> DistResult<Self> {
        if !(floor < ceiling) {
            return Err(DistError::InvalidScale { low: floor, high: ceiling });
        }
        let truncated = Self { mixture, floor, ceiling };
        if truncated.inside_mass() <= 0.0 {
            return Err(DistError::ZeroMass);
        }
        Ok(truncated)
    }

    pub fn mixture(&self) -> &Mixture {
        &self.mixture
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.floor, self.ceiling)
    }

    fn inside_mass(&self) -> f64 {
        self.mixture.cdf(self.ceiling) - self.mixture.cdf(self.floor)
    }

    /// True-scale density, zero outside the window.
    pub fn pdf(&self, x: f64) -> f64 {
        if x < self.floor || x > self.ceiling {
            return 0.0;
        }
        self.mixture.pdf(x) / self.inside_mass()
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.floor {
            return 0.0;
        }
        if x >= self.ceiling {
            return 1.0;
        }
        (self.mixture.cdf(x) - self.mixture.cdf(self.floor)) / self.inside_mass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::Component;
    use crate::scale::Scale;

    #[test]
    // Purpose
    // -------
    // The truncated density integrates to one over the window and vanishes
    // outside it.
    fn truncated_pdf_renormalizes() {
        let scale = Scale::new(0.0, 10.0).unwrap();
        let m = Mixture::new(
            vec![Component::logistic(3.0, 1.0, scale), Component::logistic(7.0, 1.5, scale)],
            vec![0.5, 0.5],
        )
        .unwrap();
        let t = TruncatedMixture::new(m, 2.0, 8.0).unwrap();

        let n = 6000;
        let h = 6.0 / n as f64;
        let integral: f64 = (0..n).map(|i| t.pdf(2.0 + (i as f64 + 0.5) * h) * h).sum();
        assert!((integral - 1.0).abs() < 1e-6, "integral = {integral}");
        assert_eq!(t.pdf(1.0), 0.0);
        assert_eq!(t.cdf(8.5), 1.0);
        assert!((t.cdf(5.0) - (t.mixture().cdf(5.0) - t.mixture().cdf(2.0)) / (t.mixture().cdf(8.0) - t.mixture().cdf(2.0))).abs() < 1e-12);
    }
}

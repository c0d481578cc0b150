//! Mixture — weighted same-family components on one shared scale.
//!
//! Purpose
//! -------
//! Aggregate [`Component`]s into a finite mixture: log-density by
//! log-sum-exp, cdf as the exact weighted sum, and a quantile function
//! solved by bracketed root finding.
//!
//! Key behaviors
//! -------------
//! - Construction validates family, scale and probability vector eagerly.
//! - `ppf` never fails. It root-finds `cdf(x) - q` with Brent's method inside
//!   `[cmin - |cmin/100|, cmax + |cmax/100|]` (component quantile bounds),
//!   retries inside `[scale.low, scale.high]`, and finally returns the
//!   midpoint `(cmin + cmax) / 2`, with infinite bounds clamped to the scale.
//!   Each fallback tier logs a warning; the midpoint can be an inaccurate
//!   quantile.
//! - `from_params` reshapes flat `(loc, s, prob)` rows without fitting.
//!
//! Invariants & assumptions
//! ------------------------
//! - `components.len() == probs.len() >= 1`.
//! - Every component shares `family` and `scale`.
//! - Probabilities are finite, non-negative and carry positive mass; they
//!   are not renormalized.
use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentRoot;
use ndarray::Array1;
use rand::RngCore;
use rand::distributions::{Distribution as _, WeightedIndex};

use crate::distributions::{Component, DistKind, Distribution, Family};
use crate::errors::{DistError, DistResult};
use crate::numeric::log_sum_exp;
use crate::scale::Scale;

/// Iteration cap for each root-finding tier of [`Mixture::ppf`].
pub const PPF_MAX_ITERS: u64 = 1000;

/// Absolute tolerance handed to Brent's method.
pub const PPF_TOL: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    family: Family,
    components: Vec<Component>,
    probs: Vec<f64>,
    scale: Scale,
}

impl Mixture {
    /// Build a mixture from components and mixing probabilities.
    ///
    /// # Errors
    /// - [`DistError::EmptyMixture`] for no components.
    /// - [`DistError::ProbsLengthMismatch`] when lengths differ.
    /// - [`DistError::FamilyMismatch`] / [`DistError::ScaleMismatch`] for the
    ///   first component that disagrees with component 0.
    /// - [`DistError::InvalidProbability`] / [`DistError::ZeroMass`] for an
    ///   unusable probability vector.
    pub fn new(components: Vec<Component>, probs: Vec<f64>) -> DistResult<Self> {
        let first = components.first().ok_or(DistError::EmptyMixture)?;
        if components.len() != probs.len() {
            return Err(DistError::ProbsLengthMismatch {
                components: components.len(),
                probs: probs.len(),
            });
        }
        let (family, scale) = (first.family(), first.scale());
        for (index, component) in components.iter().enumerate() {
            if component.family() != family {
                return Err(DistError::FamilyMismatch { index });
            }
            if component.scale() != scale {
                return Err(DistError::ScaleMismatch { index });
            }
        }
        for (index, &value) in probs.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(DistError::InvalidProbability { index, value });
            }
        }
        if probs.iter().sum::<f64>() <= 0.0 {
            return Err(DistError::ZeroMass);
        }
        Ok(Self { family, components, probs, scale })
    }

    /// Reshape flat rows `(loc, s, prob)` of normalized parameters into a
    /// mixture on `scale`. No optimization happens here.
    ///
    /// # Errors
    /// - [`DistError::EmptyMixture`] for an empty vector.
    /// - [`DistError::ParamsLengthMismatch`] when the length is not a multiple
    ///   of three.
    /// - Any error from [`Mixture::new`].
    pub fn from_params(family: Family, params: &[f64], scale: Scale) -> DistResult<Self> {
        if params.is_empty() {
            return Err(DistError::EmptyMixture);
        }
        if params.len() % 3 != 0 {
            return Err(DistError::ParamsLengthMismatch {
                expected: 3 * (params.len() / 3 + 1),
                actual: params.len(),
            });
        }
        let (components, probs) = params
            .chunks_exact(3)
            .map(|row| (Component::from_normalized(family, row[0], row[1], scale), row[2]))
            .unzip();
        Self::new(components, probs)
    }

    /// One-component mixture with probability one.
    pub fn from_single(component: Component) -> Self {
        Self {
            family: component.family(),
            scale: component.scale(),
            components: vec![component],
            probs: vec![1.0],
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Smallest and largest component quantile at `q`.
    fn component_ppf_bounds(&self, q: f64) -> (f64, f64) {
        self.components.iter().map(|c| c.ppf(q)).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), x| (lo.min(x), hi.max(x)),
        )
    }

    /// Quantile search inside an explicit first bracket, with the scale and
    /// midpoint fallbacks.
    pub(crate) fn ppf_with_bracket(&self, q: f64, bracket: (f64, f64), bounds: (f64, f64)) -> f64 {
        if let Some(x) = self.find_root(q, bracket) {
            return x;
        }
        log::warn!(
            "mixture ppf: no root of cdf(x) - {q} in [{}, {}]; retrying on {}",
            bracket.0,
            bracket.1,
            self.scale
        );
        if let Some(x) = self.find_root(q, (self.scale.low, self.scale.high)) {
            return x;
        }
        let midpoint = self.finite_midpoint(bounds);
        log::warn!("mixture ppf: root finding failed for q = {q}; using midpoint {midpoint}");
        midpoint
    }

    /// Midpoint of the component quantile bounds, with infinite bounds
    /// clamped to the scale. Falls back to the scale midpoint when the bounds
    /// carry no usable number.
    fn finite_midpoint(&self, (cmin, cmax): (f64, f64)) -> f64 {
        let onto_scale = |x: f64, fallback: f64| match x {
            f64::NEG_INFINITY => self.scale.low,
            f64::INFINITY => self.scale.high,
            x if x.is_nan() => fallback,
            x => x,
        };
        let midpoint = (onto_scale(cmin, self.scale.low) + onto_scale(cmax, self.scale.high)) / 2.0;
        if midpoint.is_finite() {
            midpoint
        } else {
            (self.scale.low + self.scale.high) / 2.0
        }
    }

    /// Brent root of `cdf(x) - q` in `bracket`, or `None` when the bracket
    /// has no sign change or the solver does not converge.
    fn find_root(&self, q: f64, (low, high): (f64, f64)) -> Option<f64> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return None;
        }
        let problem = QuantileGap { mixture: self, q };
        let solver = BrentRoot::new(low, high, PPF_TOL);
        let result = Executor::new(problem, solver)
            .configure(|state| state.max_iters(PPF_MAX_ITERS))
            .run()
            .ok()?;
        let state = result.state();
        let converged = matches!(
            state.get_termination_status(),
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        );
        let x = state.get_param().copied().filter(|x| x.is_finite())?;
        (converged || (self.cdf(x) - q).abs() <= PPF_TOL.sqrt()).then_some(x)
    }
}

/// Root-finding problem `x ↦ cdf(x) - q`.
struct QuantileGap<'a> {
    mixture: &'a Mixture,
    q: f64,
}

impl CostFunction for QuantileGap<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, argmin::core::Error> {
        Ok(self.mixture.cdf(*x) - self.q)
    }
}

impl Distribution for Mixture {
    fn kind(&self) -> DistKind {
        self.family.mixture_kind()
    }

    fn scale(&self) -> Scale {
        self.scale
    }

    fn logpdf(&self, x: f64) -> f64 {
        let scores: Vec<f64> = self
            .components
            .iter()
            .zip(&self.probs)
            .map(|(c, &p)| c.logpdf(x) + p.ln())
            .collect();
        log_sum_exp(&scores)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.components.iter().zip(&self.probs).map(|(c, &p)| p * c.cdf(x)).sum()
    }

    fn ppf(&self, q: f64) -> f64 {
        if let [only] = self.components.as_slice() {
            return only.ppf(q);
        }
        let (cmin, cmax) = self.component_ppf_bounds(q);
        let bracket = (cmin - (cmin / 100.0).abs(), cmax + (cmax / 100.0).abs());
        self.ppf_with_bracket(q, bracket, (cmin, cmax))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        // Mass is checked at construction, so the index distribution exists.
        let index = match WeightedIndex::new(&self.probs) {
            Ok(categorical) => categorical.sample(rng),
            Err(_) => 0,
        };
        self.components[index].sample(rng)
    }

    fn normalize(&self) -> Self {
        Self {
            family: self.family,
            components: self.components.iter().map(|c| c.normalize()).collect(),
            probs: self.probs.clone(),
            scale: Scale::unit(),
        }
    }

    fn denormalize(&self, scale: Scale) -> Self {
        Self {
            family: self.family,
            components: self.components.iter().map(|c| c.denormalize(scale)).collect(),
            probs: self.probs.clone(),
            scale,
        }
    }

    fn destructure(&self) -> (DistKind, Array1<f64>) {
        let params = self
            .components
            .iter()
            .zip(&self.probs)
            .flat_map(|(c, &p)| [c.loc(), c.s(), p])
            .collect();
        (self.kind(), params)
    }
}

impl std::fmt::Display for Mixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Mixture[", self.family.name())?;
        for (i, (c, p)) in self.components.iter().zip(&self.probs).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p:.3} * {c}")?;
        }
        write!(f, "]")
    }
}

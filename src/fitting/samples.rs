//! Maximum-likelihood fits of mixtures and components to samples.
//!
//! Data are normalized onto the fit scale, θ is initialized per
//! [`Init`](super::Init), and [`SampleLikelihood`] is maximized with the
//! L-BFGS maximizer. The gradient path differentiates the mixture kernel
//! through the θ mapping with dual numbers; the finite-difference path asks
//! the maximizer to difference the same objective.
use ndarray::Array1;

use crate::distributions::{Component, DistKind, Family, Mixture};
use crate::errors::{DistError, DistResult};
use crate::fitting::params::{params_to_theta, theta_len, theta_to_params};
use crate::fitting::{FitOptions, Init};
use crate::kernels::params_logpdf;
use crate::numeric::try_gradient;
use crate::optimization::errors::{OptError, OptResult};
use crate::optimization::maximizer::{
    Cost, Grad, Objective, Theta, maximize, validation::validate_theta0,
};
use crate::scale::Scale;

/// Log-likelihood of normalized samples as a function of θ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleLikelihood {
    pub family: Family,
    pub num_components: usize,
    /// When `false`, [`Objective::grad`] is left to finite differences.
    pub analytic_grad: bool,
}

impl SampleLikelihood {
    fn kind(&self) -> DistKind {
        self.family.mixture_kind()
    }
}

impl Objective for SampleLikelihood {
    type Data = Vec<f64>;

    fn value(&self, theta: &Theta, data: &Vec<f64>) -> OptResult<Cost> {
        let theta = theta.to_vec();
        let params = theta_to_params(self.kind(), &theta);
        Ok(params_logpdf(self.family, &params, data)?)
    }

    fn check(&self, theta: &Theta, data: &Vec<f64>) -> OptResult<()> {
        if data.is_empty() {
            return Err(DistError::EmptyData.into());
        }
        validate_theta0(theta, theta_len(self.kind(), self.num_components)?)
    }

    fn grad(&self, theta: &Theta, data: &Vec<f64>) -> OptResult<Grad> {
        if !self.analytic_grad {
            return Err(OptError::GradientNotImplemented);
        }
        let kind = self.kind();
        let (_, grad) =
            try_gradient(|vars| params_logpdf(self.family, &theta_to_params(kind, vars), data), theta)?;
        Ok(grad)
    }
}

fn validate_data(data: &[f64]) -> DistResult<()> {
    if data.is_empty() {
        return Err(DistError::EmptyData);
    }
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DistError::NonFiniteData { index, value: data[index] }),
        None => Ok(()),
    }
}

/// Linear-interpolation quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let (lo, hi) = (pos.floor() as usize, pos.ceil() as usize);
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Normalized starting parameters: rows `(loc, s, 1/k)`.
fn initial_params(init: Init, normalized: &[f64], k: usize) -> Vec<f64> {
    let prob = 1.0 / k as f64;
    match init {
        Init::Even => even_params(k),
        Init::Quantiles => {
            let mut sorted = normalized.to_vec();
            sorted.sort_by(f64::total_cmp);
            let n = sorted.len() as f64;
            let mean = sorted.iter().sum::<f64>() / n;
            let sd = (sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
            let s = (sd / k as f64).max(0.05);
            (0..k)
                .flat_map(|i| [quantile(&sorted, (i as f64 + 0.5) / k as f64), s, prob])
                .collect()
        }
    }
}

/// Rows `(loc, s, 1/k)` with locations at `(i + 0.5)/k` and `s = 0.25/k`.
pub(crate) fn even_params(k: usize) -> Vec<f64> {
    let (prob, s) = (1.0 / k as f64, 0.25 / k as f64);
    (0..k).flat_map(|i| [(i as f64 + 0.5) / k as f64, s, prob]).collect()
}

fn fit_mixture(
    family: Family, data: &[f64], num_components: usize, scale: Option<Scale>,
    options: &FitOptions, analytic_grad: bool,
) -> OptResult<Mixture> {
    validate_data(data)?;
    let kind = family.mixture_kind();
    theta_len(kind, num_components)?;
    let scale = match scale {
        Some(scale) => scale,
        None => Scale::from_data(data)?,
    };
    let normalized = scale.normalize_points(data);
    let theta0 = Array1::from(params_to_theta(
        kind,
        &initial_params(options.init, &normalized, num_components),
    ));

    log::debug!(
        "fitting {kind} with {num_components} component(s) to {} samples on {scale} ({} gradient)",
        data.len(),
        if analytic_grad { "autodiff" } else { "finite-difference" },
    );
    let objective = SampleLikelihood { family, num_components, analytic_grad };
    let outcome = maximize(&objective, theta0, &normalized, &options.mle_opts)?;
    log::debug!(
        "{kind} sample fit finished: loglik = {:.6}, {} iterations, status = {}",
        outcome.value,
        outcome.iterations,
        outcome.status
    );

    let params = theta_to_params(kind, &outcome.theta_hat.to_vec());
    Ok(Mixture::from_params(family, &params, scale)?)
}

impl Mixture {
    /// Maximum-likelihood mixture of `num_components` components fitted to
    /// `data` with autodiff gradients.
    ///
    /// `scale` defaults to the range of the data.
    ///
    /// # Errors
    /// - [`DistError::EmptyData`] / [`DistError::NonFiniteData`] for unusable
    ///   data, [`DistError::InvalidComponentCount`] for zero components
    ///   (wrapped in [`OptError::Dist`]).
    /// - Optimizer errors from [`maximize`].
    pub fn from_samples(
        family: Family, data: &[f64], num_components: usize, scale: Option<Scale>,
        options: &FitOptions,
    ) -> OptResult<Self> {
        fit_mixture(family, data, num_components, scale, options, true)
    }

    /// As [`Mixture::from_samples`], with finite-difference gradients of the
    /// same objective.
    ///
    /// # Errors
    /// As [`Mixture::from_samples`].
    pub fn from_samples_fd(
        family: Family, data: &[f64], num_components: usize, scale: Option<Scale>,
        options: &FitOptions,
    ) -> OptResult<Self> {
        fit_mixture(family, data, num_components, scale, options, false)
    }
}

impl Component {
    /// Maximum-likelihood single component: a one-component mixture fit.
    ///
    /// # Errors
    /// As [`Mixture::from_samples`].
    pub fn from_samples(
        family: Family, data: &[f64], scale: Option<Scale>, options: &FitOptions,
    ) -> OptResult<Self> {
        let mixture = Mixture::from_samples(family, data, 1, scale, options)?;
        mixture.components().first().cloned().ok_or(OptError::Dist(DistError::EmptyMixture))
    }
}

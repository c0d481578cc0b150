//! Flat-parameter log-likelihood kernels.
//!
//! Mixture parameters arrive as rows `(loc, s, prob)` of a flat slice. The
//! optimization kernels floor spreads at [`OPT_SPREAD_FLOOR`], which is
//! coarser than the evaluation floor: it keeps L-BFGS trajectories away from
//! collapsing components rather than only guarding the final density.
use ndarray::Array1;

use crate::distributions::{DistKind, Family, TracedDist};
use crate::errors::{DistError, DistResult};
use crate::kernels::OPT_SPREAD_FLOOR;
use crate::numeric::{Dual, Real, gradient, log_sum_exp, try_gradient};

fn check_rows(len: usize) -> DistResult<()> {
    if len == 0 {
        return Err(DistError::EmptyMixture);
    }
    if len % 3 != 0 {
        return Err(DistError::ParamsLengthMismatch { expected: 3 * (len / 3 + 1), actual: len });
    }
    Ok(())
}

fn logpdf1_rows<T: Real>(family: Family, params: &[T], datum: f64) -> T {
    let x = T::constant(datum);
    let scores: Vec<T> = params
        .chunks_exact(3)
        .map(|row| {
            let s = row[1].clone().floor_at(OPT_SPREAD_FLOOR);
            family.logpdf(x.clone(), row[0].clone(), s) + row[2].clone().ln()
        })
        .collect();
    log_sum_exp(&scores)
}

/// Mixture log-density of one normalized datum.
///
/// # Errors
/// [`DistError::EmptyMixture`] / [`DistError::ParamsLengthMismatch`] when
/// `params` is not a non-empty sequence of rows.
pub fn params_logpdf1<T: Real>(family: Family, params: &[T], datum: f64) -> DistResult<T> {
    check_rows(params.len())?;
    Ok(logpdf1_rows(family, params, datum))
}

/// Total log-likelihood of a batch of normalized data.
///
/// # Errors
/// As [`params_logpdf1`].
pub fn params_logpdf<T: Real>(family: Family, params: &[T], data: &[f64]) -> DistResult<T> {
    check_rows(params.len())?;
    Ok(data
        .iter()
        .map(|&x| logpdf1_rows(family, params, x))
        .fold(T::constant(0.0), |acc, score| acc + score))
}

/// Gradient of [`params_logpdf`] with respect to `params`.
///
/// # Errors
/// As [`params_logpdf1`].
pub fn params_gradlogpdf(
    family: Family, params: &Array1<f64>, data: &[f64],
) -> DistResult<Array1<f64>> {
    check_rows(params.len())?;
    let (_, grad) = gradient(
        |vars| {
            data.iter()
                .map(|&x| logpdf1_rows(family, vars, x))
                .fold(Dual::constant(0.0), |acc, score| acc + score)
        },
        params,
    );
    Ok(grad)
}

/// Negative log-likelihood of normalized `data` under the distribution
/// encoded by `(kind, params)`, evaluated with the evaluation floor.
///
/// # Errors
/// Decoding errors of [`TracedDist::from_params`].
pub fn dist_logloss<T: Real>(kind: DistKind, params: &[T], data: &[f64]) -> DistResult<T> {
    let dist = TracedDist::from_params(kind, params)?;
    let total = data.iter().map(|&x| dist.logpdf(x)).fold(T::constant(0.0), |acc, s| acc + s);
    Ok(-total)
}

/// Gradient of [`dist_logloss`] with respect to `params`.
///
/// # Errors
/// As [`dist_logloss`].
pub fn dist_grad_logloss(
    kind: DistKind, params: &Array1<f64>, data: &[f64],
) -> DistResult<Array1<f64>> {
    try_gradient(|vars| dist_logloss(kind, vars, data), params).map(|(_, grad)| grad)
}

/// `Σ_k |Σ_{i≤k} (xs_i - ys_i)|`: the 1-Wasserstein distance between two
/// histograms on the same unit-spaced grid.
///
/// # Errors
/// [`DistError::ParamsLengthMismatch`] when lengths differ.
pub fn wasserstein_distance(xs: &[f64], ys: &[f64]) -> DistResult<f64> {
    if xs.len() != ys.len() {
        return Err(DistError::ParamsLengthMismatch { expected: xs.len(), actual: ys.len() });
    }
    let mut running = 0.0;
    Ok(xs
        .iter()
        .zip(ys)
        .map(|(x, y)| {
            running += x - y;
            running.abs()
        })
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Distribution, Mixture};
    use crate::scale::Scale;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Kernel values against the object path, the spread floor, and autodiff
    // gradients against central differences.
    // -------------------------------------------------------------------------

    fn central_grad<F: Fn(&Array1<f64>) -> f64>(f: F, x: &Array1<f64>) -> Array1<f64> {
        let h = 1e-6;
        Array1::from_iter((0..x.len()).map(|i| {
            let (mut up, mut down) = (x.clone(), x.clone());
            up[i] += h;
            down[i] -= h;
            (f(&up) - f(&down)) / (2.0 * h)
        }))
    }

    #[test]
    // Purpose
    // -------
    // With spreads above the optimization floor the kernel equals the
    // object-level mixture log-density.
    fn logpdf1_matches_mixture_object() {
        let params = [0.3, 0.05, 0.4, 0.7, 0.1, 0.6];
        let m = Mixture::from_params(Family::Logistic, &params, Scale::unit()).unwrap();
        for &x in &[0.0, 0.3, 0.55, 0.9] {
            let k = params_logpdf1(Family::Logistic, &params, x).unwrap();
            assert!((k - m.logpdf(x)).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Spreads below 0.01 are evaluated at 0.01 in the optimization kernel.
    fn logpdf1_floors_spread() {
        let tiny = params_logpdf1(Family::Normal, &[0.5, 1e-5, 1.0], 0.5).unwrap();
        let floor = params_logpdf1(Family::Normal, &[0.5, 0.01, 1.0], 0.5).unwrap();
        assert_eq!(tiny, floor);
    }

    #[test]
    // Purpose
    // -------
    // Autodiff gradients of the batch log-likelihood and of the negative
    // log-loss agree with central differences.
    //
    // Given
    // -----
    // - A two-component normal mixture and five normalized data points.
    //
    // Expect
    // ------
    // - Component-wise agreement within 1e-5.
    fn gradients_agree_with_finite_differences() {
        let params = array![0.25, 0.08, 0.35, 0.7, 0.12, 0.65];
        let data = [0.1, 0.2, 0.45, 0.7, 0.8];

        let grad = params_gradlogpdf(Family::Normal, &params, &data).unwrap();
        let fd = central_grad(
            |p| params_logpdf(Family::Normal, p.as_slice().unwrap(), &data).unwrap(),
            &params,
        );
        for (g, f) in grad.iter().zip(fd.iter()) {
            assert!((g - f).abs() < 1e-5, "autodiff {g} vs fd {f}");
        }

        let grad = dist_grad_logloss(DistKind::NormalMixture, &params, &data).unwrap();
        for (g, f) in grad.iter().zip(fd.iter()) {
            assert!((g + f).abs() < 1e-5, "logloss {g} vs -fd {f}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Malformed parameter vectors are rejected before evaluation.
    fn rejects_malformed_rows() {
        assert_eq!(
            params_logpdf1(Family::Logistic, &[0.5, 0.1], 0.5),
            Err(DistError::ParamsLengthMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(params_logpdf::<f64>(Family::Logistic, &[], &[0.5]), Err(DistError::EmptyMixture));
    }

    #[test]
    // Purpose
    // -------
    // Wasserstein distance on a grid is the summed absolute cumulative gap.
    fn wasserstein_on_shifted_mass() {
        let d = wasserstein_distance(&[1.0, 0.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(d, 2.0);
        assert_eq!(wasserstein_distance(&[0.2, 0.8], &[0.2, 0.8]).unwrap(), 0.0);
        assert!(wasserstein_distance(&[1.0], &[]).is_err());
    }
}

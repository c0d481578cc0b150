//! Unconstrained parameterization of distribution parameters.
//!
//! The optimizer works on θ, the kernels on normalized distribution
//! parameters. Per component θ holds `(loc, softplus⁻¹(s))`, and mixtures
//! append a logit per row:
//!
//! ```text
//! component  θ = [loc, raw_s]                  → [loc, softplus(raw_s)]
//! mixture    θ = [loc_i, raw_s_i, logit_i]_i   → [loc_i, softplus(raw_s_i), softmax(logit)_i]_i
//! ```
//!
//! [`theta_to_params`] is generic over [`Real`], so autodiff differentiates
//! straight through the mapping.
use crate::distributions::DistKind;
use crate::errors::{DistError, DistResult};
use crate::kernels::EVAL_SPREAD_FLOOR;
use crate::numeric::{Real, softmax, softplus, softplus_inv};

/// Length of θ for `num_components` components of `kind`.
///
/// # Errors
/// [`DistError::InvalidComponentCount`] for zero components, or for more
/// than one component of a non-mixture kind.
pub fn theta_len(kind: DistKind, num_components: usize) -> DistResult<usize> {
    match (kind.is_mixture(), num_components) {
        (_, 0) => Err(DistError::InvalidComponentCount { count: 0 }),
        (true, k) => Ok(3 * k),
        (false, 1) => Ok(2),
        (false, count) => Err(DistError::InvalidComponentCount { count }),
    }
}

/// Map θ to normalized distribution parameters.
///
/// `theta.len()` is assumed to be a valid [`theta_len`] for `kind`; a
/// trailing partial row is ignored.
pub fn theta_to_params<T: Real>(kind: DistKind, theta: &[T]) -> Vec<T> {
    if !kind.is_mixture() {
        return match theta {
            [loc, raw_s, ..] => vec![loc.clone(), softplus(raw_s.clone())],
            _ => Vec::new(),
        };
    }
    let rows: Vec<&[T]> = theta.chunks_exact(3).collect();
    let logits: Vec<T> = rows.iter().map(|row| row[2].clone()).collect();
    rows.iter()
        .zip(softmax(&logits))
        .flat_map(|(row, prob)| [row[0].clone(), softplus(row[1].clone()), prob])
        .collect()
}

/// Inverse of [`theta_to_params`] for starting points.
///
/// Spreads are floored at [`EVAL_SPREAD_FLOOR`] and probabilities at
/// `1e-12` before the inverse transforms; logits are `ln p`, which softmax
/// maps back to the normalized probabilities.
pub fn params_to_theta(kind: DistKind, params: &[f64]) -> Vec<f64> {
    let raw_s = |s: f64| softplus_inv(s.max(EVAL_SPREAD_FLOOR));
    if !kind.is_mixture() {
        return match params {
            [loc, s, ..] => vec![*loc, raw_s(*s)],
            _ => Vec::new(),
        };
    }
    params
        .chunks_exact(3)
        .flat_map(|row| [row[0], raw_s(row[1]), row[2].max(1e-12).ln()])
        .collect()
}

//! TracedDist — the flat-parameter view of a distribution inside a
//! differentiated computation.
//!
//! A [`TracedDist`] is decoded from `(DistKind, &[T])` and evaluates
//! log-density and cdf on normalized points with the scalar type `T`, so the
//! same loss code serves the value path (`f64`) and the gradient path
//! ([`crate::numeric::Dual`]). Object identity never enters: only the kind
//! tag and the numbers do.
use crate::distributions::{DistKind, Family};
use crate::errors::{DistError, DistResult};
use crate::kernels::EVAL_SPREAD_FLOOR;
use crate::numeric::{Real, log_sum_exp};

#[derive(Debug, Clone)]
struct Row<T> {
    loc: T,
    s: T,
    prob: T,
}

#[derive(Debug, Clone)]
pub struct TracedDist<T> {
    kind: DistKind,
    rows: Vec<Row<T>>,
}

impl<T: Real> TracedDist<T> {
    /// Decode a flat normalized parameter vector.
    ///
    /// Layout is `(loc, s)` for a single component and rows of
    /// `(loc, s, prob)` for a mixture. Spreads are floored at
    /// [`EVAL_SPREAD_FLOOR`].
    ///
    /// # Errors
    /// [`DistError::ParamsLengthMismatch`] / [`DistError::EmptyMixture`] when
    /// the length does not fit `kind`.
    pub fn from_params(kind: DistKind, params: &[T]) -> DistResult<Self> {
        let rows = if kind.is_mixture() {
            if params.is_empty() {
                return Err(DistError::EmptyMixture);
            }
            if params.len() % 3 != 0 {
                return Err(DistError::ParamsLengthMismatch {
                    expected: 3 * (params.len() / 3 + 1),
                    actual: params.len(),
                });
            }
            params
                .chunks_exact(3)
                .map(|row| Row {
                    loc: row[0].clone(),
                    s: row[1].clone().floor_at(EVAL_SPREAD_FLOOR),
                    prob: row[2].clone(),
                })
                .collect()
        } else {
            if params.len() != 2 {
                return Err(DistError::ParamsLengthMismatch { expected: 2, actual: params.len() });
            }
            vec![Row {
                loc: params[0].clone(),
                s: params[1].clone().floor_at(EVAL_SPREAD_FLOOR),
                prob: T::constant(1.0),
            }]
        };
        Ok(Self { kind, rows })
    }

    pub fn kind(&self) -> DistKind {
        self.kind
    }

    pub fn family(&self) -> Family {
        self.kind.family()
    }

    /// Log-density at a normalized point.
    pub fn logpdf(&self, x: f64) -> T {
        let family = self.family();
        let x = T::constant(x);
        if let [row] = self.rows.as_slice() {
            if !self.kind.is_mixture() {
                return family.logpdf(x, row.loc.clone(), row.s.clone());
            }
        }
        let scores: Vec<T> = self
            .rows
            .iter()
            .map(|row| family.logpdf(x.clone(), row.loc.clone(), row.s.clone()) + row.prob.clone().ln())
            .collect();
        log_sum_exp(&scores)
    }

    /// Cdf at a normalized point; `±inf` map to the constants 1 and 0.
    pub fn cdf(&self, x: f64) -> T {
        if x == f64::INFINITY {
            return T::constant(1.0);
        }
        if x == f64::NEG_INFINITY {
            return T::constant(0.0);
        }
        let family = self.family();
        let x = T::constant(x);
        self.rows
            .iter()
            .map(|row| family.cdf(x.clone(), row.loc.clone(), row.s.clone()) * row.prob.clone())
            .fold(T::constant(0.0), |acc, term| acc + term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Component, Distribution, Mixture};
    use crate::scale::Scale;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Agreement of the flat view with the object view, and length checks.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Decoding an object's destructured parameters reproduces its normalized
    // log-density and cdf.
    fn traced_view_matches_objects() {
        let scale = Scale::new(0.0, 40.0).unwrap();
        let mixture = Mixture::new(
            vec![Component::normal(10.0, 3.0, scale), Component::normal(25.0, 5.0, scale)],
            vec![0.4, 0.6],
        )
        .unwrap();
        let component = Component::logistic(18.0, 2.0, scale);

        for dist in [&mixture as &dyn Distribution, &component as &dyn Distribution] {
            let (kind, params) = dist.destructure();
            let traced = TracedDist::from_params(kind, params.as_slice().unwrap()).unwrap();
            for &x in &[0.1, 0.33, 0.5, 0.9] {
                assert!((traced.logpdf(x) - dist.logpdf(x)).abs() < 1e-12);
                let cdf = dist.cdf(scale.denormalize_point(x));
                assert!((traced.cdf(x) - cdf).abs() < 1e-12);
            }
            assert_eq!(traced.cdf(f64::INFINITY), 1.0);
            assert_eq!(traced.cdf(f64::NEG_INFINITY), 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Lengths that do not fit the kind are rejected.
    fn from_params_rejects_bad_lengths() {
        assert!(matches!(
            TracedDist::from_params(DistKind::Logistic, &[0.5, 0.1, 1.0]),
            Err(DistError::ParamsLengthMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            TracedDist::<f64>::from_params(DistKind::NormalMixture, &[]),
            Err(DistError::EmptyMixture)
        ));
    }
}

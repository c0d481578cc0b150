//! optimization — objective maximizer and its error surface.
//!
//! Purpose
//! -------
//! Give the fitting layer a solver it can drive without touching argmin:
//! implement [`maximizer::Objective`], pick [`maximizer::MLEOptions`], get
//! back an [`maximizer::OptimOutcome`].
//!
//! Key behaviors
//! -------------
//! - [`maximizer`] wraps argmin's L-BFGS (More–Thuente or Hager–Zhang line
//!   search) behind a maximization API with a finite-difference fallback.
//! - [`errors::OptError`] normalizes configuration mistakes, numerical
//!   failures, argmin backend errors and distribution errors into one enum.
//!
//! Conventions
//! -----------
//! - Public entry points that can fail return [`errors::OptResult`]; raw
//!   argmin errors never leak.
//! - The layer does not log by itself except through the optional
//!   `obs_slog` observer.
pub mod errors;
pub mod maximizer;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::maximizer::prelude::*;
}

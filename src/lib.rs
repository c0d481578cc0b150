//! rust_distfit — logistic/normal distributions, their mixtures, and fits to
//! samples and probabilistic conditions.
//!
//! Purpose
//! -------
//! Serve as the crate root. The crate models one-dimensional distributions
//! on an affine [`scale::Scale`], expresses evidence about them as
//! [`conditions::Condition`]s, and fits distribution parameters to samples or
//! to condition lists by gradient-based optimization.
//!
//! Key behaviors
//! -------------
//! - [`distributions`]: components, mixtures (with a quantile solver that
//!   never fails), histograms, and the [`distributions::Distribution`] trait.
//! - [`conditions`]: interval, cross-entropy and partial cross-entropy
//!   conditions with weighted losses and flat destructured forms.
//! - [`kernels`]: pure functions of flat parameter vectors (log-likelihoods,
//!   amplified condition losses and their gradients) plus a process-wide
//!   kernel cache.
//! - [`numeric`]: the [`numeric::Real`] scalar abstraction, forward-mode
//!   dual numbers and stable transforms.
//! - [`optimization`]: argmin L-BFGS behind a maximization API.
//! - [`fitting`]: sample and condition fits built on the layers above.
//!
//! Invariants & assumptions
//! ------------------------
//! - Distributions and conditions are immutable values; every transformation
//!   returns a new object.
//! - Densities, losses and kernels work on normalized coordinates; object
//!   methods taking true-scale inputs say so.
//!
//! Conventions
//! -----------
//! - Construction errors are [`errors::DistError`]; optimizer and fit errors
//!   are [`optimization::errors::OptError`], which wraps the former.
//! - Logging goes through the `log` facade; the crate installs no logger.
//!
//! Downstream usage
//! ----------------
//! - `use rust_distfit::prelude::*;` imports the common surface.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds end-to-end fits and
//!   the cross-module properties (quantile round trips, density mass,
//!   parameter recovery).
pub mod conditions;
pub mod distributions;
pub mod errors;
pub mod fitting;
pub mod kernels;
pub mod numeric;
pub mod optimization;
pub mod scale;

pub mod prelude {
    pub use crate::conditions::prelude::*;
    pub use crate::distributions::prelude::*;
    pub use crate::errors::{DistError, DistResult};
    pub use crate::fitting::prelude::*;
    pub use crate::kernels::prelude::*;
    pub use crate::numeric::prelude::*;
    pub use crate::optimization::prelude::*;
    pub use crate::scale::Scale;
}

//! Errors for distribution, mixture and condition construction.
//!
//! This module defines [`DistError`], raised whenever an object-level value
//! cannot be built from its inputs: a component without a scale, a mixture
//! whose components disagree on family or scale, a flat parameter vector of
//! the wrong length handed to `structure`, or unusable sample data.
//!
//! ## Conventions
//! - Construction fails loudly; nothing is coerced into a valid state except
//!   degenerate spreads, which are clamped (see `distributions::component`).
//! - Indices are 0-based.
//! - Optimizer failures are not represented here; they live in
//!   [`crate::optimization::errors::OptError`], which wraps this type.

/// Result alias for construction and structuring paths.
pub type DistResult<T> = Result<T, DistError>;

/// Unified error type for distribution and condition construction.
#[derive(Debug, Clone, PartialEq)]
pub enum DistError {
    // ---- Scale ----
    /// Neither a scale nor the normalized-parameter flag was supplied.
    MissingScale,

    /// Scale bounds must be finite with `low < high`.
    InvalidScale { low: f64, high: f64 },

    // ---- Mixture invariants ----
    /// A mixture needs at least one component.
    EmptyMixture,

    /// Number of mixing probabilities differs from the number of components.
    ProbsLengthMismatch { components: usize, probs: usize },

    /// Component `index` lives on a different scale than the mixture.
    ScaleMismatch { index: usize },

    /// Component `index` belongs to a different family than the mixture.
    FamilyMismatch { index: usize },

    /// Mixing probability must be finite and non-negative.
    InvalidProbability { index: usize, value: f64 },

    /// Mixing probabilities carry no mass.
    ZeroMass,

    // ---- Flat parameter round trip ----
    /// Flat parameter vector has the wrong length for the requested shape.
    ParamsLengthMismatch { expected: usize, actual: usize },

    // ---- Fitting inputs ----
    /// Sample data is empty.
    EmptyData,

    /// A data point is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// Number of mixture components must be at least one.
    InvalidComponentCount { count: usize },

    /// A condition parameter is out of its domain.
    InvalidConditionParam { name: &'static str, value: f64, reason: &'static str },
}

impl std::error::Error for DistError {}

impl std::fmt::Display for DistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Scale ----
            DistError::MissingScale => {
                write!(f, "Either a Scale or normalized parameters are required.")
            }
            DistError::InvalidScale { low, high } => {
                write!(f, "Scale bounds must be finite with low < high; got ({low}, {high}).")
            }
            // ---- Mixture invariants ----
            DistError::EmptyMixture => {
                write!(f, "A mixture needs at least one component.")
            }
            DistError::ProbsLengthMismatch { components, probs } => {
                write!(f, "Mixture has {components} components but {probs} probabilities.")
            }
            DistError::ScaleMismatch { index } => {
                write!(f, "Component {index} does not share the mixture's scale.")
            }
            DistError::FamilyMismatch { index } => {
                write!(f, "Component {index} does not belong to the mixture's family.")
            }
            DistError::InvalidProbability { index, value } => {
                write!(f, "Mixing probability at index {index} must be finite and >= 0; got {value}")
            }
            DistError::ZeroMass => {
                write!(f, "Mixing probabilities must have positive total mass.")
            }
            // ---- Flat parameter round trip ----
            DistError::ParamsLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, got {actual}")
            }
            // ---- Fitting inputs ----
            DistError::EmptyData => {
                write!(f, "Sample data is empty.")
            }
            DistError::NonFiniteData { index, value } => {
                write!(f, "Data point at index {index} is non-finite: {value}")
            }
            DistError::InvalidComponentCount { count } => {
                write!(f, "Number of mixture components must be >= 1; got {count}")
            }
            DistError::InvalidConditionParam { name, value, reason } => {
                write!(f, "Invalid condition parameter {name} = {value}: {reason}")
            }
        }
    }
}

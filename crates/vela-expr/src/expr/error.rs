//! Expression and constraint construction errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("[EXPR_MIXED_INPUTS] Use either terms or variables/coefficients, not both")]
    MixedInputs,
    #[error("[EXPR_MISSING_INPUTS] variables and coefficients are required")]
    MissingInputs,
    #[error("[EXPR_MISMATCHED_LENGTHS] variables and coefficients must have the same length")]
    MismatchedLengths,
    #[error("[EXPR_DEGREE_OVERFLOW] product has degree {degree}; at most 2 is supported")]
    DegreeOverflow { degree: usize },
    #[error("[EXPR_NON_FINITE] coefficient {coefficient} is not finite")]
    NonFiniteCoefficient { coefficient: f64 },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::MixedInputs => "EXPR_MIXED_INPUTS",
            ExprError::MissingInputs => "EXPR_MISSING_INPUTS",
            ExprError::MismatchedLengths => "EXPR_MISMATCHED_LENGTHS",
            ExprError::DegreeOverflow { .. } => "EXPR_DEGREE_OVERFLOW",
            ExprError::NonFiniteCoefficient { .. } => "EXPR_NON_FINITE",
        }
    }
}

/// A function/set pairing that cannot form a valid constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetError {
    #[error("[SET_NON_FINITE_BOUND] bound {value} is not finite")]
    NonFiniteBound { value: f64 },
    #[error("[SET_INVALID_INTERVAL] interval lower ({lower}) > upper ({upper})")]
    InvalidInterval { lower: f64, upper: f64 },
    #[error("[SET_CONE_TOO_SMALL] {set} needs dimension >= {minimum} (got {dimension})")]
    ConeTooSmall {
        set: &'static str,
        dimension: usize,
        minimum: usize,
    },
    #[error("[SET_DIMENSION_MISMATCH] {set} expects {expected} components (got {actual})")]
    DimensionMismatch {
        set: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("[SET_SCALAR_EXPECTED] {set} takes a scalar function")]
    ScalarExpected { set: &'static str },
    #[error("[SET_VECTOR_EXPECTED] {set} takes a vector function")]
    VectorExpected { set: &'static str },
    #[error("[SET_DEGREE_UNSUPPORTED] {set} does not accept degree {degree} functions")]
    DegreeUnsupported { set: &'static str, degree: usize },
    #[error("[SET_INVALID_FUNCTION] {0}")]
    InvalidFunction(#[from] ExprError),
}

impl SetError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SetError::NonFiniteBound { .. } => "SET_NON_FINITE_BOUND",
            SetError::InvalidInterval { .. } => "SET_INVALID_INTERVAL",
            SetError::ConeTooSmall { .. } => "SET_CONE_TOO_SMALL",
            SetError::DimensionMismatch { .. } => "SET_DIMENSION_MISMATCH",
            SetError::ScalarExpected { .. } => "SET_SCALAR_EXPECTED",
            SetError::VectorExpected { .. } => "SET_VECTOR_EXPECTED",
            SetError::DegreeUnsupported { .. } => "SET_DEGREE_UNSUPPORTED",
            SetError::InvalidFunction(_) => "SET_INVALID_FUNCTION",
        }
    }
}

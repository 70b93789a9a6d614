//! Solver error types.

use thiserror::Error;
use vela_core::{ConstraintKind, VariableCategory};
use vela_expr::ids::EntityKind;

use crate::index::{ConstraintIndex, VariableIndex};

/// Error type for backend operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Backend does not implement this attribute.
    #[error("[SOLVER_UNSUPPORTED_ATTRIBUTE] Attribute {attribute} is not supported")]
    UnsupportedAttribute { attribute: String },
    /// Backend does not implement this operation.
    #[error("[SOLVER_UNSUPPORTED_OPERATION] Operation {operation} is not supported")]
    UnsupportedOperation { operation: &'static str },
    /// Attribute value of the wrong type was supplied or returned.
    #[error("[SOLVER_ATTRIBUTE_TYPE] Attribute {attribute} expects a {expected} value")]
    AttributeType {
        attribute: String,
        expected: &'static str,
    },
    /// Variable index unknown to the backend.
    #[error("[SOLVER_INVALID_INDEX] {0} does not exist in the backend")]
    InvalidVariableIndex(VariableIndex),
    /// Constraint index unknown to the backend.
    #[error("[SOLVER_INVALID_INDEX] {0} does not exist in the backend")]
    InvalidConstraintIndex(ConstraintIndex),
    /// Backend could not be instantiated.
    #[error("[SOLVER_CREATE_FAILED] Backend could not be created: {0}")]
    CreateFailed(String),
    /// Internal solver error.
    #[error("[SOLVER_INTERNAL] Solver internal error: {0}")]
    InternalError(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::UnsupportedAttribute { .. } => "SOLVER_UNSUPPORTED_ATTRIBUTE",
            SolverError::UnsupportedOperation { .. } => "SOLVER_UNSUPPORTED_OPERATION",
            SolverError::AttributeType { .. } => "SOLVER_ATTRIBUTE_TYPE",
            SolverError::InvalidVariableIndex(_) | SolverError::InvalidConstraintIndex(_) => {
                "SOLVER_INVALID_INDEX"
            }
            SolverError::CreateFailed(_) => "SOLVER_CREATE_FAILED",
            SolverError::InternalError(_) => "SOLVER_INTERNAL",
        }
    }

    /// True for replies that mean "not implemented" rather than "failed".
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            SolverError::UnsupportedAttribute { .. } | SolverError::UnsupportedOperation { .. }
        )
    }
}

/// The backend cannot hold some part of the cached model.
///
/// Fatal to the attach or sync that triggered the copy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CopyError {
    #[error("[COPY_UNSUPPORTED_CONSTRAINT] {backend} cannot represent {kind} constraints")]
    UnsupportedConstraint {
        backend: String,
        kind: ConstraintKind,
    },
    #[error("[COPY_UNSUPPORTED_VARIABLE] {backend} cannot represent {} variables", .category.as_str())]
    UnsupportedVariable {
        backend: String,
        category: VariableCategory,
    },
    #[error("[COPY_UNSUPPORTED_OBJECTIVE] {backend} cannot represent a degree {degree} objective")]
    UnsupportedObjective { backend: String, degree: usize },
    #[error("[COPY_RECEIPT_MISMATCH] copy returned {actual} {kind} indices for {expected} cached entries")]
    ReceiptMismatch {
        kind: EntityKind,
        expected: usize,
        actual: usize,
    },
    #[error("[COPY_BACKEND] {0}")]
    Backend(#[from] SolverError),
}

impl CopyError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            CopyError::UnsupportedConstraint { .. } => "COPY_UNSUPPORTED_CONSTRAINT",
            CopyError::UnsupportedVariable { .. } => "COPY_UNSUPPORTED_VARIABLE",
            CopyError::UnsupportedObjective { .. } => "COPY_UNSUPPORTED_OBJECTIVE",
            CopyError::ReceiptMismatch { .. } => "COPY_RECEIPT_MISMATCH",
            CopyError::Backend(_) => "COPY_BACKEND",
        }
    }
}

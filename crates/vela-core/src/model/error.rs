//! Model error types.

use thiserror::Error;
use vela_expr::ids::{ConstraintId, EntityKind, EntityRef, VariableId};
use vela_expr::{ExprError, SetError};

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Invalid variable ID
    #[error("[VARIABLE_INVALID_ID] Variable ID {} does not exist", .0.inner())]
    InvalidVariableId(VariableId),
    /// Invalid constraint ID
    #[error("[CONSTRAINT_INVALID_ID] Constraint ID {} does not exist", .0.inner())]
    InvalidConstraintId(ConstraintId),
    /// Invalid variable bounds
    #[error("[VARIABLE_INVALID_BOUNDS] Variable bounds invalid: lower ({lower}) > upper ({upper})")]
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Bound update incompatible with the bounds already present
    #[error("[VARIABLE_BOUND_CONFLICT] {variable}: {reason}")]
    BoundConflict {
        variable: VariableId,
        reason: &'static str,
    },
    /// Another entity of the same kind already holds the name
    #[error("[NAME_CONFLICT] {kind} name '{name}' is already used by {holder}")]
    NameConflict {
        kind: EntityKind,
        name: String,
        holder: EntityRef,
    },
    /// Name is not a valid identifier
    #[error("[NAME_INVALID] '{name}' is not a valid name (letter first, then letters, digits or '_'; not a keyword)")]
    InvalidName { name: String },
    /// Constraint function/set pairing rejected
    #[error("[CONSTRAINT_INVALID] {0}")]
    InvalidConstraint(#[from] SetError),
    /// Expression rejected
    #[error("[EXPRESSION_INVALID] {0}")]
    InvalidExpression(#[from] ExprError),
    /// No objective set
    #[error("[OBJECTIVE_MISSING] Model has no objective defined")]
    NoObjective,
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::BoundConflict { .. } => "VARIABLE_BOUND_CONFLICT",
            ModelError::NameConflict { .. } => "NAME_CONFLICT",
            ModelError::InvalidName { .. } => "NAME_INVALID",
            ModelError::InvalidConstraint(_) => "CONSTRAINT_INVALID",
            ModelError::InvalidExpression(_) => "EXPRESSION_INVALID",
            ModelError::NoObjective => "OBJECTIVE_MISSING",
        }
    }

    /// Duplicate names and invalid re-bounds.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ModelError::NameConflict { .. } | ModelError::BoundConflict { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_code() {
        let errors = [
            ModelError::InvalidVariableId(VariableId::new(3)),
            ModelError::InvalidConstraintId(ConstraintId::new(4)),
            ModelError::InvalidVariableBounds {
                lower: 2.0,
                upper: 1.0,
            },
            ModelError::NameConflict {
                kind: EntityKind::Variable,
                name: "x".to_string(),
                holder: EntityRef::Variable(VariableId::new(0)),
            },
            ModelError::NoObjective,
        ];
        for err in errors {
            assert!(
                err.to_string().starts_with(&format!("[{}]", err.code())),
                "{err}"
            );
        }
    }

    #[test]
    fn conflict_classification() {
        assert!(ModelError::BoundConflict {
            variable: VariableId::new(0),
            reason: "fixed"
        }
        .is_conflict());
        assert!(!ModelError::NoObjective.is_conflict());
    }
}

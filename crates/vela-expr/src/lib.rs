//! Stable ids, expressions, and constraint sets shared by every vela crate.

pub mod expr;
pub mod ids;

pub use expr::{
    linear_sum, linear_terms, triangular_number, vector_of, ConstraintExpr, ConstraintFunction,
    ConstraintSet, Expr, ExprError, SetError, SetShape,
};
pub use ids::{ConstraintId, EntityKind, EntityRef, VariableId};

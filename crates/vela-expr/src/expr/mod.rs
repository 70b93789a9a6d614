//! Expression types for optimization modeling.
//!
//! - `core`: `Expr`, terms by degree plus a constant
//! - `sets`: `ConstraintSet`, the closed enumeration of sets and cones
//! - `constraint`: `ConstraintExpr`, a validated function/set pair
//! - `builders`: helpers for assembling expressions
//! - `error`: expression and constraint construction errors

pub mod builders;
pub mod constraint;
pub mod core;
pub mod error;
pub mod sets;

pub use builders::{linear_sum, linear_terms, vector_of};
pub use constraint::{ConstraintExpr, ConstraintFunction};
pub use core::Expr;
pub use error::{ExprError, SetError};
pub use sets::{triangular_number, ConstraintSet, SetShape};

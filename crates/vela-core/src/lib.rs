//! Vela model cache: the backend-independent copy of an optimization problem.

pub mod model;
pub mod types;

pub use model::{ModelCache, ModelError, ParseError};
pub use types::{
    Bounds, ConstraintKind, FunctionKind, Objective, Sense, Variable, VariableCategory,
};

//! Model cache: the backend-independent store of an optimization problem.
//!
//! This module provides the core [`ModelCache`] type.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding, changing, and removing entities
//! - [`storage`]: Read access and ordered listings
//! - [`metadata`]: Variable and constraint naming and metadata
//! - [`text`]: Line-oriented text form (emit)
//! - [`parse`]: Line-oriented text form (parse)

mod builder;
mod error;
mod metadata;
mod parse;
mod storage;
mod text;

use crate::types::{Objective, Variable};
use std::collections::BTreeMap;
use vela_expr::ids::{ConstraintId, VariableId};
use vela_expr::{ConstraintExpr, Expr};

pub use error::ModelError;
pub use parse::ParseError;

pub(crate) use metadata::NameTable;

/// Canonical, backend-independent store of variables, constraints, objective
/// and names.
///
/// Ids are handed out from monotonically increasing counters and are never
/// reused, even after removal. Every successful mutation bumps
/// [`generation`](ModelCache::generation), which downstream index maps and
/// result records use to detect that they describe an older model.
///
/// The cache is a single-writer structure and is not internally synchronized.
#[derive(Debug, Clone, Default)]
pub struct ModelCache {
    pub(crate) variables: BTreeMap<VariableId, Variable>,
    pub(crate) constraints: BTreeMap<ConstraintId, ConstraintExpr>,
    pub(crate) objective: Option<Objective>,
    pub(crate) next_variable_id: u32,
    pub(crate) next_constraint_id: u32,
    pub(crate) generation: u64,
    pub(crate) variable_names: NameTable<VariableId>,
    pub(crate) constraint_names: NameTable<ConstraintId>,
    // Lazy-allocated metadata storage
    pub(crate) variable_metadata: Option<BTreeMap<VariableId, serde_json::Value>>,
    pub(crate) constraint_metadata: Option<BTreeMap<ConstraintId, serde_json::Value>>,
}

impl ModelCache {
    /// Create a new empty model cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutation counter; changes on every successful mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn touch(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if self.variables.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if self.constraints.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    pub(crate) fn ensure_expr_variables(&self, expr: &Expr) -> Result<(), ModelError> {
        expr.variables()
            .try_for_each(|id| self.ensure_variable_exists(id))
    }
}

//! Storage access methods for the model cache.

use crate::types::{ConstraintKind, Objective, Variable};
use vela_expr::ids::{ConstraintId, EntityRef, VariableId};
use vela_expr::ConstraintExpr;

use super::error::ModelError;
use super::ModelCache;

impl ModelCache {
    /// Get the number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get a variable by ID.
    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(&id)
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// Get a constraint by ID.
    pub fn get_constraint(&self, id: ConstraintId) -> Result<&ConstraintExpr, ModelError> {
        self.constraints
            .get(&id)
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    /// Get the objective, if one is set.
    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// True while the referenced entity exists.
    pub fn is_valid(&self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Variable(id) => self.variables.contains_key(&id),
            EntityRef::Constraint(id) => self.constraints.contains_key(&id),
        }
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables.iter().map(|(&id, var)| (id, var))
    }

    /// Constraints in declaration order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &ConstraintExpr)> {
        self.constraints.iter().map(|(&id, con)| (id, con))
    }

    /// Variable ids in declaration order.
    pub fn variable_ids(&self) -> Vec<VariableId> {
        self.variables.keys().copied().collect()
    }

    /// Constraint ids in declaration order.
    pub fn constraint_ids(&self) -> Vec<ConstraintId> {
        self.constraints.keys().copied().collect()
    }

    /// Distinct function/set kinds present, sorted.
    pub fn constraint_kinds(&self) -> Vec<ConstraintKind> {
        let mut kinds: Vec<_> = self.constraints.values().map(ConstraintKind::of).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// Number of constraints of one function/set kind.
    pub fn num_constraints_of(&self, kind: ConstraintKind) -> usize {
        self.constraints
            .values()
            .filter(|c| ConstraintKind::of(c) == kind)
            .count()
    }
}

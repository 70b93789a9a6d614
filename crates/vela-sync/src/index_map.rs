//! Id <-> backend index table.

use std::collections::HashMap;

use vela_core::ModelCache;
use vela_expr::ids::{ConstraintId, EntityKind, VariableId};
use vela_solver::{ConstraintIndex, CopyError, CopyReceipt, VariableIndex};

/// Bijection between cache ids and the indices one backend assigned during
/// a copy, stamped with the cache generation it was built from.
///
/// Forward lookups go through arenas indexed by id slot; ids are allocated
/// densely so removed entities only leave `None` holes.
#[derive(Debug, Clone, Default)]
pub struct IndexMap {
    generation: u64,
    variables: Vec<Option<VariableIndex>>,
    constraints: Vec<Option<ConstraintIndex>>,
    variable_ids: HashMap<VariableIndex, VariableId>,
    constraint_ids: HashMap<ConstraintIndex, ConstraintId>,
}

fn place<T: Copy>(arena: &mut Vec<Option<T>>, slot: usize, value: T) {
    if arena.len() <= slot {
        arena.resize(slot + 1, None);
    }
    arena[slot] = Some(value);
}

impl IndexMap {
    /// Pair cache entities with the receipt's indices in declared order.
    pub fn build(cache: &ModelCache, receipt: CopyReceipt) -> Result<Self, CopyError> {
        if receipt.variables.len() != cache.num_variables() {
            return Err(CopyError::ReceiptMismatch {
                kind: EntityKind::Variable,
                expected: cache.num_variables(),
                actual: receipt.variables.len(),
            });
        }
        if receipt.constraints.len() != cache.num_constraints() {
            return Err(CopyError::ReceiptMismatch {
                kind: EntityKind::Constraint,
                expected: cache.num_constraints(),
                actual: receipt.constraints.len(),
            });
        }

        let mut map = Self {
            generation: cache.generation(),
            ..Self::default()
        };
        for ((id, _), index) in cache.variables().zip(receipt.variables) {
            place(&mut map.variables, id.slot(), index);
            map.variable_ids.insert(index, id);
        }
        for ((id, _), index) in cache.constraints().zip(receipt.constraints) {
            place(&mut map.constraints, id.slot(), index);
            map.constraint_ids.insert(index, id);
        }
        Ok(map)
    }

    /// Cache generation the map was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the cache has not changed since the map was built.
    pub fn is_current(&self, cache: &ModelCache) -> bool {
        self.generation == cache.generation()
    }

    pub fn variable_index(&self, id: VariableId) -> Option<VariableIndex> {
        self.variables.get(id.slot()).copied().flatten()
    }

    pub fn constraint_index(&self, id: ConstraintId) -> Option<ConstraintIndex> {
        self.constraints.get(id.slot()).copied().flatten()
    }

    pub fn variable_id(&self, index: VariableIndex) -> Option<VariableId> {
        self.variable_ids.get(&index).copied()
    }

    pub fn constraint_id(&self, index: ConstraintIndex) -> Option<ConstraintId> {
        self.constraint_ids.get(&index).copied()
    }

    pub fn num_variables(&self) -> usize {
        self.variable_ids.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraint_ids.len()
    }
}

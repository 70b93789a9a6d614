//! Metadata methods for variable and constraint naming.

use std::collections::{BTreeMap, HashMap};

use vela_expr::ids::{ConstraintId, EntityKind, EntityRef, VariableId};

use crate::model::error::ModelError;
use crate::model::ModelCache;

/// Bidirectional id <-> name table for one entity kind.
#[derive(Debug, Clone)]
pub(crate) struct NameTable<Id> {
    by_id: BTreeMap<Id, String>,
    by_name: HashMap<String, Id>,
}

impl<Id> Default for NameTable<Id> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<Id: Copy + Ord> NameTable<Id> {
    pub(crate) fn get(&self, id: Id) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Id> {
        self.by_name.get(name).copied()
    }

    /// Caller has already checked that no other id holds `name`.
    pub(crate) fn insert(&mut self, id: Id, name: String) {
        self.remove(id);
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
    }

    /// Returns whether `id` had a name.
    pub(crate) fn remove(&mut self, id: Id) -> bool {
        match self.by_id.remove(&id) {
            Some(old) => {
                self.by_name.remove(&old);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

/// Words with a fixed meaning in the text form.
const RESERVED_NAMES: [&str; 4] = ["in", "variables", "minobjective", "maxobjective"];

/// Names are identifiers: a letter first, then letters, digits or `_`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    if RESERVED_NAMES.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl ModelCache {
    /// Set or clear (with an empty string) the name of a variable or constraint.
    ///
    /// Fails with [`ModelError::NameConflict`] if another entity of the same
    /// kind already holds the name; the model is unchanged in that case.
    pub fn set_name(&mut self, entity: EntityRef, name: &str) -> Result<(), ModelError> {
        match entity {
            EntityRef::Variable(id) => self.ensure_variable_exists(id)?,
            EntityRef::Constraint(id) => self.ensure_constraint_exists(id)?,
        }

        if name.is_empty() {
            let removed = match entity {
                EntityRef::Variable(id) => self.variable_names.remove(id),
                EntityRef::Constraint(id) => self.constraint_names.remove(id),
            };
            if removed {
                self.touch();
            }
            return Ok(());
        }

        if !is_valid_name(name) {
            return Err(ModelError::InvalidName {
                name: name.to_string(),
            });
        }

        let holder = match entity {
            EntityRef::Variable(_) => self.variable_names.lookup(name).map(EntityRef::Variable),
            EntityRef::Constraint(_) => self
                .constraint_names
                .lookup(name)
                .map(EntityRef::Constraint),
        };
        match holder {
            Some(holder) if holder == entity => return Ok(()),
            Some(holder) => {
                tracing::debug!(
                    component = "model",
                    operation = "set_name",
                    status = "error",
                    entity = %entity,
                    name,
                    "Name already in use"
                );
                return Err(ModelError::NameConflict {
                    kind: entity.kind(),
                    name: name.to_string(),
                    holder,
                });
            }
            None => {}
        }

        match entity {
            EntityRef::Variable(id) => self.variable_names.insert(id, name.to_string()),
            EntityRef::Constraint(id) => self.constraint_names.insert(id, name.to_string()),
        }
        self.touch();
        Ok(())
    }

    /// Name of a variable or constraint, if set.
    pub fn name(&self, entity: EntityRef) -> Option<&str> {
        match entity {
            EntityRef::Variable(id) => self.variable_names.get(id),
            EntityRef::Constraint(id) => self.constraint_names.get(id),
        }
    }

    /// Get name for a variable.
    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names.get(id)
    }

    /// Get name for a constraint.
    pub fn get_constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names.get(id)
    }

    /// Lookup a variable by name.
    pub fn get_variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.lookup(name)
    }

    /// Lookup a constraint by name.
    pub fn get_constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        self.constraint_names.lookup(name)
    }

    /// Number of named entities of a kind.
    pub fn num_named(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Variable => self.variable_names.len(),
            EntityKind::Constraint => self.constraint_names.len(),
        }
    }

    /// Set metadata for a variable.
    ///
    /// Metadata is a local annotation; it is never copied to a backend and
    /// does not invalidate synced state or results.
    pub fn set_variable_metadata(
        &mut self,
        id: VariableId,
        metadata: serde_json::Value,
    ) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        self.variable_metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(id, metadata);
        Ok(())
    }

    /// Get metadata for a variable.
    pub fn get_variable_metadata(&self, id: VariableId) -> Option<&serde_json::Value> {
        self.variable_metadata
            .as_ref()
            .and_then(|meta| meta.get(&id))
    }

    /// Set metadata for a constraint.
    pub fn set_constraint_metadata(
        &mut self,
        id: ConstraintId,
        metadata: serde_json::Value,
    ) -> Result<(), ModelError> {
        self.ensure_constraint_exists(id)?;
        self.constraint_metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(id, metadata);
        Ok(())
    }

    /// Get metadata for a constraint.
    pub fn get_constraint_metadata(&self, id: ConstraintId) -> Option<&serde_json::Value> {
        self.constraint_metadata
            .as_ref()
            .and_then(|meta| meta.get(&id))
    }
}

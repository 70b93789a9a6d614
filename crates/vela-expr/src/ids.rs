use serde::{Deserialize, Serialize};

macro_rules! define_id_type {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Get the inner u32 value.
            pub fn inner(self) -> u32 {
                self.0
            }

            /// Create an ID from a u32 value.
            pub fn new(value: u32) -> Self {
                Self(value)
            }

            /// Position of this id in a dense arena.
            pub fn slot(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

define_id_type!(VariableId, "variable");
define_id_type!(ConstraintId, "constraint");

/// Reference to any entity that can be named, removed, or queried for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Variable(VariableId),
    Constraint(ConstraintId),
}

impl EntityRef {
    pub fn kind(self) -> EntityKind {
        match self {
            EntityRef::Variable(_) => EntityKind::Variable,
            EntityRef::Constraint(_) => EntityKind::Constraint,
        }
    }
}

impl From<VariableId> for EntityRef {
    fn from(id: VariableId) -> Self {
        EntityRef::Variable(id)
    }
}

impl From<ConstraintId> for EntityRef {
    fn from(id: ConstraintId) -> Self {
        EntityRef::Constraint(id)
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Variable(id) => id.fmt(f),
            EntityRef::Constraint(id) => id.fmt(f),
        }
    }
}

/// Kind of entity; names are unique per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Variable,
    Constraint,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Variable => "variable",
            EntityKind::Constraint => "constraint",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

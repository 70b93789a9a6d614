//! Backend-side indices and the copy receipt.

use serde::{Deserialize, Serialize};

macro_rules! define_index_type {
    ($name:ident, $label:literal) => {
        /// Index assigned by a backend; only meaningful to that backend instance.
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

            /// Create an index from a u32 value.
            pub fn new(value: u32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}[{}]", $label, self.0)
            }
        }
    };
}

define_index_type!(VariableIndex, "backend_variable");
define_index_type!(ConstraintIndex, "backend_constraint");

/// Either kind of backend index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendIndex {
    Variable(VariableIndex),
    Constraint(ConstraintIndex),
}

impl From<VariableIndex> for BackendIndex {
    fn from(index: VariableIndex) -> Self {
        BackendIndex::Variable(index)
    }
}

impl From<ConstraintIndex> for BackendIndex {
    fn from(index: ConstraintIndex) -> Self {
        BackendIndex::Constraint(index)
    }
}

impl std::fmt::Display for BackendIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendIndex::Variable(index) => index.fmt(f),
            BackendIndex::Constraint(index) => index.fmt(f),
        }
    }
}

/// Indices a backend assigned while copying a model cache.
///
/// One entry per cache entity, in the cache's declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReceipt {
    pub variables: Vec<VariableIndex>,
    pub constraints: Vec<ConstraintIndex>,
}

impl CopyReceipt {
    pub fn new(variables: Vec<VariableIndex>, constraints: Vec<ConstraintIndex>) -> Self {
        Self {
            variables,
            constraints,
        }
    }

    /// Receipt for a backend that numbers entities densely from zero.
    pub fn dense(num_variables: usize, num_constraints: usize) -> Self {
        Self {
            variables: (0..num_variables as u32).map(VariableIndex::new).collect(),
            constraints: (0..num_constraints as u32)
                .map(ConstraintIndex::new)
                .collect(),
        }
    }
}

//! Backend trait and factory.

use vela_core::{ModelCache, Objective, Variable};
use vela_expr::ConstraintExpr;

use crate::attributes::{Attribute, AttributeValue};
use crate::error::{CopyError, SolverError};
use crate::index::{ConstraintIndex, CopyReceipt, VariableIndex};

/// A solver instance the synchronization layer drives.
///
/// Cached modes only need the bulk operations (`empty`, `copy_model`,
/// `optimize`, `get`, `set`). The incremental methods serve Direct mode, where
/// variable id `n` and backend index `n` are the same number; they default to
/// [`SolverError::UnsupportedOperation`].
///
/// Backends are single-threaded; no `Send` or `Sync` bound is required.
pub trait Backend {
    /// Solver name used in diagnostics.
    fn name(&self) -> &str;

    /// True if the backend holds no variables or constraints.
    fn is_empty(&self) -> bool;

    /// Drop all model data, keeping parameters.
    fn empty(&mut self) -> Result<(), SolverError>;

    /// Copy a whole model into an empty backend.
    ///
    /// Returns one backend index per cache entity in declared order, or a
    /// [`CopyError`] if some part of the model cannot be represented.
    fn copy_model(&mut self, model: &ModelCache) -> Result<CopyReceipt, CopyError>;

    /// Solve the loaded model. Blocks until the solver returns.
    fn optimize(&mut self) -> Result<(), SolverError>;

    /// Read an attribute. Unknown attributes return
    /// [`SolverError::UnsupportedAttribute`].
    fn get(&self, attribute: &Attribute) -> Result<AttributeValue, SolverError>;

    /// Write an attribute.
    fn set(&mut self, attribute: &Attribute, value: AttributeValue) -> Result<(), SolverError>;

    /// Release solver resources. Called exactly once by the owning handle.
    fn close(&mut self) {}

    fn add_variable(&mut self, _variable: &Variable) -> Result<VariableIndex, SolverError> {
        Err(SolverError::UnsupportedOperation {
            operation: "add_variable",
        })
    }

    fn add_constraint(
        &mut self,
        _constraint: &ConstraintExpr,
    ) -> Result<ConstraintIndex, SolverError> {
        Err(SolverError::UnsupportedOperation {
            operation: "add_constraint",
        })
    }

    fn set_objective(&mut self, _objective: Option<&Objective>) -> Result<(), SolverError> {
        Err(SolverError::UnsupportedOperation {
            operation: "set_objective",
        })
    }

    fn delete_variable(&mut self, _index: VariableIndex) -> Result<(), SolverError> {
        Err(SolverError::UnsupportedOperation {
            operation: "delete_variable",
        })
    }

    fn delete_constraint(&mut self, _index: ConstraintIndex) -> Result<(), SolverError> {
        Err(SolverError::UnsupportedOperation {
            operation: "delete_constraint",
        })
    }
}

type CreateFn = dyn Fn() -> Result<Box<dyn Backend>, SolverError>;

/// Creates backend instances on demand.
///
/// A factory is an explicit value passed to the model; it can be called again
/// to reattach after a detach.
pub struct BackendFactory {
    create: Box<CreateFn>,
}

impl BackendFactory {
    pub fn new<F>(create: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Backend>, SolverError> + 'static,
    {
        Self {
            create: Box::new(create),
        }
    }

    /// Factory for a backend type with a `Default` constructor.
    pub fn of<B>() -> Self
    where
        B: Backend + Default + 'static,
    {
        Self::new(|| Ok(Box::new(B::default())))
    }

    /// Instantiate a fresh backend.
    pub fn create(&self) -> Result<Box<dyn Backend>, SolverError> {
        (self.create)()
    }
}

impl std::fmt::Debug for BackendFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendFactory").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_core::Bounds;

    #[derive(Default)]
    struct FixtureBackend {
        loaded: bool,
    }

    impl Backend for FixtureBackend {
        fn name(&self) -> &str {
            "fixture"
        }

        fn is_empty(&self) -> bool {
            !self.loaded
        }

        fn empty(&mut self) -> Result<(), SolverError> {
            self.loaded = false;
            Ok(())
        }

        fn copy_model(&mut self, model: &ModelCache) -> Result<CopyReceipt, CopyError> {
            self.loaded = true;
            Ok(CopyReceipt::dense(
                model.num_variables(),
                model.num_constraints(),
            ))
        }

        fn optimize(&mut self) -> Result<(), SolverError> {
            Ok(())
        }

        fn get(&self, attribute: &Attribute) -> Result<AttributeValue, SolverError> {
            match attribute {
                Attribute::SolverName => Ok(AttributeValue::Text("fixture".to_string())),
                other => Err(other.unsupported()),
            }
        }

        fn set(&mut self, attribute: &Attribute, _value: AttributeValue) -> Result<(), SolverError> {
            Err(attribute.unsupported())
        }
    }

    #[test]
    fn test_incremental_defaults_are_unsupported() {
        let mut backend = FixtureBackend::default();
        let err = backend
            .add_variable(&Variable::continuous(Bounds::free()))
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(backend
            .delete_constraint(ConstraintIndex::new(0))
            .unwrap_err()
            .is_unsupported());
        assert!(backend.set_objective(None).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_factory_creates_fresh_instances() {
        let factory = BackendFactory::of::<FixtureBackend>();
        let mut first = factory.create().unwrap();
        first.copy_model(&ModelCache::new()).unwrap();
        let second = factory.create().unwrap();
        assert!(!first.is_empty());
        assert!(second.is_empty());
        assert_eq!(second.name(), "fixture");
    }

    #[test]
    fn test_get_unknown_attribute_is_unsupported() {
        let backend = FixtureBackend::default();
        let err = backend.get(&Attribute::ObjectiveBound).unwrap_err();
        assert!(err.is_unsupported());
    }
}

//! Owned backend instance.

use vela_solver::{Backend, SolverConfig, SolverError};

/// Owns a live backend and closes it when dropped.
///
/// Every exit path (detach, a failed attach or sync, model teardown) goes
/// through `Drop`, so `Backend::close` runs exactly once per instance.
pub struct BackendHandle {
    backend: Box<dyn Backend>,
}

impl BackendHandle {
    pub(crate) fn new(backend: Box<dyn Backend>) -> Self {
        tracing::debug!(
            component = "sync",
            operation = "attach",
            status = "success",
            backend = backend.name(),
            "Backend instantiated"
        );
        Self { backend }
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub(crate) fn backend_mut(&mut self) -> &mut dyn Backend {
        self.backend.as_mut()
    }

    /// Apply solver parameters. Parameters the backend does not know are
    /// skipped with a warning; any other failure is returned.
    pub(crate) fn configure(&mut self, config: &SolverConfig) -> Result<(), SolverError> {
        for (attribute, value) in config.attribute_values() {
            match self.backend.set(&attribute, value) {
                Ok(()) => {}
                Err(err) if err.is_unsupported() => {
                    tracing::warn!(
                        component = "sync",
                        operation = "configure",
                        status = "skipped",
                        backend = self.backend.name(),
                        attribute = %attribute,
                        "Backend ignores parameter"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

impl Drop for BackendHandle {
    fn drop(&mut self) {
        tracing::debug!(
            component = "sync",
            operation = "close",
            status = "success",
            backend = self.backend.name(),
            "Backend closed"
        );
        self.backend.close();
    }
}

impl std::fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendHandle")
            .field("backend", &self.backend.name())
            .finish()
    }
}

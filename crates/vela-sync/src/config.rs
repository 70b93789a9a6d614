//! Model configuration.

use serde::{Deserialize, Serialize};
use vela_solver::{BackendFactory, SolverConfig};

/// How the cache and the backend relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// The cache is the source of truth; the backend is re-synced on demand.
    #[default]
    Automatic,
    /// `attach` and `sync` are explicit; reads against a stale backend fail.
    Manual,
    /// No cache; every call goes straight to the backend.
    Direct,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Automatic => "automatic",
            Mode::Manual => "manual",
            Mode::Direct => "direct",
        }
    }

    /// True for the modes that keep a model cache.
    pub fn is_cached(self) -> bool {
        !matches!(self, Mode::Direct)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a [`Model`](crate::Model) needs at construction.
///
/// There is no process-wide backend registry: a factory given here is the
/// only one the model knows about until `attach` or `set_backend` replace it.
#[derive(Debug, Default)]
pub struct ModelConfig {
    /// Synchronization mode.
    pub mode: Mode,
    /// Backend factory. Required in Direct mode.
    pub factory: Option<BackendFactory>,
    /// Parameters applied to every backend the model instantiates.
    pub solver: SolverConfig,
}

impl ModelConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the synchronization mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the backend factory.
    pub fn with_factory(mut self, factory: BackendFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Set the solver parameters.
    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}

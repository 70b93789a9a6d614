//! Attach, sync, and detach a backend against the model cache.

use serde::{Deserialize, Serialize};
use vela_core::{ModelCache, ModelError};
use vela_expr::ids::{ConstraintId, EntityRef, VariableId};
use vela_solver::{
    Backend, BackendFactory, BackendIndex, ConstraintIndex, SolverConfig, SolverError,
    VariableIndex,
};

use crate::config::{Mode, ModelConfig};
use crate::error::Error;
use crate::handle::BackendHandle;
use crate::index_map::IndexMap;

/// Relationship between the cache and the attached backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncState {
    /// No backend instance.
    Empty,
    /// A backend is attached but does not hold the current cache.
    OutOfSync,
    /// The backend holds exactly the current cache.
    Synced,
}

impl SyncState {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncState::Empty => "empty",
            SyncState::OutOfSync => "out_of_sync",
            SyncState::Synced => "synced",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the backend handle and the index map for one model.
///
/// The state is derived, never stored: `Empty` without a handle, `Synced`
/// when the map's generation matches the cache, `OutOfSync` otherwise.
#[derive(Debug)]
pub struct SynchronizationController {
    mode: Mode,
    factory: Option<BackendFactory>,
    solver_config: SolverConfig,
    handle: Option<BackendHandle>,
    map: Option<IndexMap>,
}

impl SynchronizationController {
    /// Build a controller; a configured factory is instantiated right away.
    ///
    /// Direct mode without a factory is a configuration error.
    pub fn new(config: ModelConfig) -> Result<Self, Error> {
        let ModelConfig {
            mode,
            factory,
            solver,
        } = config;
        if mode == Mode::Direct && factory.is_none() {
            return Err(Error::configuration(
                "Direct mode requires a backend factory at construction",
            ));
        }

        let mut controller = Self {
            mode,
            factory,
            solver_config: solver,
            handle: None,
            map: None,
        };
        if controller.factory.is_some() {
            controller.instantiate()?;
        }
        Ok(controller)
    }

    /// Automatic-mode controller with no factory.
    pub(crate) fn unconfigured() -> Self {
        Self {
            mode: Mode::Automatic,
            factory: None,
            solver_config: SolverConfig::default(),
            handle: None,
            map: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self, cache: &ModelCache) -> SyncState {
        match (&self.handle, &self.map) {
            (None, _) => SyncState::Empty,
            (Some(_), _) if self.mode == Mode::Direct => SyncState::Synced,
            (Some(_), Some(map)) if map.is_current(cache) => SyncState::Synced,
            (Some(_), _) => SyncState::OutOfSync,
        }
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.handle.as_ref().map(BackendHandle::name)
    }

    pub fn index_map(&self) -> Option<&IndexMap> {
        self.map.as_ref()
    }

    fn require_cached(&self, operation: &str) -> Result<(), Error> {
        if self.mode == Mode::Direct {
            return Err(Error::configuration(format!(
                "{operation} is unavailable in Direct mode"
            )));
        }
        Ok(())
    }

    fn instantiate(&mut self) -> Result<(), Error> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| Error::not_attached("no backend factory is configured"))?;
        let mut handle = BackendHandle::new(factory.create()?);
        handle.configure(&self.solver_config)?;
        self.handle = Some(handle);
        self.map = None;
        Ok(())
    }

    /// Replace the factory and instantiate it. Any live backend is closed first.
    pub fn attach(&mut self, factory: BackendFactory) -> Result<(), Error> {
        self.require_cached("attach")?;
        self.release();
        self.factory = Some(factory);
        self.instantiate()
    }

    /// Close any live backend and instantiate the configured factory again.
    pub fn reattach(&mut self) -> Result<(), Error> {
        self.require_cached("reattach")?;
        self.release();
        self.instantiate()
    }

    /// Close the backend and drop the index map. The factory is kept.
    pub fn detach(&mut self) -> Result<(), Error> {
        self.require_cached("detach")?;
        self.release();
        Ok(())
    }

    /// Replace the configured factory, closing any live backend.
    pub fn set_backend(&mut self, factory: BackendFactory) -> Result<(), Error> {
        self.require_cached("set_backend")?;
        self.release();
        self.factory = Some(factory);
        Ok(())
    }

    fn release(&mut self) {
        self.map = None;
        if let Some(handle) = self.handle.take() {
            tracing::debug!(
                component = "sync",
                operation = "detach",
                status = "success",
                backend = handle.name(),
                "Detaching backend"
            );
        }
    }

    /// Empty the backend, copy the cache into it, and rebuild the index map.
    ///
    /// On failure the backend is closed and the controller is left `Empty`.
    pub fn sync(&mut self, cache: &ModelCache) -> Result<(), Error> {
        self.require_cached("sync")?;
        self.map = None;
        let mut handle = self
            .handle
            .take()
            .ok_or_else(|| Error::not_attached("sync requires an attached backend"))?;

        match copy_into(handle.backend_mut(), cache) {
            Ok(map) => {
                tracing::debug!(
                    component = "sync",
                    operation = "copy",
                    status = "success",
                    backend = handle.name(),
                    variables = map.num_variables(),
                    constraints = map.num_constraints(),
                    generation = map.generation(),
                    "Copied model to backend"
                );
                self.handle = Some(handle);
                self.map = Some(map);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    component = "sync",
                    operation = "copy",
                    status = "error",
                    backend = handle.name(),
                    code = err.code(),
                    "Copy failed; releasing backend"
                );
                drop(handle);
                Err(err)
            }
        }
    }

    /// Bring the backend to a state where it can be solved or read.
    ///
    /// Automatic mode attaches and re-syncs as needed. Manual mode only
    /// checks: no backend is `NotAttached`, an out-of-date one `StaleMapping`.
    pub fn prepare(&mut self, cache: &ModelCache) -> Result<(), Error> {
        match self.mode {
            Mode::Direct => Ok(()),
            Mode::Automatic => {
                if self.handle.is_none() {
                    self.instantiate()?;
                }
                if self.state(cache) != SyncState::Synced {
                    self.sync(cache)?;
                }
                Ok(())
            }
            Mode::Manual => match self.state(cache) {
                SyncState::Empty => Err(Error::not_attached(
                    "no backend is attached; call attach first",
                )),
                SyncState::OutOfSync => Err(Error::stale(
                    "the model changed since the last sync; call sync first",
                )),
                SyncState::Synced => Ok(()),
            },
        }
    }

    pub fn backend(&self) -> Result<&dyn Backend, Error> {
        self.handle
            .as_ref()
            .map(BackendHandle::backend)
            .ok_or_else(|| Error::not_attached("no backend is attached"))
    }

    pub fn backend_mut(&mut self) -> Result<&mut dyn Backend, Error> {
        self.handle
            .as_mut()
            .map(BackendHandle::backend_mut)
            .ok_or_else(|| Error::not_attached("no backend is attached"))
    }

    fn current_map(&self, cache: &ModelCache) -> Result<&IndexMap, Error> {
        if self.handle.is_none() {
            return Err(Error::not_attached("no backend is attached"));
        }
        self.map
            .as_ref()
            .filter(|map| map.is_current(cache))
            .ok_or_else(|| Error::stale("the model changed since the last sync"))
    }

    /// Backend index of a cached entity. Direct mode maps ids by identity.
    pub fn backend_index(
        &self,
        cache: &ModelCache,
        entity: EntityRef,
    ) -> Result<BackendIndex, Error> {
        match entity {
            EntityRef::Variable(id) => self.variable_index(cache, id).map(BackendIndex::from),
            EntityRef::Constraint(id) => self.constraint_index(cache, id).map(BackendIndex::from),
        }
    }

    pub fn variable_index(
        &self,
        cache: &ModelCache,
        id: VariableId,
    ) -> Result<VariableIndex, Error> {
        if self.mode == Mode::Direct {
            return Ok(VariableIndex::new(id.inner()));
        }
        self.current_map(cache)?
            .variable_index(id)
            .ok_or(Error::Model(ModelError::InvalidVariableId(id)))
    }

    pub fn constraint_index(
        &self,
        cache: &ModelCache,
        id: ConstraintId,
    ) -> Result<ConstraintIndex, Error> {
        if self.mode == Mode::Direct {
            return Ok(ConstraintIndex::new(id.inner()));
        }
        self.current_map(cache)?
            .constraint_index(id)
            .ok_or(Error::Model(ModelError::InvalidConstraintId(id)))
    }

    /// Reverse lookup from a backend index to the cached entity.
    pub fn entity(&self, cache: &ModelCache, index: BackendIndex) -> Result<EntityRef, Error> {
        if self.mode == Mode::Direct {
            return Ok(match index {
                BackendIndex::Variable(index) => VariableId::new(index.inner()).into(),
                BackendIndex::Constraint(index) => ConstraintId::new(index.inner()).into(),
            });
        }
        let map = self.current_map(cache)?;
        match index {
            BackendIndex::Variable(index) => map
                .variable_id(index)
                .map(EntityRef::from)
                .ok_or(Error::Backend(SolverError::InvalidVariableIndex(index))),
            BackendIndex::Constraint(index) => map
                .constraint_id(index)
                .map(EntityRef::from)
                .ok_or(Error::Backend(SolverError::InvalidConstraintIndex(index))),
        }
    }
}

fn copy_into(backend: &mut dyn Backend, cache: &ModelCache) -> Result<IndexMap, Error> {
    backend.empty()?;
    let receipt = backend.copy_model(cache)?;
    Ok(IndexMap::build(cache, receipt)?)
}

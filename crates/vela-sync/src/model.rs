//! The user-facing model: a cache, a controller, and the last solve.

use vela_core::{
    Bounds, ConstraintKind, ModelCache, ModelError, Objective, Sense, Variable, VariableCategory,
};
use vela_expr::ids::{ConstraintId, EntityRef, VariableId};
use vela_expr::{ConstraintExpr, Expr};
use vela_solver::{
    Attribute, AttributeValue, Backend, BackendFactory, BackendIndex, ConstraintIndex,
    ResultStatus, TerminationStatus, VariableIndex,
};

use crate::config::{Mode, ModelConfig};
use crate::controller::{SyncState, SynchronizationController};
use crate::error::Error;
use crate::results::query;
use crate::results::{ResultRecord, ResultSummary, ResultValue};

/// An optimization model kept in sync with an optional solver backend.
///
/// In the cached modes every change lands in a [`ModelCache`] first; the
/// backend receives a full copy on `sync`, and each `optimize` stores a
/// [`ResultRecord`] stamped with the cache generation. Any later mutation
/// makes that record unreadable (`StaleMapping`) until the next solve.
///
/// In Direct mode there is no cache and no record: every call is forwarded
/// to the backend and ids equal backend indices.
///
/// Not internally synchronized; callers sharing a model across threads must
/// provide their own mutual exclusion.
#[derive(Debug)]
pub struct Model {
    cache: ModelCache,
    controller: SynchronizationController,
    results: Option<ResultRecord>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Automatic-mode model with no backend.
    pub fn new() -> Self {
        Self {
            cache: ModelCache::new(),
            controller: SynchronizationController::unconfigured(),
            results: None,
        }
    }

    /// Model built from an explicit configuration.
    pub fn with_config(config: ModelConfig) -> Result<Self, Error> {
        Ok(Self {
            cache: ModelCache::new(),
            controller: SynchronizationController::new(config)?,
            results: None,
        })
    }

    /// Cached-mode model read from the text form.
    pub fn from_text(text: &str, config: ModelConfig) -> Result<Self, Error> {
        if config.mode == Mode::Direct {
            return Err(Error::configuration(
                "from_text needs a model cache and is unavailable in Direct mode",
            ));
        }
        let cache = ModelCache::from_text(text)?;
        Ok(Self {
            cache,
            controller: SynchronizationController::new(config)?,
            results: None,
        })
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn state(&self) -> SyncState {
        self.controller.state(&self.cache)
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.controller.backend_name()
    }

    /// The model cache; `None` in Direct mode.
    pub fn cache(&self) -> Option<&ModelCache> {
        self.is_cached().then_some(&self.cache)
    }

    fn is_cached(&self) -> bool {
        self.mode().is_cached()
    }

    fn cache_mut(&mut self, operation: &str) -> Result<&mut ModelCache, Error> {
        if !self.is_cached() {
            return Err(Error::configuration(format!(
                "{operation} needs a model cache and is unavailable in Direct mode"
            )));
        }
        Ok(&mut self.cache)
    }

    fn cache_ref(&self, operation: &str) -> Result<&ModelCache, Error> {
        if !self.is_cached() {
            return Err(Error::configuration(format!(
                "{operation} needs a model cache and is unavailable in Direct mode"
            )));
        }
        Ok(&self.cache)
    }

    // ── Building ────────────────────────────────────────────

    pub fn add_variable(
        &mut self,
        bounds: Bounds,
        category: VariableCategory,
    ) -> Result<VariableId, Error> {
        if self.is_cached() {
            return Ok(self.cache.add_variable(bounds, category)?);
        }
        let index = self
            .controller
            .backend_mut()?
            .add_variable(&Variable { bounds, category })?;
        Ok(VariableId::new(index.inner()))
    }

    pub fn add_constraint(&mut self, constraint: ConstraintExpr) -> Result<ConstraintId, Error> {
        if self.is_cached() {
            return Ok(self.cache.add_constraint(constraint)?);
        }
        let constraint = constraint
            .revalidate()
            .map_err(ModelError::from)?
            .normalized();
        let index = self.controller.backend_mut()?.add_constraint(&constraint)?;
        Ok(ConstraintId::new(index.inner()))
    }

    pub fn set_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), Error> {
        if self.is_cached() {
            return Ok(self.cache.set_objective(sense, expr)?);
        }
        expr.check_finite().map_err(ModelError::from)?;
        let objective = Objective {
            sense,
            expr: expr.normalized(),
        };
        Ok(self.controller.backend_mut()?.set_objective(Some(&objective))?)
    }

    pub fn minimize(&mut self, expr: Expr) -> Result<(), Error> {
        self.set_objective(Sense::Minimize, expr)
    }

    pub fn maximize(&mut self, expr: Expr) -> Result<(), Error> {
        self.set_objective(Sense::Maximize, expr)
    }

    pub fn clear_objective(&mut self) -> Result<(), Error> {
        if self.is_cached() {
            self.cache.clear_objective();
            return Ok(());
        }
        Ok(self.controller.backend_mut()?.set_objective(None)?)
    }

    /// Set or clear (empty string) a name. Duplicate names are a `Conflict`.
    pub fn set_name(&mut self, entity: EntityRef, name: &str) -> Result<(), Error> {
        if self.is_cached() {
            return Ok(self.cache.set_name(entity, name)?);
        }
        let attribute = match entity {
            EntityRef::Variable(id) => Attribute::VariableName(
                self.controller.variable_index(&self.cache, id)?,
            ),
            EntityRef::Constraint(id) => Attribute::ConstraintName(
                self.controller.constraint_index(&self.cache, id)?,
            ),
        };
        let value = AttributeValue::Text(name.to_string());
        Ok(self.controller.backend_mut()?.set(&attribute, value)?)
    }

    pub fn remove(&mut self, entity: EntityRef) -> Result<(), Error> {
        if self.is_cached() {
            return Ok(self.cache.remove(entity)?);
        }
        let backend = self.controller.backend_mut()?;
        match entity {
            EntityRef::Variable(id) => {
                backend.delete_variable(VariableIndex::new(id.inner()))?
            }
            EntityRef::Constraint(id) => {
                backend.delete_constraint(ConstraintIndex::new(id.inner()))?
            }
        }
        Ok(())
    }

    pub fn set_lower_bound(&mut self, id: VariableId, lower: f64) -> Result<(), Error> {
        Ok(self.cache_mut("set_lower_bound")?.set_lower_bound(id, lower)?)
    }

    pub fn set_upper_bound(&mut self, id: VariableId, upper: f64) -> Result<(), Error> {
        Ok(self.cache_mut("set_upper_bound")?.set_upper_bound(id, upper)?)
    }

    pub fn delete_lower_bound(&mut self, id: VariableId) -> Result<(), Error> {
        Ok(self.cache_mut("delete_lower_bound")?.delete_lower_bound(id)?)
    }

    pub fn delete_upper_bound(&mut self, id: VariableId) -> Result<(), Error> {
        Ok(self.cache_mut("delete_upper_bound")?.delete_upper_bound(id)?)
    }

    /// Fix a variable; bounded variables need `force`.
    pub fn fix(&mut self, id: VariableId, value: f64, force: bool) -> Result<(), Error> {
        Ok(self.cache_mut("fix")?.fix(id, value, force)?)
    }

    pub fn unfix(&mut self, id: VariableId) -> Result<(), Error> {
        Ok(self.cache_mut("unfix")?.unfix(id)?)
    }

    pub fn set_category(&mut self, id: VariableId, category: VariableCategory) -> Result<(), Error> {
        Ok(self.cache_mut("set_category")?.set_category(id, category)?)
    }

    pub fn set_variable_metadata(
        &mut self,
        id: VariableId,
        metadata: serde_json::Value,
    ) -> Result<(), Error> {
        Ok(self
            .cache_mut("set_variable_metadata")?
            .set_variable_metadata(id, metadata)?)
    }

    pub fn variable_metadata(&self, id: VariableId) -> Result<Option<&serde_json::Value>, Error> {
        Ok(self.cache_ref("variable_metadata")?.get_variable_metadata(id))
    }

    pub fn set_constraint_metadata(
        &mut self,
        id: ConstraintId,
        metadata: serde_json::Value,
    ) -> Result<(), Error> {
        Ok(self
            .cache_mut("set_constraint_metadata")?
            .set_constraint_metadata(id, metadata)?)
    }

    pub fn constraint_metadata(
        &self,
        id: ConstraintId,
    ) -> Result<Option<&serde_json::Value>, Error> {
        Ok(self
            .cache_ref("constraint_metadata")?
            .get_constraint_metadata(id))
    }

    // ── Reading the model ───────────────────────────────────

    pub fn name(&self, entity: EntityRef) -> Result<Option<&str>, Error> {
        Ok(self.cache_ref("name")?.name(entity))
    }

    pub fn variable_by_name(&self, name: &str) -> Result<Option<VariableId>, Error> {
        Ok(self.cache_ref("variable_by_name")?.get_variable_by_name(name))
    }

    pub fn constraint_by_name(&self, name: &str) -> Result<Option<ConstraintId>, Error> {
        Ok(self
            .cache_ref("constraint_by_name")?
            .get_constraint_by_name(name))
    }

    pub fn is_valid(&self, entity: EntityRef) -> Result<bool, Error> {
        Ok(self.cache_ref("is_valid")?.is_valid(entity))
    }

    pub fn num_variables(&self) -> Result<usize, Error> {
        Ok(self.cache_ref("num_variables")?.num_variables())
    }

    pub fn num_constraints(&self) -> Result<usize, Error> {
        Ok(self.cache_ref("num_constraints")?.num_constraints())
    }

    pub fn num_constraints_of(&self, kind: ConstraintKind) -> Result<usize, Error> {
        Ok(self.cache_ref("num_constraints_of")?.num_constraints_of(kind))
    }

    pub fn constraint_kinds(&self) -> Result<Vec<ConstraintKind>, Error> {
        Ok(self.cache_ref("constraint_kinds")?.constraint_kinds())
    }

    pub fn to_text(&self) -> Result<String, Error> {
        Ok(self.cache_ref("to_text")?.to_text())
    }

    // ── Backend lifecycle ───────────────────────────────────

    /// Use `factory` from now on and instantiate it (state `OutOfSync`).
    pub fn attach(&mut self, factory: BackendFactory) -> Result<(), Error> {
        self.results = None;
        self.controller.attach(factory)
    }

    /// Instantiate the configured factory again after a detach.
    pub fn reattach(&mut self) -> Result<(), Error> {
        self.results = None;
        self.controller.reattach()
    }

    /// Close the backend. The factory is kept for `reattach`.
    pub fn detach(&mut self) -> Result<(), Error> {
        self.results = None;
        self.controller.detach()
    }

    /// Replace the configured factory, closing any live backend.
    pub fn set_backend(&mut self, factory: BackendFactory) -> Result<(), Error> {
        self.results = None;
        self.controller.set_backend(factory)
    }

    /// Copy the cache into the attached backend (state `Synced`).
    pub fn sync(&mut self) -> Result<(), Error> {
        self.controller.sync(&self.cache)
    }

    /// Solve. Automatic mode attaches and syncs first if needed.
    pub fn optimize(&mut self) -> Result<(), Error> {
        self.results = None;
        if !self.is_cached() {
            self.controller.backend_mut()?.optimize()?;
            tracing::debug!(
                component = "sync",
                operation = "optimize",
                status = "success",
                mode = self.mode().as_str(),
                "Optimize finished"
            );
            return Ok(());
        }

        self.controller.prepare(&self.cache)?;
        self.controller.backend_mut()?.optimize()?;

        let map = self
            .controller
            .index_map()
            .ok_or_else(|| Error::stale("the backend lost its index map"))?;
        let record = ResultRecord::collect(self.controller.backend()?, &self.cache, map)?;
        tracing::debug!(
            component = "sync",
            operation = "optimize",
            status = "success",
            mode = self.mode().as_str(),
            termination = record.summary().termination.as_str(),
            primal_status = record.summary().primal_status.as_str(),
            dual_status = record.summary().dual_status.as_str(),
            generation = record.generation(),
            "Optimize finished"
        );
        self.results = Some(record);
        Ok(())
    }

    /// Attach `factory`, sync, and solve.
    ///
    /// Fails with a configuration error, leaving the model untouched, if a
    /// factory is already configured or the model is in Direct mode.
    pub fn optimize_with(&mut self, factory: BackendFactory) -> Result<(), Error> {
        if !self.is_cached() {
            return Err(Error::configuration(
                "optimize_with is unavailable in Direct mode; the backend is fixed at construction",
            ));
        }
        if self.controller.has_factory() {
            return Err(Error::configuration(
                "a backend factory is already configured; use set_backend to replace it",
            ));
        }
        self.attach(factory)?;
        self.sync()?;
        self.optimize()
    }

    /// Backend index of an entity. Automatic mode re-syncs first.
    pub fn backend_index(&mut self, entity: EntityRef) -> Result<BackendIndex, Error> {
        if self.mode() == Mode::Automatic {
            self.controller.prepare(&self.cache)?;
        }
        self.controller.backend_index(&self.cache, entity)
    }

    /// Entity behind a backend index. Automatic mode re-syncs first.
    pub fn entity_of(&mut self, index: BackendIndex) -> Result<EntityRef, Error> {
        if self.mode() == Mode::Automatic {
            self.controller.prepare(&self.cache)?;
        }
        self.controller.entity(&self.cache, index)
    }

    // ── Results ─────────────────────────────────────────────

    /// The record of the last solve, if it still describes the cache.
    fn record(&self) -> Result<&ResultRecord, Error> {
        let record = self
            .results
            .as_ref()
            .ok_or_else(|| Error::not_attached("no solve has run since the last attach"))?;
        if !record.is_current(&self.cache) {
            return Err(Error::stale(
                "the model changed since the last optimize; results are out of date",
            ));
        }
        Ok(record)
    }

    fn current_record(&self) -> Option<&ResultRecord> {
        self.results
            .as_ref()
            .filter(|record| record.is_current(&self.cache))
    }

    fn direct_backend(&self) -> Option<&dyn Backend> {
        if self.is_cached() {
            None
        } else {
            self.controller.backend().ok()
        }
    }

    /// Solve-level facts. In cached modes, a model without a current solve
    /// reports `OptimizeNotCalled`.
    pub fn result_summary(&self) -> Result<ResultSummary, Error> {
        if let Some(backend) = self.direct_backend() {
            return ResultSummary::query(backend);
        }
        Ok(self
            .current_record()
            .map_or_else(ResultSummary::not_called, |record| record.summary().clone()))
    }

    pub fn termination_status(&self) -> Result<TerminationStatus, Error> {
        if let Some(backend) = self.direct_backend() {
            return query::termination(backend);
        }
        Ok(self
            .current_record()
            .map_or(TerminationStatus::OptimizeNotCalled, |r| {
                r.summary().termination
            }))
    }

    pub fn primal_status(&self) -> Result<ResultStatus, Error> {
        if let Some(backend) = self.direct_backend() {
            return query::result_status(backend, Attribute::PrimalStatus);
        }
        Ok(self
            .current_record()
            .map_or(ResultStatus::NoSolution, |r| r.summary().primal_status))
    }

    pub fn dual_status(&self) -> Result<ResultStatus, Error> {
        if let Some(backend) = self.direct_backend() {
            return query::result_status(backend, Attribute::DualStatus);
        }
        Ok(self
            .current_record()
            .map_or(ResultStatus::NoSolution, |r| r.summary().dual_status))
    }

    pub fn raw_status(&self) -> Result<String, Error> {
        if let Some(backend) = self.direct_backend() {
            return query::raw_status(backend);
        }
        Ok(self.record()?.summary().raw_status.clone())
    }

    pub fn result_count(&self) -> Result<usize, Error> {
        Ok(self.result_summary()?.result_count)
    }

    /// True when primal values can be read for the current model.
    pub fn has_result_values(&self) -> bool {
        self.primal_status()
            .map(ResultStatus::has_values)
            .unwrap_or(false)
    }

    /// True when dual values can be read for the current model.
    pub fn has_result_duals(&self) -> bool {
        self.dual_status()
            .map(ResultStatus::has_values)
            .unwrap_or(false)
    }

    fn solve_value(
        &self,
        attribute: Attribute,
        pick: impl Fn(&ResultSummary) -> Option<f64>,
    ) -> Result<f64, Error> {
        let value = match self.direct_backend() {
            Some(backend) => query::optional_float(backend, attribute.clone())?,
            None => pick(self.record()?.summary()),
        };
        value.ok_or_else(|| Error::precondition(format!("{attribute} is not available")))
    }

    pub fn objective_value(&self) -> Result<f64, Error> {
        self.require_primal()?;
        self.solve_value(Attribute::ObjectiveValue, |s| s.objective_value)
    }

    pub fn dual_objective_value(&self) -> Result<f64, Error> {
        self.solve_value(Attribute::DualObjectiveValue, |s| s.dual_objective_value)
    }

    pub fn objective_bound(&self) -> Result<f64, Error> {
        self.solve_value(Attribute::ObjectiveBound, |s| s.objective_bound)
    }

    pub fn solve_time(&self) -> Result<f64, Error> {
        self.solve_value(Attribute::SolveTimeSec, |s| s.solve_time)
    }

    fn require_primal(&self) -> Result<(), Error> {
        if self.is_cached() {
            self.record()?;
        }
        if !self.has_result_values() {
            return Err(Error::precondition("no primal solution is available"));
        }
        Ok(())
    }

    /// Primal value of one variable.
    pub fn value(&self, id: VariableId) -> Result<f64, Error> {
        self.require_primal()?;
        if let Some(backend) = self.direct_backend() {
            return query::variable_primal(
                backend,
                self.controller.variable_index(&self.cache, id)?,
            );
        }
        self.record()?
            .primal_value(id)
            .ok_or(Error::Model(ModelError::InvalidVariableId(id)))
    }

    /// Primal value of a variable (a number) or of a constraint function
    /// (shaped like its set).
    pub fn result_value(&self, entity: EntityRef) -> Result<ResultValue, Error> {
        let id = match entity {
            EntityRef::Variable(id) => return self.value(id).map(ResultValue::Scalar),
            EntityRef::Constraint(id) => id,
        };
        self.require_primal()?;

        if let Some(backend) = self.direct_backend() {
            let index = self.controller.constraint_index(&self.cache, id)?;
            let set = query::constraint_set(backend, index)?;
            return query::constraint_primal(backend, index, &set);
        }

        let record = self.record()?;
        let constraint = self.cache.get_constraint(id)?;
        let values = constraint
            .function()
            .components()
            .iter()
            .map(|component| self.evaluate(record, component))
            .collect::<Result<Vec<_>, _>>()?;
        crate::results::decode(constraint.set(), values)
    }

    fn evaluate(&self, record: &ResultRecord, expr: &Expr) -> Result<f64, Error> {
        if let Some(missing) = expr.variables().find(|&id| record.primal_value(id).is_none()) {
            return Err(Error::Model(ModelError::InvalidVariableId(missing)));
        }
        expr.evaluate(|id| record.primal_value(id))
            .ok_or_else(|| Error::precondition("expression references a variable without a value"))
    }

    /// Value of an expression at the primal solution.
    ///
    /// Cached modes evaluate against the stored record without asking the
    /// backend.
    pub fn result_value_of(&self, expr: &Expr) -> Result<f64, Error> {
        self.require_primal()?;
        if self.is_cached() {
            return self.evaluate(self.record()?, expr);
        }
        let mut failure = None;
        let value = expr.evaluate(|id| match self.value(id) {
            Ok(value) => Some(value),
            Err(err) => {
                failure = Some(err);
                None
            }
        });
        match (value, failure) {
            (Some(value), _) => Ok(value),
            (None, Some(err)) => Err(err),
            (None, None) => Err(Error::precondition("expression could not be evaluated")),
        }
    }

    /// True if a dual value is available for this entity; never an error.
    pub fn has_result_dual(&self, entity: EntityRef) -> bool {
        let EntityRef::Constraint(id) = entity else {
            return false;
        };
        if !self.has_result_duals() {
            return false;
        }
        match self.current_record() {
            Some(record) => record.dual(id).is_some(),
            None => self
                .direct_backend()
                .is_some_and(|backend| matches!(self.direct_dual(backend, id), Ok(Some(_)))),
        }
    }

    fn direct_dual(
        &self,
        backend: &dyn Backend,
        id: ConstraintId,
    ) -> Result<Option<ResultValue>, Error> {
        let index = self.controller.constraint_index(&self.cache, id)?;
        let set = query::constraint_set(backend, index)?;
        query::optional_constraint_dual(backend, index, &set)
    }

    /// Dual value of a constraint, shaped like its set.
    pub fn result_dual(&self, entity: EntityRef) -> Result<ResultValue, Error> {
        if self.is_cached() {
            self.record()?;
        }
        let EntityRef::Constraint(id) = entity else {
            return Err(Error::precondition(
                "duals are only defined for constraints",
            ));
        };
        if !self.has_result_duals() {
            return Err(Error::precondition("no dual solution is available"));
        }

        if let Some(backend) = self.direct_backend() {
            return self
                .direct_dual(backend, id)?
                .ok_or_else(|| Error::precondition(format!("no dual value for {id}")));
        }

        if !self.cache.is_valid(id.into()) {
            return Err(Error::Model(ModelError::InvalidConstraintId(id)));
        }
        let record = self.record()?;
        if let Some(err) = record.dual_error(id) {
            return Err(err.clone());
        }
        record
            .dual(id)
            .cloned()
            .ok_or_else(|| Error::precondition(format!("no dual value for {id}")))
    }
}

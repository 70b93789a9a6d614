//! Per-solve result snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vela_core::ModelCache;
use vela_expr::ids::{ConstraintId, VariableId};
use vela_solver::{Attribute, Backend, ResultStatus, TerminationStatus};

use crate::error::Error;
use crate::index_map::IndexMap;
use crate::results::decode::ResultValue;
use crate::results::query;

/// Solve-level facts, without per-entity values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub termination: TerminationStatus,
    pub raw_status: String,
    pub result_count: usize,
    pub primal_status: ResultStatus,
    pub dual_status: ResultStatus,
    pub objective_value: Option<f64>,
    pub dual_objective_value: Option<f64>,
    pub objective_bound: Option<f64>,
    pub solve_time: Option<f64>,
}

impl ResultSummary {
    /// Read every solve-level attribute from the backend.
    pub(crate) fn query(backend: &dyn Backend) -> Result<Self, Error> {
        let termination = query::termination(backend)?;
        let primal_status = query::result_status(backend, Attribute::PrimalStatus)?;
        let dual_status = query::result_status(backend, Attribute::DualStatus)?;
        let result_count = query::result_count(backend)?
            .unwrap_or(usize::from(primal_status.has_values()));

        let objective_value = if primal_status.has_values() {
            query::optional_float(backend, Attribute::ObjectiveValue)?
        } else {
            None
        };
        let dual_objective_value = if dual_status.has_values() {
            query::optional_float(backend, Attribute::DualObjectiveValue)?
        } else {
            None
        };

        Ok(Self {
            termination,
            raw_status: query::raw_status(backend)?,
            result_count,
            primal_status,
            dual_status,
            objective_value,
            dual_objective_value,
            objective_bound: query::optional_float(backend, Attribute::ObjectiveBound)?,
            solve_time: query::optional_float(backend, Attribute::SolveTimeSec)?,
        })
    }

    /// Summary reported before any solve.
    pub(crate) fn not_called() -> Self {
        Self {
            termination: TerminationStatus::OptimizeNotCalled,
            raw_status: String::new(),
            result_count: 0,
            primal_status: ResultStatus::NoSolution,
            dual_status: ResultStatus::NoSolution,
            objective_value: None,
            dual_objective_value: None,
            objective_bound: None,
            solve_time: None,
        }
    }
}

/// Everything one `optimize` produced, keyed by stable ids.
///
/// Valid only while the cache generation it was stamped with is current.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    generation: u64,
    summary: ResultSummary,
    primal: BTreeMap<VariableId, f64>,
    duals: BTreeMap<ConstraintId, ResultValue>,
    rejected_duals: BTreeMap<ConstraintId, Error>,
}

impl ResultRecord {
    /// Pull a full snapshot from a freshly solved backend.
    pub(crate) fn collect(
        backend: &dyn Backend,
        cache: &ModelCache,
        map: &IndexMap,
    ) -> Result<Self, Error> {
        let summary = ResultSummary::query(backend)?;

        let mut primal = BTreeMap::new();
        if summary.primal_status.has_values() {
            for (id, _) in cache.variables() {
                let index = map
                    .variable_index(id)
                    .ok_or_else(|| Error::stale(format!("{id} has no backend index")))?;
                primal.insert(id, query::variable_primal(backend, index)?);
            }
        }

        // A set without duals is skipped; a malformed dual is kept against
        // its constraint so the rest of the solve stays readable.
        let mut duals = BTreeMap::new();
        let mut rejected_duals = BTreeMap::new();
        if summary.dual_status.has_values() {
            for (id, constraint) in cache.constraints() {
                let index = map
                    .constraint_index(id)
                    .ok_or_else(|| Error::stale(format!("{id} has no backend index")))?;
                match query::optional_constraint_dual(backend, index, constraint.set()) {
                    Ok(Some(value)) => {
                        duals.insert(id, value);
                    }
                    Ok(None) => {}
                    Err(err @ Error::Decode { .. }) => {
                        tracing::warn!(
                            component = "sync",
                            operation = "collect_results",
                            status = "decode_failed",
                            constraint = %id,
                            error = %err,
                            "Dual value could not be decoded"
                        );
                        rejected_duals.insert(id, err);
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        Ok(Self {
            generation: cache.generation(),
            summary,
            primal,
            duals,
            rejected_duals,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, cache: &ModelCache) -> bool {
        self.generation == cache.generation()
    }

    pub fn summary(&self) -> &ResultSummary {
        &self.summary
    }

    pub fn primal_value(&self, id: VariableId) -> Option<f64> {
        self.primal.get(&id).copied()
    }

    pub fn dual(&self, id: ConstraintId) -> Option<&ResultValue> {
        self.duals.get(&id)
    }

    /// Decode failure recorded for this constraint's dual, if any.
    pub fn dual_error(&self, id: ConstraintId) -> Option<&Error> {
        self.rejected_duals.get(&id)
    }
}

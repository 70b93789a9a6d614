//! Scripted backend shared by the integration suites.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use vela_core::{ConstraintKind, ModelCache, Objective, Variable};
use vela_expr::ConstraintExpr;
use vela_solver::{
    Attribute, AttributeValue, Backend, BackendFactory, ConstraintIndex, CopyError, CopyReceipt,
    ResultStatus, SolverError, TerminationStatus, VariableIndex,
};
use vela_sync::{Mode, Model, ModelConfig};

/// What the next solve reports. Values are listed by backend position.
#[derive(Debug, Clone)]
pub struct Script {
    pub termination: TerminationStatus,
    pub primal_status: ResultStatus,
    pub dual_status: ResultStatus,
    pub objective_value: f64,
    pub primal: Vec<f64>,
    pub duals: Vec<Vec<f64>>,
    /// Set names the copy rejects.
    pub unsupported_sets: Vec<&'static str>,
    /// Set names the backend reports no dual for.
    pub dualless_sets: Vec<&'static str>,
    /// Return one constraint index too few from `copy_model`.
    pub short_receipt: bool,
    /// First backend index handed out.
    pub index_offset: u32,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            termination: TerminationStatus::Optimal,
            primal_status: ResultStatus::FeasiblePoint,
            dual_status: ResultStatus::NoSolution,
            objective_value: 0.0,
            primal: Vec::new(),
            duals: Vec::new(),
            unsupported_sets: Vec::new(),
            dualless_sets: Vec::new(),
            short_receipt: false,
            index_offset: 0,
        }
    }
}

/// Side effects observed across every instance a factory created.
#[derive(Debug, Default)]
pub struct Journal {
    pub created: usize,
    pub closed: usize,
    pub copies: usize,
    pub optimizes: usize,
    pub writes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Harness {
    pub script: Rc<RefCell<Script>>,
    pub journal: Rc<RefCell<Journal>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Script) -> Self {
        Self {
            script: Rc::new(RefCell::new(script)),
            journal: Rc::default(),
        }
    }

    pub fn factory(&self) -> BackendFactory {
        let harness = self.clone();
        BackendFactory::new(move || {
            harness.journal.borrow_mut().created += 1;
            Ok(Box::new(MockBackend::new(harness.clone())) as Box<dyn Backend>)
        })
    }

    pub fn set_primal(&self, primal: Vec<f64>) {
        self.script.borrow_mut().primal = primal;
    }

    pub fn set_duals(&self, duals: Vec<Vec<f64>>) {
        let mut script = self.script.borrow_mut();
        script.dual_status = ResultStatus::FeasiblePoint;
        script.duals = duals;
    }

    pub fn created(&self) -> usize {
        self.journal.borrow().created
    }

    pub fn closed(&self) -> usize {
        self.journal.borrow().closed
    }

    pub fn copies(&self) -> usize {
        self.journal.borrow().copies
    }

    pub fn optimizes(&self) -> usize {
        self.journal.borrow().optimizes
    }

    pub fn wrote(&self, attribute: &str) -> bool {
        self.journal.borrow().writes.iter().any(|w| w == attribute)
    }
}

pub struct MockBackend {
    harness: Harness,
    variables: Vec<Option<Variable>>,
    constraints: Vec<Option<ConstraintExpr>>,
    objective: Option<Objective>,
    solved: bool,
}

impl MockBackend {
    fn new(harness: Harness) -> Self {
        Self {
            harness,
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            solved: false,
        }
    }

    fn slot(&self, inner: u32) -> Option<usize> {
        let offset = self.harness.script.borrow().index_offset;
        inner.checked_sub(offset).map(|slot| slot as usize)
    }

    fn offset(&self) -> u32 {
        self.harness.script.borrow().index_offset
    }

    fn constraint(&self, index: ConstraintIndex) -> Result<&ConstraintExpr, SolverError> {
        self.slot(index.inner())
            .and_then(|slot| self.constraints.get(slot))
            .and_then(Option::as_ref)
            .ok_or(SolverError::InvalidConstraintIndex(index))
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.constraints.is_empty()
    }

    fn empty(&mut self) -> Result<(), SolverError> {
        self.variables.clear();
        self.constraints.clear();
        self.objective = None;
        self.solved = false;
        Ok(())
    }

    fn copy_model(&mut self, model: &ModelCache) -> Result<CopyReceipt, CopyError> {
        self.harness.journal.borrow_mut().copies += 1;
        let script = self.harness.script.borrow().clone();
        for (_, constraint) in model.constraints() {
            if script.unsupported_sets.contains(&constraint.set().name()) {
                return Err(CopyError::UnsupportedConstraint {
                    backend: "mock".to_string(),
                    kind: ConstraintKind::of(constraint),
                });
            }
        }

        self.variables = model.variables().map(|(_, var)| Some(*var)).collect();
        self.constraints = model.constraints().map(|(_, c)| Some(c.clone())).collect();
        self.objective = model.objective().cloned();
        self.solved = false;

        let offset = script.index_offset;
        let mut receipt = CopyReceipt::new(
            (0..self.variables.len() as u32)
                .map(|k| VariableIndex::new(k + offset))
                .collect(),
            (0..self.constraints.len() as u32)
                .map(|k| ConstraintIndex::new(k + offset))
                .collect(),
        );
        if script.short_receipt {
            receipt.constraints.pop();
        }
        Ok(receipt)
    }

    fn optimize(&mut self) -> Result<(), SolverError> {
        self.harness.journal.borrow_mut().optimizes += 1;
        self.solved = true;
        Ok(())
    }

    fn get(&self, attribute: &Attribute) -> Result<AttributeValue, SolverError> {
        let script = self.harness.script.borrow();
        let solved = self.solved;
        match attribute {
            Attribute::TerminationStatus => Ok(AttributeValue::Termination(if solved {
                script.termination
            } else {
                TerminationStatus::OptimizeNotCalled
            })),
            Attribute::PrimalStatus => Ok(AttributeValue::Result(if solved {
                script.primal_status
            } else {
                ResultStatus::NoSolution
            })),
            Attribute::DualStatus => Ok(AttributeValue::Result(if solved {
                script.dual_status
            } else {
                ResultStatus::NoSolution
            })),
            Attribute::ObjectiveValue => Ok(AttributeValue::Float(script.objective_value)),
            Attribute::SolveTimeSec => Ok(AttributeValue::Float(0.25)),
            Attribute::SolverName => Ok(AttributeValue::Text("mock".to_string())),
            Attribute::VariablePrimal(index) => self
                .slot(index.inner())
                .and_then(|slot| script.primal.get(slot))
                .map(|&value| AttributeValue::Float(value))
                .ok_or(SolverError::InvalidVariableIndex(*index)),
            Attribute::ConstraintDual(index) => {
                let set = self.constraint(*index)?.set().name();
                if script.dualless_sets.contains(&set) {
                    return Err(attribute.unsupported());
                }
                self.slot(index.inner())
                    .and_then(|slot| script.duals.get(slot))
                    .map(|values| AttributeValue::Vector(values.clone()))
                    .ok_or(SolverError::InvalidConstraintIndex(*index))
            }
            Attribute::ConstraintPrimal(index) => {
                let constraint = self.constraint(*index)?;
                let offset = self.offset();
                constraint
                    .function()
                    .components()
                    .iter()
                    .map(|expr| {
                        expr.evaluate(|id| {
                            id.inner()
                                .checked_sub(offset)
                                .and_then(|slot| script.primal.get(slot as usize))
                                .copied()
                        })
                    })
                    .collect::<Option<Vec<_>>>()
                    .map(AttributeValue::Vector)
                    .ok_or_else(|| SolverError::InternalError("missing primal".to_string()))
            }
            Attribute::ConstraintSet(index) => {
                Ok(AttributeValue::Set(*self.constraint(*index)?.set()))
            }
            _ => Err(attribute.unsupported()),
        }
    }

    fn set(&mut self, attribute: &Attribute, _value: AttributeValue) -> Result<(), SolverError> {
        match attribute {
            Attribute::Silent
            | Attribute::TimeLimitSec
            | Attribute::VariableName(_)
            | Attribute::ConstraintName(_) => {
                self.harness
                    .journal
                    .borrow_mut()
                    .writes
                    .push(attribute.to_string());
                Ok(())
            }
            _ => Err(attribute.unsupported()),
        }
    }

    fn close(&mut self) {
        self.harness.journal.borrow_mut().closed += 1;
    }

    fn add_variable(&mut self, variable: &Variable) -> Result<VariableIndex, SolverError> {
        self.variables.push(Some(*variable));
        Ok(VariableIndex::new(self.variables.len() as u32 - 1 + self.offset()))
    }

    fn add_constraint(
        &mut self,
        constraint: &ConstraintExpr,
    ) -> Result<ConstraintIndex, SolverError> {
        self.constraints.push(Some(constraint.clone()));
        Ok(ConstraintIndex::new(
            self.constraints.len() as u32 - 1 + self.offset(),
        ))
    }

    fn set_objective(&mut self, objective: Option<&Objective>) -> Result<(), SolverError> {
        self.objective = objective.cloned();
        Ok(())
    }

    fn delete_variable(&mut self, index: VariableIndex) -> Result<(), SolverError> {
        let slot = self
            .slot(index.inner())
            .filter(|&slot| self.variables.get(slot).is_some_and(Option::is_some))
            .ok_or(SolverError::InvalidVariableIndex(index))?;
        self.variables[slot] = None;
        Ok(())
    }

    fn delete_constraint(&mut self, index: ConstraintIndex) -> Result<(), SolverError> {
        let slot = self
            .slot(index.inner())
            .filter(|&slot| self.constraints.get(slot).is_some_and(Option::is_some))
            .ok_or(SolverError::InvalidConstraintIndex(index))?;
        self.constraints[slot] = None;
        Ok(())
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Model in `mode` with the harness factory already attached.
pub fn model_with(mode: Mode, harness: &Harness) -> Model {
    init_tracing();
    Model::with_config(
        ModelConfig::new()
            .with_mode(mode)
            .with_factory(harness.factory()),
    )
    .expect("model construction")
}

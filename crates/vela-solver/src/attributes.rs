//! Backend attributes and their values.

use vela_core::{Bounds, VariableCategory};
use vela_expr::ConstraintSet;

use crate::error::SolverError;
use crate::index::{ConstraintIndex, VariableIndex};
use crate::status::{ResultStatus, TerminationStatus};

/// Something a backend can be asked for (`get`) or told (`set`).
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    // Model and solve results
    TerminationStatus,
    RawStatusString,
    ResultCount,
    PrimalStatus,
    DualStatus,
    ObjectiveValue,
    DualObjectiveValue,
    ObjectiveBound,
    SolveTimeSec,
    SolverName,
    VariablePrimal(VariableIndex),
    ConstraintPrimal(ConstraintIndex),
    ConstraintDual(ConstraintIndex),
    // Structure, read in Direct mode
    ConstraintSet(ConstraintIndex),
    VariableBounds(VariableIndex),
    VariableCategory(VariableIndex),
    VariableName(VariableIndex),
    ConstraintName(ConstraintIndex),
    // Parameters
    TimeLimitSec,
    Silent,
    Threads,
    RawParameter(String),
}

impl Attribute {
    /// Attribute name without its index.
    pub fn name(&self) -> &str {
        match self {
            Attribute::TerminationStatus => "TerminationStatus",
            Attribute::RawStatusString => "RawStatusString",
            Attribute::ResultCount => "ResultCount",
            Attribute::PrimalStatus => "PrimalStatus",
            Attribute::DualStatus => "DualStatus",
            Attribute::ObjectiveValue => "ObjectiveValue",
            Attribute::DualObjectiveValue => "DualObjectiveValue",
            Attribute::ObjectiveBound => "ObjectiveBound",
            Attribute::SolveTimeSec => "SolveTimeSec",
            Attribute::SolverName => "SolverName",
            Attribute::VariablePrimal(_) => "VariablePrimal",
            Attribute::ConstraintPrimal(_) => "ConstraintPrimal",
            Attribute::ConstraintDual(_) => "ConstraintDual",
            Attribute::ConstraintSet(_) => "ConstraintSet",
            Attribute::VariableBounds(_) => "VariableBounds",
            Attribute::VariableCategory(_) => "VariableCategory",
            Attribute::VariableName(_) => "VariableName",
            Attribute::ConstraintName(_) => "ConstraintName",
            Attribute::TimeLimitSec => "TimeLimitSec",
            Attribute::Silent => "Silent",
            Attribute::Threads => "Threads",
            Attribute::RawParameter(name) => name,
        }
    }

    /// Reply for backends that do not implement this attribute.
    pub fn unsupported(&self) -> SolverError {
        SolverError::UnsupportedAttribute {
            attribute: self.to_string(),
        }
    }

    fn type_error(&self, expected: &'static str) -> SolverError {
        SolverError::AttributeType {
            attribute: self.to_string(),
            expected,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::VariablePrimal(index)
            | Attribute::VariableBounds(index)
            | Attribute::VariableCategory(index)
            | Attribute::VariableName(index) => write!(f, "{}({index})", self.name()),
            Attribute::ConstraintPrimal(index)
            | Attribute::ConstraintDual(index)
            | Attribute::ConstraintSet(index)
            | Attribute::ConstraintName(index) => write!(f, "{}({index})", self.name()),
            Attribute::RawParameter(name) => write!(f, "RawParameter({name})"),
            _ => f.write_str(self.name()),
        }
    }
}

/// Value carried by an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Termination(TerminationStatus),
    Result(ResultStatus),
    Count(usize),
    Float(f64),
    Vector(Vec<f64>),
    Text(String),
    Bool(bool),
    Set(ConstraintSet),
    Bounds(Bounds),
    Category(VariableCategory),
}

impl AttributeValue {
    /// Value kind used in type-mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Termination(_) => "termination status",
            AttributeValue::Result(_) => "result status",
            AttributeValue::Count(_) => "count",
            AttributeValue::Float(_) => "float",
            AttributeValue::Vector(_) => "vector",
            AttributeValue::Text(_) => "text",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Set(_) => "set",
            AttributeValue::Bounds(_) => "bounds",
            AttributeValue::Category(_) => "category",
        }
    }

    pub fn into_termination(self, attribute: &Attribute) -> Result<TerminationStatus, SolverError> {
        match self {
            AttributeValue::Termination(status) => Ok(status),
            _ => Err(attribute.type_error("termination status")),
        }
    }

    pub fn into_result_status(self, attribute: &Attribute) -> Result<ResultStatus, SolverError> {
        match self {
            AttributeValue::Result(status) => Ok(status),
            _ => Err(attribute.type_error("result status")),
        }
    }

    pub fn into_count(self, attribute: &Attribute) -> Result<usize, SolverError> {
        match self {
            AttributeValue::Count(count) => Ok(count),
            _ => Err(attribute.type_error("count")),
        }
    }

    pub fn into_float(self, attribute: &Attribute) -> Result<f64, SolverError> {
        match self {
            AttributeValue::Float(value) => Ok(value),
            _ => Err(attribute.type_error("float")),
        }
    }

    /// Scalars are promoted to a one-element vector.
    pub fn into_vector(self, attribute: &Attribute) -> Result<Vec<f64>, SolverError> {
        match self {
            AttributeValue::Vector(values) => Ok(values),
            AttributeValue::Float(value) => Ok(vec![value]),
            _ => Err(attribute.type_error("vector")),
        }
    }

    pub fn into_text(self, attribute: &Attribute) -> Result<String, SolverError> {
        match self {
            AttributeValue::Text(text) => Ok(text),
            _ => Err(attribute.type_error("text")),
        }
    }

    pub fn into_set(self, attribute: &Attribute) -> Result<ConstraintSet, SolverError> {
        match self {
            AttributeValue::Set(set) => Ok(set),
            _ => Err(attribute.type_error("set")),
        }
    }

    pub fn into_bounds(self, attribute: &Attribute) -> Result<Bounds, SolverError> {
        match self {
            AttributeValue::Bounds(bounds) => Ok(bounds),
            _ => Err(attribute.type_error("bounds")),
        }
    }
}

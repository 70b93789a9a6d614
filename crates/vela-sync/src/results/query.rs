//! Typed backend reads shared by result collection and Direct mode.

use vela_expr::ConstraintSet;
use vela_solver::{
    Attribute, Backend, ConstraintIndex, ResultStatus, TerminationStatus, VariableIndex,
};

use crate::error::Error;
use crate::results::decode::{decode, ResultValue};

pub(crate) fn termination(backend: &dyn Backend) -> Result<TerminationStatus, Error> {
    let attribute = Attribute::TerminationStatus;
    Ok(backend.get(&attribute)?.into_termination(&attribute)?)
}

/// An unsupported status query counts as no solution.
pub(crate) fn result_status(
    backend: &dyn Backend,
    attribute: Attribute,
) -> Result<ResultStatus, Error> {
    match backend.get(&attribute) {
        Ok(value) => Ok(value.into_result_status(&attribute)?),
        Err(err) if err.is_unsupported() => Ok(ResultStatus::NoSolution),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn optional_float(
    backend: &dyn Backend,
    attribute: Attribute,
) -> Result<Option<f64>, Error> {
    match backend.get(&attribute) {
        Ok(value) => Ok(Some(value.into_float(&attribute)?)),
        Err(err) if err.is_unsupported() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn raw_status(backend: &dyn Backend) -> Result<String, Error> {
    let attribute = Attribute::RawStatusString;
    match backend.get(&attribute) {
        Ok(value) => Ok(value.into_text(&attribute)?),
        Err(err) if err.is_unsupported() => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn result_count(backend: &dyn Backend) -> Result<Option<usize>, Error> {
    let attribute = Attribute::ResultCount;
    match backend.get(&attribute) {
        Ok(value) => Ok(Some(value.into_count(&attribute)?)),
        Err(err) if err.is_unsupported() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn variable_primal(backend: &dyn Backend, index: VariableIndex) -> Result<f64, Error> {
    let attribute = Attribute::VariablePrimal(index);
    Ok(backend.get(&attribute)?.into_float(&attribute)?)
}

pub(crate) fn constraint_set(
    backend: &dyn Backend,
    index: ConstraintIndex,
) -> Result<ConstraintSet, Error> {
    let attribute = Attribute::ConstraintSet(index);
    Ok(backend.get(&attribute)?.into_set(&attribute)?)
}

/// `None` when the backend has no dual for this constraint's set.
pub(crate) fn optional_constraint_dual(
    backend: &dyn Backend,
    index: ConstraintIndex,
    set: &ConstraintSet,
) -> Result<Option<ResultValue>, Error> {
    let attribute = Attribute::ConstraintDual(index);
    match backend.get(&attribute) {
        Ok(value) => decode(set, value.into_vector(&attribute)?).map(Some),
        Err(err) if err.is_unsupported() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn constraint_primal(
    backend: &dyn Backend,
    index: ConstraintIndex,
    set: &ConstraintSet,
) -> Result<ResultValue, Error> {
    let attribute = Attribute::ConstraintPrimal(index);
    decode(set, backend.get(&attribute)?.into_vector(&attribute)?)
}

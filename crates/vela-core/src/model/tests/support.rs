use vela_expr::ids::VariableId;
use vela_expr::{vector_of, ConstraintExpr, ConstraintSet};

use crate::model::ModelCache;
use crate::types::{Bounds, VariableCategory};

pub(super) fn continuous(model: &mut ModelCache) -> VariableId {
    model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap()
}

pub(super) fn soc_over(vars: &[VariableId]) -> ConstraintExpr {
    ConstraintExpr::vector(vector_of(vars), ConstraintSet::SecondOrderCone(vars.len())).unwrap()
}

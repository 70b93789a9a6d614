use vela_expr::{vector_of, ConstraintExpr, ConstraintSet, Expr};

use super::support::continuous;
use crate::model::{ModelCache, ParseError};
use crate::types::{Bounds, Sense, VariableCategory};

const SMALL_MODEL: &str = "\
variables: x, y, _v2
minobjective: 1.0*x + 2.5*y - 0.5*x*y + 3.0
x >= 0.0
x <= 10.0
y == 1.5
_v2 in ZeroOne()
cap: 1.0*x + 1.0*y <= 4.0
-1.0*x + 2.0*_v2 in Interval(-1.0, 1e-7)
[1.0*_v2, 1.0*x, 1.0*y] in SecondOrderCone(3)
";

fn small_model() -> ModelCache {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    let y = continuous(&mut model);
    let z = model
        .add_variable(Bounds::free(), VariableCategory::Binary)
        .unwrap();
    model.set_name(x.into(), "x").unwrap();
    model.set_name(y.into(), "y").unwrap();
    model.set_lower_bound(x, 0.0).unwrap();
    model.set_upper_bound(x, 10.0).unwrap();
    model.fix(y, 1.5, false).unwrap();

    let objective = Expr::var(x) + Expr::term(y, 2.5) + Expr::quad_term(x, y, -0.5);
    model
        .set_objective(Sense::Minimize, objective.add_constant(3.0))
        .unwrap();

    let cap = model
        .add_constraint((Expr::var(x) + Expr::var(y)).le_scalar(4.0))
        .unwrap();
    model.set_name(cap.into(), "cap").unwrap();
    model
        .add_constraint(
            ConstraintExpr::scalar(
                Expr::term(x, -1.0) + Expr::term(z, 2.0),
                ConstraintSet::Interval(-1.0, 1e-7),
            )
            .unwrap(),
        )
        .unwrap();
    model
        .add_constraint(
            ConstraintExpr::vector(vector_of(&[z, x, y]), ConstraintSet::SecondOrderCone(3))
                .unwrap(),
        )
        .unwrap();
    model
}

#[test]
fn test_emit_matches_authored_text() {
    assert_eq!(small_model().to_text(), SMALL_MODEL);
}

#[test]
fn test_parse_authored_text_reemits_identically() {
    let parsed = ModelCache::from_text(SMALL_MODEL).unwrap();
    assert_eq!(parsed.to_text(), SMALL_MODEL);
    assert_eq!(parsed.num_variables(), 3);
    assert_eq!(parsed.num_constraints(), 3);
}

#[test]
fn test_parse_recovers_structure() {
    let parsed = ModelCache::from_text(SMALL_MODEL).unwrap();
    let original = small_model();
    for id in original.variable_ids() {
        assert_eq!(parsed.get_variable(id), original.get_variable(id));
    }
    for id in original.constraint_ids() {
        assert_eq!(parsed.get_constraint(id), original.get_constraint(id));
    }
    assert_eq!(parsed.objective(), original.objective());
    assert_eq!(parsed.get_variable_name(original.variable_ids()[2]), None);
}

#[test]
fn test_comments_and_blank_lines_ignored() {
    let text = "\
# a tiny model
variables: a, b

maxobjective: 1.0*a   # profit
c1: 1.0*a - 1.0*b >= -2.0
";
    let parsed = ModelCache::from_text(text).unwrap();
    assert_eq!(parsed.objective().unwrap().sense, Sense::Maximize);
    let c1 = parsed.get_constraint_by_name("c1").unwrap();
    assert_eq!(
        parsed.get_constraint(c1).unwrap().set(),
        &ConstraintSet::GreaterThan(-2.0)
    );
}

#[test]
fn test_psd_and_empty_model() {
    let text = "\
variables: a, b, c
[1.0*a, 1.0*b, 1.0*c] in PositiveSemidefiniteConeTriangle(2)
";
    let parsed = ModelCache::from_text(text).unwrap();
    assert_eq!(parsed.to_text(), text);

    assert_eq!(ModelCache::new().to_text(), "variables: \n");
}

#[test]
fn test_bare_variable_with_cone_is_rejected() {
    let err = ModelCache::from_text("variables: x\nx in SecondOrderCone(1)\n").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
}

#[test]
fn test_dimension_mismatch_reported_as_model_error() {
    let err =
        ModelCache::from_text("variables: x, y\n[1.0*x, 1.0*y] in SecondOrderCone(3)\n")
            .unwrap_err();
    assert_eq!(err.code(), "PARSE_MODEL");
    assert_eq!(err.line(), 2);
}

use serde_json::json;
use vela_expr::ids::{EntityKind, EntityRef};
use vela_expr::Expr;

use super::support::continuous;
use crate::model::{ModelCache, ModelError};

#[test]
fn test_set_and_lookup_names() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    let con = model.add_constraint(Expr::var(x).le_scalar(1.0)).unwrap();

    model.set_name(x.into(), "x").unwrap();
    model.set_name(con.into(), "cap").unwrap();

    assert_eq!(model.get_variable_name(x), Some("x"));
    assert_eq!(model.get_variable_by_name("x"), Some(x));
    assert_eq!(model.get_constraint_by_name("cap"), Some(con));
    assert_eq!(model.name(con.into()), Some("cap"));
    assert_eq!(model.num_named(EntityKind::Variable), 1);
}

#[test]
fn test_duplicate_name_is_conflict_and_keeps_holder() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    let y = continuous(&mut model);
    model.set_name(x.into(), "flow").unwrap();
    let before = model.generation();

    let err = model.set_name(y.into(), "flow").unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        err,
        ModelError::NameConflict {
            kind: EntityKind::Variable,
            name: "flow".to_string(),
            holder: EntityRef::Variable(x),
        }
    );
    assert_eq!(model.get_variable_by_name("flow"), Some(x));
    assert_eq!(model.get_variable_name(y), None);
    assert_eq!(model.generation(), before);
}

#[test]
fn test_same_name_allowed_across_kinds() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    let con = model.add_constraint(Expr::var(x).ge_scalar(0.0)).unwrap();
    model.set_name(x.into(), "a").unwrap();
    model.set_name(con.into(), "a").unwrap();
    assert_eq!(model.get_constraint_by_name("a"), Some(con));
}

#[test]
fn test_rename_frees_old_name() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    let y = continuous(&mut model);
    model.set_name(x.into(), "old").unwrap();
    model.set_name(x.into(), "new").unwrap();
    model.set_name(y.into(), "old").unwrap();
    assert_eq!(model.get_variable_by_name("new"), Some(x));
    assert_eq!(model.get_variable_by_name("old"), Some(y));
}

#[test]
fn test_empty_name_clears() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    model.set_name(x.into(), "x").unwrap();
    model.set_name(x.into(), "").unwrap();
    assert_eq!(model.get_variable_name(x), None);
    assert_eq!(model.get_variable_by_name("x"), None);
}

#[test]
fn test_clearing_an_unnamed_entity_is_not_a_mutation() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    let before = model.generation();
    model.set_name(x.into(), "").unwrap();
    assert_eq!(model.generation(), before);

    model.set_name(x.into(), "x").unwrap();
    let named = model.generation();
    assert!(named > before);
    model.set_name(x.into(), "").unwrap();
    assert!(model.generation() > named);
}

#[test]
fn test_invalid_names_rejected() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    for bad in ["1x", "x y", "_v0", "in"] {
        assert!(matches!(
            model.set_name(x.into(), bad),
            Err(ModelError::InvalidName { .. })
        ));
    }
}

#[test]
fn test_remove_releases_name() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    model.set_name(x.into(), "x").unwrap();
    model.remove(x.into()).unwrap();
    assert_eq!(model.get_variable_by_name("x"), None);

    let y = continuous(&mut model);
    model.set_name(y.into(), "x").unwrap();
    assert_eq!(model.get_variable_by_name("x"), Some(y));
}

#[test]
fn test_metadata_is_not_a_mutation() {
    let mut model = ModelCache::new();
    let x = continuous(&mut model);
    let before = model.generation();
    model
        .set_variable_metadata(x, json!({"unit": "MW"}))
        .unwrap();
    assert_eq!(model.get_variable_metadata(x), Some(&json!({"unit": "MW"})));
    assert_eq!(model.generation(), before);
}

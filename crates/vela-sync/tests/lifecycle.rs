#![allow(clippy::float_cmp)]

mod support;

use support::{init_tracing, model_with, Harness, Script};
use vela_core::{Bounds, VariableCategory};
use vela_expr::{ConstraintExpr, ConstraintSet, EntityRef, Expr, VariableId};
use vela_solver::{BackendIndex, SolverConfig, TerminationStatus, VariableIndex};
use vela_sync::{ErrorKind, Mode, Model, ModelConfig, SyncState};

fn two_variable_lp(model: &mut Model) -> (VariableId, VariableId) {
    let x = model
        .add_variable(Bounds::non_negative(), VariableCategory::Continuous)
        .unwrap();
    let y = model
        .add_variable(Bounds::non_negative(), VariableCategory::Continuous)
        .unwrap();
    model
        .add_constraint((Expr::var(x) + Expr::var(y)).eq_scalar(1.0))
        .unwrap();
    model.minimize(Expr::var(x)).unwrap();
    (x, y)
}

#[test]
fn automatic_mode_syncs_on_optimize() {
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = model_with(Mode::Automatic, &harness);
    assert_eq!(model.state(), SyncState::OutOfSync);

    let (x, y) = two_variable_lp(&mut model);
    model.optimize().unwrap();

    assert_eq!(model.state(), SyncState::Synced);
    assert_eq!(model.termination_status().unwrap(), TerminationStatus::Optimal);
    assert_eq!(model.value(x).unwrap() + model.value(y).unwrap(), 1.0);
    assert_eq!(
        model.result_value_of(&(Expr::var(x) + Expr::var(y))).unwrap(),
        1.0
    );
    assert_eq!(harness.created(), 1);
    assert_eq!(harness.copies(), 1);
    assert_eq!(model.backend_name(), Some("mock"));
}

#[test]
fn second_optimize_without_changes_does_not_recopy() {
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = model_with(Mode::Automatic, &harness);
    two_variable_lp(&mut model);

    model.optimize().unwrap();
    model.optimize().unwrap();
    assert_eq!(harness.copies(), 1);
    assert_eq!(harness.optimizes(), 2);
}

#[test]
fn mutation_invalidates_results() {
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = model_with(Mode::Automatic, &harness);
    let (x, _) = two_variable_lp(&mut model);
    model.optimize().unwrap();
    assert!(model.has_result_values());

    model.set_upper_bound(x, 0.5).unwrap();
    assert_eq!(model.state(), SyncState::OutOfSync);
    assert!(!model.has_result_values());
    assert_eq!(
        model.termination_status().unwrap(),
        TerminationStatus::OptimizeNotCalled
    );
    assert_eq!(model.value(x).unwrap_err().kind(), ErrorKind::StaleMapping);

    model.optimize().unwrap();
    assert_eq!(harness.copies(), 2);
    assert_eq!(model.value(x).unwrap(), 0.25);
}

#[test]
fn renaming_counts_as_a_change() {
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = model_with(Mode::Automatic, &harness);
    let (x, _) = two_variable_lp(&mut model);
    model.optimize().unwrap();

    model.set_name(x.into(), "x").unwrap();
    assert_eq!(model.state(), SyncState::OutOfSync);
    assert_eq!(model.variable_by_name("x").unwrap(), Some(x));
}

#[test]
fn metadata_does_not_invalidate_results() {
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = model_with(Mode::Automatic, &harness);
    let (x, _) = two_variable_lp(&mut model);
    model.optimize().unwrap();

    model
        .set_variable_metadata(x, serde_json::json!({"unit": "MW"}))
        .unwrap();
    assert_eq!(model.state(), SyncState::Synced);
    assert_eq!(model.value(x).unwrap(), 0.25);
    assert_eq!(
        model.variable_metadata(x).unwrap(),
        Some(&serde_json::json!({"unit": "MW"}))
    );
}

#[test]
fn manual_mode_requires_explicit_sync() {
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = model_with(Mode::Manual, &harness);
    let (x, _) = two_variable_lp(&mut model);

    let err = model.optimize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StaleMapping);
    assert_eq!(harness.copies(), 0);

    model.sync().unwrap();
    assert_eq!(model.state(), SyncState::Synced);
    model.optimize().unwrap();
    assert_eq!(model.value(x).unwrap(), 0.25);

    model.fix(x, 0.1, true).unwrap();
    assert_eq!(
        model.backend_index(x.into()).unwrap_err().kind(),
        ErrorKind::StaleMapping
    );
}

#[test]
fn manual_mode_without_backend_is_not_attached() {
    init_tracing();
    let mut model = Model::with_config(ModelConfig::new().with_mode(Mode::Manual)).unwrap();
    model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();
    assert_eq!(model.state(), SyncState::Empty);
    assert_eq!(model.optimize().unwrap_err().kind(), ErrorKind::NotAttached);
    assert_eq!(model.sync().unwrap_err().kind(), ErrorKind::NotAttached);
}

#[test]
fn automatic_mode_without_factory_is_not_attached() {
    init_tracing();
    let mut model = Model::new();
    assert_eq!(model.optimize().unwrap_err().kind(), ErrorKind::NotAttached);
}

#[test]
fn failed_copy_closes_backend_once() {
    let harness = Harness::with_script(Script {
        unsupported_sets: vec!["SecondOrderCone"],
        ..Script::default()
    });
    let mut model = model_with(Mode::Automatic, &harness);
    let t = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();
    let u = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();
    model
        .add_constraint(
            ConstraintExpr::vector(
                vec![Expr::var(t), Expr::var(u)],
                ConstraintSet::SecondOrderCone(2),
            )
            .unwrap(),
        )
        .unwrap();

    let err = model.optimize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Copy);
    assert_eq!(err.code(), "COPY_UNSUPPORTED_CONSTRAINT");
    assert_eq!(harness.created(), 1);
    assert_eq!(harness.closed(), 1);
    assert_eq!(model.state(), SyncState::Empty);

    // The factory survives; the next attempt builds a fresh instance.
    assert_eq!(model.optimize().unwrap_err().kind(), ErrorKind::Copy);
    assert_eq!(harness.created(), 2);
    assert_eq!(harness.closed(), 2);
}

#[test]
fn short_receipt_is_a_copy_error() {
    let harness = Harness::with_script(Script {
        short_receipt: true,
        ..Script::default()
    });
    let mut model = model_with(Mode::Manual, &harness);
    two_variable_lp(&mut model);

    let err = model.sync().unwrap_err();
    assert_eq!(err.code(), "COPY_RECEIPT_MISMATCH");
    assert_eq!(harness.closed(), 1);
    assert_eq!(model.state(), SyncState::Empty);
}

#[test]
fn detach_and_reattach() {
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = model_with(Mode::Automatic, &harness);
    let (x, _) = two_variable_lp(&mut model);
    model.optimize().unwrap();

    model.detach().unwrap();
    assert_eq!(harness.closed(), 1);
    assert_eq!(model.state(), SyncState::Empty);
    assert_eq!(model.backend_name(), None);
    assert_eq!(model.value(x).unwrap_err().kind(), ErrorKind::NotAttached);

    model.reattach().unwrap();
    assert_eq!(harness.created(), 2);
    assert_eq!(model.state(), SyncState::OutOfSync);
}

#[test]
fn dropping_the_model_closes_the_backend() {
    let harness = Harness::new();
    {
        let _model = model_with(Mode::Automatic, &harness);
        assert_eq!(harness.closed(), 0);
    }
    assert_eq!(harness.closed(), 1);
}

#[test]
fn set_backend_replaces_factory() {
    let first = Harness::new();
    let second = Harness::new();
    second.set_primal(vec![0.5, 0.5]);
    let mut model = model_with(Mode::Automatic, &first);
    let (x, _) = two_variable_lp(&mut model);

    model.set_backend(second.factory()).unwrap();
    assert_eq!(first.closed(), 1);
    assert_eq!(model.state(), SyncState::Empty);
    assert_eq!(second.created(), 0);

    model.optimize().unwrap();
    assert_eq!(second.created(), 1);
    assert_eq!(model.value(x).unwrap(), 0.5);
}

#[test]
fn optimize_with_conflicts_with_configured_factory() {
    let configured = Harness::with_script(Script {
        objective_value: 0.25,
        ..Script::default()
    });
    configured.set_primal(vec![0.25, 0.75]);
    let other = Harness::new();
    let mut model = model_with(Mode::Automatic, &configured);
    let (x, y) = two_variable_lp(&mut model);
    model.optimize().unwrap();

    let err = model.optimize_with(other.factory()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(model.state(), SyncState::Synced);
    assert_eq!(other.created(), 0);
    assert_eq!(configured.closed(), 0);
    assert_eq!(configured.optimizes(), 1);

    assert!(model.has_result_values());
    assert_eq!(model.value(x).unwrap(), 0.25);
    assert_eq!(model.value(y).unwrap(), 0.75);
    assert_eq!(model.objective_value().unwrap(), 0.25);
    assert_eq!(model.num_variables().unwrap(), 2);
    assert_eq!(model.num_constraints().unwrap(), 1);
}

#[test]
fn optimize_with_attaches_an_unconfigured_model() {
    init_tracing();
    let harness = Harness::new();
    harness.set_primal(vec![0.25, 0.75]);
    let mut model = Model::new();
    let (x, _) = two_variable_lp(&mut model);

    model.optimize_with(harness.factory()).unwrap();
    assert_eq!(model.state(), SyncState::Synced);
    assert_eq!(model.value(x).unwrap(), 0.25);
}

#[test]
fn ids_are_never_reused_and_map_to_backend_indices() {
    let harness = Harness::with_script(Script {
        index_offset: 10,
        ..Script::default()
    });
    let mut model = model_with(Mode::Automatic, &harness);
    let x = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();
    model.remove(x.into()).unwrap();
    let y = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();

    assert_ne!(x, y);
    assert!(!model.is_valid(x.into()).unwrap());
    assert!(model.is_valid(y.into()).unwrap());

    let index = model.backend_index(y.into()).unwrap();
    assert_eq!(index, BackendIndex::Variable(VariableIndex::new(10)));
    assert_eq!(model.entity_of(index).unwrap(), EntityRef::Variable(y));
    assert_eq!(
        model.backend_index(x.into()).unwrap_err().kind(),
        ErrorKind::Model
    );
}

#[test]
fn solver_config_is_applied_on_attach() {
    init_tracing();
    let harness = Harness::new();
    let model = Model::with_config(
        ModelConfig::new()
            .with_factory(harness.factory())
            .with_solver_config(SolverConfig::new().with_silent(true).with_threads(4)),
    )
    .unwrap();
    assert!(harness.wrote("Silent"));
    assert!(!harness.wrote("Threads"));
    assert_eq!(model.state(), SyncState::OutOfSync);
}

#[test]
fn text_round_trip_through_model() {
    init_tracing();
    let text = "variables: x, y\nminobjective: 1.0*x + 2.0*y\nx >= 0.0\ncap: 1.0*x + 1.0*y <= 4.0\n";
    let model = Model::from_text(text, ModelConfig::new()).unwrap();
    assert_eq!(model.num_variables().unwrap(), 2);
    assert_eq!(model.num_constraints().unwrap(), 1);
    assert!(model.constraint_by_name("cap").unwrap().is_some());
    assert_eq!(model.to_text().unwrap(), text);
}

#[test]
fn name_conflict_is_reported_as_conflict() {
    init_tracing();
    let mut model = Model::new();
    let x = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();
    let y = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();
    model.set_name(x.into(), "flow").unwrap();
    let err = model.set_name(y.into(), "flow").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(model.name(y.into()).unwrap(), None);
}

#[test]
fn ids_survive_detach_and_reattach() {
    let harness = Harness::new();
    let mut model = model_with(Mode::Automatic, &harness);
    let x = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();
    model.detach().unwrap();
    model.reattach().unwrap();
    let y = model
        .add_variable(Bounds::free(), VariableCategory::Continuous)
        .unwrap();

    assert_ne!(x, y);
    assert!(model.is_valid(x.into()).unwrap());
    model.sync().unwrap();
    let index = model.backend_index(y.into()).unwrap();
    assert_eq!(model.entity_of(index).unwrap(), EntityRef::Variable(y));
}

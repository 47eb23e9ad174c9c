mod common;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::fs;

use automation_business_case::finance::{IrrSolver, Metric, UndefinedReason};
use automation_business_case::scenario::{BenefitCategory, BenefitEntry};
use automation_business_case::scenario::store::{self, StoreError};
use automation_business_case::scenario::{compute_many, LoadPolicy, Scenario};
use common::{example_inputs, no_investment_inputs, EXAMPLE_TOML};

#[test]
fn json_round_trip_is_exact() {
    let scenario = Scenario::compute(example_inputs()).unwrap();
    let json = store::to_json(&scenario).unwrap();
    let back = store::from_json(&json).unwrap();
    assert_eq!(back, scenario);
}

#[test]
fn undefined_metrics_are_written_as_null_and_restored() {
    let scenario = Scenario::compute(no_investment_inputs()).unwrap();
    let o = &scenario.outputs;
    assert_eq!(o.irr, Metric::Undefined(UndefinedReason::NotMeaningful));
    assert_eq!(o.payback, Metric::Defined(0.0));
    assert_eq!(o.cum_3, Metric::Undefined(UndefinedReason::BeyondHorizon));

    let json = store::to_json(&scenario).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["outputs"]["irr"].is_null());
    assert!(value["outputs"]["cum_5"].is_null());
    assert_eq!(store::from_json(&json).unwrap(), scenario);
}

#[test]
fn legacy_project_cost_name_is_accepted() {
    let scenario = Scenario::compute(example_inputs()).unwrap();
    let json = store::to_json(&scenario)
        .unwrap()
        .replace("\"project_cost_effective\"", "\"project_cost\"");
    let back = store::from_json(&json).unwrap();
    assert_eq!(back.outputs.project_cost_effective, 50_000.0);
}

#[test]
fn file_name_uses_slug_and_timestamp() {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(
        store::scenario_file_name("Buy", at),
        "BusinessCaseScenario_Buy_20240102_030405.json"
    );
}

#[test]
fn save_then_load_trusted() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = Scenario::compute(example_inputs()).unwrap();
    let path = store::save(&scenario, dir.path(), None).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("BusinessCaseScenario_Build_"), "{name}");

    let loaded = store::load(&path, LoadPolicy::Trust, &IrrSolver::default()).unwrap();
    assert!(loaded.scenario.saved_at.is_some());
    assert!(loaded.discrepancies.is_empty());
    assert_eq!(loaded.scenario.inputs, scenario.inputs);
    assert_eq!(loaded.scenario.outputs, scenario.outputs);
}

#[test]
fn recompute_reports_tampered_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = Scenario::compute(example_inputs()).unwrap();
    let path = store::save(&scenario, dir.path(), Some("tampered")).unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    value["outputs"]["npv"] = serde_json::json!(1.0);
    value["outputs"]["irr"] = serde_json::Value::Null;
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

    let solver = IrrSolver::default();
    let loaded = store::load(&path, LoadPolicy::Recompute, &solver).unwrap();
    let fields: Vec<&str> = loaded.discrepancies.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["npv", "irr"]);
    assert_eq!(loaded.scenario.outputs, scenario.outputs);

    let trusted = store::load(&path, LoadPolicy::Trust, &solver).unwrap();
    assert_eq!(trusted.scenario.outputs.npv, 1.0);
    assert_eq!(
        trusted.scenario.outputs.irr,
        Metric::Undefined(UndefinedReason::NotMeaningful)
    );
}

#[test]
fn recompute_reports_each_tampered_cash_flow() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = Scenario::compute(example_inputs()).unwrap();
    let path = store::save(&scenario, dir.path(), None).unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    value["outputs"]["cash_flows"][2] = serde_json::json!(999.0);
    value["outputs"]["cash_flows"][4] = serde_json::json!(0.0);
    fs::write(&path, value.to_string()).unwrap();

    let loaded = store::load(&path, LoadPolicy::Recompute, &IrrSolver::default()).unwrap();
    let fields: Vec<&str> = loaded.discrepancies.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["cash_flows[2]", "cash_flows[4]"]);
    assert_eq!(loaded.discrepancies[0].stored, Metric::Defined(999.0));
    assert_eq!(
        loaded.discrepancies[0].recomputed,
        Metric::Defined(scenario.outputs.cash_flows[2])
    );
}

#[test]
fn overflowing_scenario_fails_instead_of_saving_nulls() {
    let mut inputs = example_inputs();
    inputs.volume.hourly_rate = 1e306;
    inputs.volume.changes_per_month = 1e3;
    let err = Scenario::compute(inputs).unwrap_err();
    assert_eq!(err.field(), Some("annual_cost_savings"));

    let mut inputs = example_inputs();
    inputs.benefits.insert(
        BenefitCategory::Other,
        BenefitEntry {
            enabled: true,
            name: "Huge".into(),
            annual_value: f64::MAX / 2.0,
            methodology: String::new(),
            assumptions: String::new(),
        },
    );
    let err = Scenario::compute(inputs).unwrap_err();
    assert_eq!(err.field(), Some("npv"));
}

#[test]
fn zero_scope_scenario_round_trips() {
    let mut inputs = example_inputs();
    inputs.volume.num_locations = 0;
    let scenario = Scenario::compute(inputs).unwrap();
    assert!(!scenario.outputs.benefit_per_site_per_year.is_defined());
    let back = store::from_json(&store::to_json(&scenario).unwrap()).unwrap();
    assert_eq!(back, scenario);
}

#[test]
fn untouched_file_recomputes_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = Scenario::compute(example_inputs()).unwrap();
    let path = store::save(&scenario, dir.path(), None).unwrap();
    let loaded = store::load(&path, LoadPolicy::Recompute, &IrrSolver::default()).unwrap();
    assert!(loaded.discrepancies.is_empty());
}

#[test]
fn recompute_rejects_invalid_stored_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = Scenario::compute(example_inputs()).unwrap();
    let path = store::save(&scenario, dir.path(), None).unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    value["inputs"]["volume"]["automation_coverage"] = serde_json::json!(2.0);
    fs::write(&path, value.to_string()).unwrap();

    let err = store::load(&path, LoadPolicy::Recompute, &IrrSolver::default()).unwrap_err();
    assert!(matches!(err, StoreError::Finance(_)), "{err}");
}

#[test]
fn toml_inputs_are_read_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("example.toml");
    fs::write(&path, EXAMPLE_TOML).unwrap();
    let inputs = store::read_inputs(&path).unwrap();
    assert_eq!(inputs.steps.manual.total(), 120.0);
    assert_eq!(inputs.acquisition.one_time_total(), 50_000.0);

    let from_toml = Scenario::compute(inputs).unwrap();
    let reference = Scenario::compute(example_inputs()).unwrap();
    assert_eq!(from_toml.outputs.cash_flows, reference.outputs.cash_flows);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inputs.yaml");
    fs::write(&path, "years: 5").unwrap();
    assert!(matches!(
        store::read_inputs(&path),
        Err(StoreError::UnsupportedFormat(_))
    ));
}

#[test]
fn batch_compute_keeps_order_and_errors() {
    let mut bad = example_inputs();
    bad.years = 0;
    let results = compute_many(
        vec![example_inputs(), bad, no_investment_inputs()],
        &IrrSolver::default(),
    );
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().outputs.cash_flows.len(), 3);
}

mod common;

use pretty_assertions::assert_eq;

use automation_business_case::comparison::{compare, compare_against, compare_labeled, ComparedField};
use automation_business_case::finance::{Metric, UndefinedReason};
use automation_business_case::scenario::{AcquisitionStrategy, Scenario};
use common::{buy_inputs, example_inputs, no_investment_inputs};

#[test]
fn rows_follow_fixed_order_with_exact_deltas() {
    let a = Scenario::compute(buy_inputs()).unwrap();
    let b = Scenario::compute(example_inputs()).unwrap();
    let table = compare(&a, &b);

    let fields: Vec<ComparedField> = table.rows.iter().map(|r| r.field).collect();
    assert_eq!(fields, ComparedField::ALL.to_vec());

    let npv = table.row(ComparedField::Npv).unwrap();
    assert_eq!(npv.delta, Metric::Defined(b.outputs.npv - a.outputs.npv));
    let cost = table.row(ComparedField::ProjectCost).unwrap();
    assert_eq!(cost.value_a, Metric::Defined(20_000.0));
    assert_eq!(cost.value_b, Metric::Defined(50_000.0));
    assert_eq!(cost.delta, Metric::Defined(30_000.0));

    assert_eq!(table.strategy_a, AcquisitionStrategy::Buy);
    assert_eq!(table.strategy_b, AcquisitionStrategy::Build);
    assert_eq!((table.label_a.as_str(), table.label_b.as_str()), ("A", "B"));
}

#[test]
fn undefined_side_gives_undefined_delta() {
    let a = Scenario::compute(example_inputs()).unwrap();
    let b = Scenario::compute(no_investment_inputs()).unwrap();
    let table = compare_labeled(&a, &b, "build", "free");
    let irr = table.row(ComparedField::Irr).unwrap();
    assert!(irr.value_a.is_defined());
    assert_eq!(irr.value_b, Metric::Undefined(UndefinedReason::NotMeaningful));
    assert_eq!(irr.delta, Metric::Undefined(UndefinedReason::Incomparable));

    let json = serde_json::to_value(&table).unwrap();
    let irr_row = json["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["field"] == "irr")
        .unwrap();
    assert!(irr_row["delta"].is_null());
}

#[test]
fn comparing_with_itself_gives_zero_deltas() {
    let a = Scenario::compute(example_inputs()).unwrap();
    let table = compare(&a, &a);
    for row in &table.rows {
        assert_eq!(row.delta, Metric::Defined(0.0), "{:?}", row.field);
    }
}

#[test]
fn baseline_against_many_keeps_candidate_order() {
    let base = Scenario::compute(example_inputs()).unwrap();
    let candidates = vec![
        ("buy".to_string(), Scenario::compute(buy_inputs()).unwrap()),
        ("free".to_string(), Scenario::compute(no_investment_inputs()).unwrap()),
    ];
    let tables = compare_against(("build", &base), &candidates);
    let labels: Vec<&str> = tables.iter().map(|t| t.label_b.as_str()).collect();
    assert_eq!(labels, vec!["buy", "free"]);
    assert!(tables.iter().all(|t| t.label_a == "build"));
}

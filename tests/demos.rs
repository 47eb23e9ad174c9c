use std::path::PathBuf;

use automation_business_case::comparison::{compare_labeled, ComparedField};
use automation_business_case::estimators::csat::{estimate_csat_debt, CsatDebtInput};
use automation_business_case::estimators::time_savings::{compute_time_savings, TimeSavingsInput};
use automation_business_case::finance::Metric;
use automation_business_case::scenario::{store, AcquisitionStrategy, DebtKind, Scenario};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn build_demo_applies_debts_and_benefits() {
    let inputs = store::read_inputs(&demo("build.toml")).unwrap();
    assert_eq!(inputs.acquisition.strategy, AcquisitionStrategy::Build);
    assert_eq!(inputs.steps.manual.total(), 120.0);
    assert_eq!(inputs.steps.automated.total(), 20.0);

    let scenario = Scenario::compute(inputs).unwrap();
    let o = &scenario.outputs;
    assert_eq!(o.project_cost_effective, 55_000.0);
    assert_eq!(o.debt_charges.len(), 2);
    let technical = o
        .debt_charges
        .iter()
        .find(|d| d.kind == DebtKind::Technical)
        .unwrap();
    assert!((technical.annual_after_remediation - 1_000.0).abs() < 1e-6);
    assert_eq!(o.annual_additional_benefits, 48_000.0);
    assert!(o.irr.is_defined());
    assert!(matches!(o.payback, Metric::Defined(p) if p < 1.0));
}

#[test]
fn buy_and_build_demos_compare() {
    let build = Scenario::compute(store::read_inputs(&demo("build.toml")).unwrap()).unwrap();
    let buy = Scenario::compute(store::read_inputs(&demo("buy.toml")).unwrap()).unwrap();
    let table = compare_labeled(&buy, &build, "buy", "build");
    let run = table.row(ComparedField::AnnualRunCost).unwrap();
    assert!((run.delta.value().unwrap() + 35_000.0).abs() < 1e-6);
    assert_eq!(table.strategy_a, AcquisitionStrategy::Buy);
}

#[test]
fn estimator_demos_parse() {
    let ts: TimeSavingsInput = store::read_document(&demo("time_savings.toml")).unwrap();
    let r = compute_time_savings(&ts).unwrap();
    assert_eq!(r.minutes_saved_per_interaction, 50.0);
    assert_eq!(r.interactions_per_year, 3_000.0);

    let csat: CsatDebtInput = store::read_document(&demo("csat_debt.toml")).unwrap();
    let est = estimate_csat_debt(&csat).unwrap();
    assert_eq!(est.counts.total(), 10);
    assert_eq!((est.counts.happy, est.counts.neutral, est.counts.sad), (1, 3, 6));
    // (0×1 + 25×3 + 75×6) / 10 = 52.5 per response, 240 responses/year
    assert_eq!(est.avg_cost_per_response, Metric::Defined(52.5));
    assert!((est.annual_cost - 12_600.0).abs() < 1e-6);
}

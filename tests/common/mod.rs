#![allow(dead_code)]

use automation_business_case::scenario::{
    AcquisitionStrategy, CostItem, ScenarioInputs, StepMinutes,
};

/// 5년, 수동 120분 / 자동화 20분, 월 100건, 80%, $75/h, 일회성 50,000, 운영 10,000, 10%.
pub fn example_inputs() -> ScenarioInputs {
    let mut inputs = ScenarioInputs {
        title: "Example".into(),
        ..ScenarioInputs::default()
    };
    inputs.volume.changes_per_month = 100.0;
    inputs.volume.automation_coverage = 0.8;
    inputs.volume.hourly_rate = 75.0;
    inputs.steps.manual = StepMinutes::from_array([15.0; 8]);
    inputs.steps.automated = StepMinutes::from_array([2.5; 8]);
    inputs.acquisition.one_time_costs = vec![CostItem::new("Implementation", 50_000.0)];
    inputs.acquisition.annual_run_cost = 10_000.0;
    inputs
}

/// 같은 업무를 라이선스 구매로 처리하는 경우.
pub fn buy_inputs() -> ScenarioInputs {
    let mut inputs = example_inputs();
    inputs.title = "Vendor tool".into();
    inputs.acquisition.strategy = AcquisitionStrategy::Buy;
    inputs.acquisition.one_time_costs = vec![CostItem::new("Onboarding", 20_000.0)];
    inputs.acquisition.annual_run_cost = 40_000.0;
    inputs
}

/// 투자 없이 편익만 있어 IRR이 정의되지 않는 2년 시나리오.
pub fn no_investment_inputs() -> ScenarioInputs {
    let mut inputs = example_inputs();
    inputs.years = 2;
    inputs.acquisition.one_time_costs.clear();
    inputs
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}

pub const EXAMPLE_TOML: &str = r#"
title = "Example"
years = 5
discount_rate = 0.10

[volume]
changes_per_month = 100.0
automation_coverage = 0.8
hourly_rate = 75.0

[steps.manual]
execute = 120.0

[steps.automated]
execute = 20.0

[acquisition]
strategy = "build"
annual_run_cost = 10000.0

[[acquisition.one_time_costs]]
name = "Implementation"
amount = 50000.0
"#;

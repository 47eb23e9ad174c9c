//! 시나리오 입력을 연도별 현금흐름으로 변환한다.

use serde::{Deserialize, Serialize};

use super::error::FinanceError;
use crate::scenario::inputs::{DebtKind, DebtParams, ScenarioInputs};

const MONTHS_PER_YEAR: f64 = 12.0;
const MINUTES_PER_HOUR: f64 = 60.0;

/// 활성화된 부채 1건이 비용에 반영된 내역.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtCharge {
    pub kind: DebtKind,
    /// 적용 영향 비율 = 1 − 자동화 비율
    pub impact_fraction: f64,
    /// 영향 비율 적용 후 연간 부채 [USD/년]
    pub annual_impact: f64,
    /// 개선 조치 반영 후 연간 부채 [USD/년]
    pub annual_after_remediation: f64,
    /// 0년차 개선 비용 [USD]
    pub remediation_one_time: f64,
}

impl DebtCharge {
    fn from_params(kind: DebtKind, params: &DebtParams, automation_coverage: f64) -> Self {
        let impact_fraction = (1.0 - automation_coverage).max(0.0);
        let annual_impact = params.full_impact_annual * impact_fraction;
        let (annual_after_remediation, remediation_one_time) = match params.remediation {
            Some(rem) => (annual_impact * rem.residual_fraction, rem.one_time_cost),
            None => (annual_impact, 0.0),
        };
        Self {
            kind,
            impact_fraction,
            annual_impact,
            annual_after_remediation,
            remediation_one_time,
        }
    }
}

/// 현금흐름 산출 결과와 중간 계산값.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowBreakdown {
    pub tasks_per_year: f64,
    pub manual_total_minutes: f64,
    pub automated_total_minutes: f64,
    /// 음수일 수 있다(자동화가 더 느린 경우).
    pub minutes_saved_per_change: f64,
    pub hours_saved_per_change: f64,
    pub effective_changes_per_year: f64,
    pub annual_hours_saved: f64,
    pub annual_cost_savings: f64,
    pub annual_additional_benefits: f64,
    pub annual_total_benefit: f64,
    pub debt_charges: Vec<DebtCharge>,
    pub annual_run_cost_effective: f64,
    pub annual_net_benefit: f64,
    pub project_cost_effective: f64,
    /// 길이 `years + 1`. `[0]`은 −초기투자, 이후는 연간 순편익.
    pub cash_flows: Vec<f64>,
}

const OVERFLOW: &str = "계산 결과가 유한하지 않습니다(입력값이 너무 큽니다).";

/// 파생값이 유한한지 확인한다. 범위 안의 입력도 곱셈에서 넘칠 수 있다.
pub(crate) fn require_finite(
    field: impl FnOnce() -> String,
    value: f64,
) -> Result<(), FinanceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FinanceError::invalid_input(field(), OVERFLOW))
    }
}

impl CashFlowBreakdown {
    fn ensure_finite(&self) -> Result<(), FinanceError> {
        let scalars = [
            ("tasks_per_year", self.tasks_per_year),
            ("manual_total_minutes", self.manual_total_minutes),
            ("automated_total_minutes", self.automated_total_minutes),
            ("minutes_saved_per_change", self.minutes_saved_per_change),
            ("hours_saved_per_change", self.hours_saved_per_change),
            ("effective_changes_per_year", self.effective_changes_per_year),
            ("annual_hours_saved", self.annual_hours_saved),
            ("annual_cost_savings", self.annual_cost_savings),
            ("annual_additional_benefits", self.annual_additional_benefits),
            ("annual_total_benefit", self.annual_total_benefit),
            ("annual_run_cost_effective", self.annual_run_cost_effective),
            ("annual_net_benefit", self.annual_net_benefit),
            ("project_cost_effective", self.project_cost_effective),
        ];
        for (field, value) in scalars {
            require_finite(|| field.to_string(), value)?;
        }
        for charge in &self.debt_charges {
            let k = charge.kind.key();
            require_finite(|| format!("debt_charges.{k}.annual_impact"), charge.annual_impact)?;
            require_finite(
                || format!("debt_charges.{k}.annual_after_remediation"),
                charge.annual_after_remediation,
            )?;
        }
        for (t, cf) in self.cash_flows.iter().enumerate() {
            require_finite(|| format!("cash_flows[{t}]"), *cf)?;
        }
        Ok(())
    }
}

/// 입력을 검증한 뒤 현금흐름을 만든다. 파생값이 넘치면 해당 필드 이름으로 실패한다.
pub fn build(inputs: &ScenarioInputs) -> Result<CashFlowBreakdown, FinanceError> {
    inputs.validate()?;

    let volume = &inputs.volume;
    let tasks_per_year = volume.changes_per_month * MONTHS_PER_YEAR;

    let manual_total_minutes = inputs.steps.manual.total();
    let automated_total_minutes = inputs.steps.automated.total();
    let minutes_saved_per_change = manual_total_minutes - automated_total_minutes;
    let hours_saved_per_change = minutes_saved_per_change / MINUTES_PER_HOUR;

    let effective_changes_per_year = tasks_per_year * volume.automation_coverage;
    let annual_hours_saved = hours_saved_per_change * effective_changes_per_year;
    let annual_cost_savings = annual_hours_saved * volume.hourly_rate;

    let annual_additional_benefits: f64 = inputs
        .enabled_benefits()
        .map(|(_, b)| b.annual_value)
        .sum();
    let annual_total_benefit = annual_cost_savings + annual_additional_benefits;

    let debt_charges: Vec<DebtCharge> = inputs
        .enabled_debts()
        .map(|(kind, params)| DebtCharge::from_params(*kind, params, volume.automation_coverage))
        .collect();

    let annual_run_cost_effective = inputs.acquisition.annual_run_cost
        + debt_charges
            .iter()
            .map(|d| d.annual_after_remediation)
            .sum::<f64>();
    let annual_net_benefit = annual_total_benefit - annual_run_cost_effective;

    let project_cost_effective = inputs.acquisition.one_time_total()
        + debt_charges
            .iter()
            .map(|d| d.remediation_one_time)
            .sum::<f64>();

    let mut cash_flows = Vec::with_capacity(inputs.years as usize + 1);
    cash_flows.push(-project_cost_effective);
    cash_flows.extend(std::iter::repeat(annual_net_benefit).take(inputs.years as usize));

    let breakdown = CashFlowBreakdown {
        tasks_per_year,
        manual_total_minutes,
        automated_total_minutes,
        minutes_saved_per_change,
        hours_saved_per_change,
        effective_changes_per_year,
        annual_hours_saved,
        annual_cost_savings,
        annual_additional_benefits,
        annual_total_benefit,
        debt_charges,
        annual_run_cost_effective,
        annual_net_benefit,
        project_cost_effective,
        cash_flows,
    };
    breakdown.ensure_finite()?;
    Ok(breakdown)
}

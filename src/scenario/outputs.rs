//! 입력으로부터 파생되는 출력과 시나리오 조립.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::inputs::ScenarioInputs;
use crate::finance::cash_flow::require_finite;
use crate::finance::metric::{
    deserialize_checkpoint, deserialize_irr, deserialize_payback, deserialize_ratio,
};
use crate::finance::{
    self, per_unit, CashFlowBreakdown, DebtCharge, FinanceError, IrrSolver, Metric, Metrics,
    UndefinedReason,
};

/// 저장 파일 스키마 버전.
pub const SCHEMA_VERSION: &str = "1.0";

/// 파생 출력. 입력이 바뀌면 통째로 다시 계산하며 개별 필드를 고치지 않는다.
///
/// 필드 이름은 외부 JSON 스키마로 고정되어 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutputs {
    pub tasks_per_year: f64,
    pub manual_total_minutes: f64,
    pub automated_total_minutes: f64,
    pub minutes_saved_per_change: f64,
    pub hours_saved_per_change: f64,
    pub effective_changes_per_year: f64,
    pub annual_hours_saved: f64,
    pub annual_cost_savings: f64,
    pub annual_additional_benefits: f64,
    pub annual_total_benefit: f64,
    #[serde(default)]
    pub debt_charges: Vec<DebtCharge>,
    pub annual_run_cost_effective: f64,
    pub annual_net_benefit: f64,
    #[serde(alias = "project_cost")]
    pub project_cost_effective: f64,
    pub cash_flows: Vec<f64>,
    pub npv: f64,
    #[serde(deserialize_with = "deserialize_irr")]
    pub irr: Metric,
    #[serde(deserialize_with = "deserialize_payback")]
    pub payback: Metric,
    #[serde(deserialize_with = "deserialize_checkpoint")]
    pub cum_1: Metric,
    #[serde(deserialize_with = "deserialize_checkpoint")]
    pub cum_3: Metric,
    #[serde(deserialize_with = "deserialize_checkpoint")]
    pub cum_5: Metric,
    /// 적용 범위 전체 스위치 수
    #[serde(default)]
    pub total_switches: u64,
    /// 스위치당 연간 절감 시간 [h]
    #[serde(default = "not_meaningful", deserialize_with = "deserialize_ratio")]
    pub hours_saved_per_switch_per_year: Metric,
    /// 사이트당 연간 절감 시간 [h]
    #[serde(default = "not_meaningful", deserialize_with = "deserialize_ratio")]
    pub hours_saved_per_site_per_year: Metric,
    /// 스위치당 연간 총편익 [USD]
    #[serde(default = "not_meaningful", deserialize_with = "deserialize_ratio")]
    pub benefit_per_switch_per_year: Metric,
    /// 사이트당 연간 총편익 [USD]
    #[serde(default = "not_meaningful", deserialize_with = "deserialize_ratio")]
    pub benefit_per_site_per_year: Metric,
    /// 변경 1건당 총편익 [USD]
    #[serde(default = "not_meaningful", deserialize_with = "deserialize_ratio")]
    pub benefit_per_change: Metric,
}

fn not_meaningful() -> Metric {
    Metric::Undefined(UndefinedReason::NotMeaningful)
}

impl ScenarioOutputs {
    fn assemble(inputs: &ScenarioInputs, flows: CashFlowBreakdown, metrics: Metrics) -> Self {
        let total_switches = inputs.volume.total_switches();
        let sites = f64::from(inputs.volume.num_locations);
        let switches = total_switches as f64;
        Self {
            total_switches,
            hours_saved_per_switch_per_year: per_unit(flows.annual_hours_saved, switches),
            hours_saved_per_site_per_year: per_unit(flows.annual_hours_saved, sites),
            benefit_per_switch_per_year: per_unit(flows.annual_total_benefit, switches),
            benefit_per_site_per_year: per_unit(flows.annual_total_benefit, sites),
            benefit_per_change: per_unit(flows.annual_total_benefit, flows.tasks_per_year),
            tasks_per_year: flows.tasks_per_year,
            manual_total_minutes: flows.manual_total_minutes,
            automated_total_minutes: flows.automated_total_minutes,
            minutes_saved_per_change: flows.minutes_saved_per_change,
            hours_saved_per_change: flows.hours_saved_per_change,
            effective_changes_per_year: flows.effective_changes_per_year,
            annual_hours_saved: flows.annual_hours_saved,
            annual_cost_savings: flows.annual_cost_savings,
            annual_additional_benefits: flows.annual_additional_benefits,
            annual_total_benefit: flows.annual_total_benefit,
            debt_charges: flows.debt_charges,
            annual_run_cost_effective: flows.annual_run_cost_effective,
            annual_net_benefit: flows.annual_net_benefit,
            project_cost_effective: flows.project_cost_effective,
            cash_flows: flows.cash_flows,
            npv: metrics.npv,
            irr: metrics.irr,
            payback: metrics.payback,
            cum_1: metrics.cum_1,
            cum_3: metrics.cum_3,
            cum_5: metrics.cum_5,
        }
    }

    /// 입력으로부터 출력을 계산한다. 숨은 상태 없는 순수 함수.
    ///
    /// 모든 값은 유한해야 저장 후 다시 읽을 수 있으므로 넘친 필드가 있으면 실패한다.
    pub fn compute(inputs: &ScenarioInputs, solver: &IrrSolver) -> Result<Self, FinanceError> {
        let flows = finance::build(inputs)?;
        let metrics = finance::compute_with(&flows.cash_flows, inputs.discount_rate, solver)?;
        let outputs = Self::assemble(inputs, flows, metrics);
        outputs.ensure_finite()?;
        Ok(outputs)
    }

    fn ensure_finite(&self) -> Result<(), FinanceError> {
        require_finite(|| "npv".into(), self.npv)?;
        for (field, metric) in self.metric_fields() {
            if let Metric::Defined(v) = metric {
                require_finite(|| field.to_string(), v)?;
            }
        }
        Ok(())
    }

    /// 태그된 지표 필드를 JSON 이름과 함께 돌려준다.
    pub fn metric_fields(&self) -> [(&'static str, Metric); 10] {
        [
            ("irr", self.irr),
            ("payback", self.payback),
            ("cum_1", self.cum_1),
            ("cum_3", self.cum_3),
            ("cum_5", self.cum_5),
            ("hours_saved_per_switch_per_year", self.hours_saved_per_switch_per_year),
            ("hours_saved_per_site_per_year", self.hours_saved_per_site_per_year),
            ("benefit_per_switch_per_year", self.benefit_per_switch_per_year),
            ("benefit_per_site_per_year", self.benefit_per_site_per_year),
            ("benefit_per_change", self.benefit_per_change),
        ]
    }
}

/// 입력과 출력을 묶은 저장/비교 단위.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    pub inputs: ScenarioInputs,
    pub outputs: ScenarioOutputs,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Scenario {
    /// 기본 IRR 설정으로 시나리오를 계산한다.
    pub fn compute(inputs: ScenarioInputs) -> Result<Self, FinanceError> {
        Self::compute_with(inputs, &IrrSolver::default())
    }

    pub fn compute_with(inputs: ScenarioInputs, solver: &IrrSolver) -> Result<Self, FinanceError> {
        let outputs = ScenarioOutputs::compute(&inputs, solver)?;
        Ok(Self {
            version: default_version(),
            saved_at: None,
            inputs,
            outputs,
        })
    }

    /// 저장된 입력으로 출력을 다시 계산한 사본을 만든다.
    pub fn recomputed(&self, solver: &IrrSolver) -> Result<Self, FinanceError> {
        let outputs = ScenarioOutputs::compute(&self.inputs, solver)?;
        Ok(Self {
            version: self.version.clone(),
            saved_at: self.saved_at,
            inputs: self.inputs.clone(),
            outputs,
        })
    }

    /// 파일명 등에 쓰는 도입 방식 표기(Buy/Build).
    pub fn strategy_slug(&self) -> &'static str {
        self.inputs.acquisition.strategy.slug()
    }
}

/// 여러 시나리오를 병렬로 계산한다. 각 항목은 독립적이며 공유 상태가 없다.
pub fn compute_many(
    inputs: Vec<ScenarioInputs>,
    solver: &IrrSolver,
) -> Vec<Result<Scenario, FinanceError>> {
    inputs
        .into_par_iter()
        .map(|i| Scenario::compute_with(i, solver))
        .collect()
}

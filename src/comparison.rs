//! 계산이 끝난 두 시나리오를 필드별로 비교한다. 재계산은 하지 않는다.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::finance::Metric;
use crate::scenario::{AcquisitionStrategy, Scenario};

/// 비교 대상 필드. 순서가 곧 표의 행 순서다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparedField {
    ProjectCost,
    AnnualRunCost,
    AnnualTotalBenefit,
    AnnualNetBenefit,
    Npv,
    Irr,
    Payback,
}

impl ComparedField {
    pub const ALL: [ComparedField; 7] = [
        ComparedField::ProjectCost,
        ComparedField::AnnualRunCost,
        ComparedField::AnnualTotalBenefit,
        ComparedField::AnnualNetBenefit,
        ComparedField::Npv,
        ComparedField::Irr,
        ComparedField::Payback,
    ];

    /// 시나리오에 저장된 값을 꺼낸다.
    pub fn value_of(&self, scenario: &Scenario) -> Metric {
        let o = &scenario.outputs;
        match self {
            ComparedField::ProjectCost => Metric::Defined(o.project_cost_effective),
            ComparedField::AnnualRunCost => Metric::Defined(o.annual_run_cost_effective),
            ComparedField::AnnualTotalBenefit => Metric::Defined(o.annual_total_benefit),
            ComparedField::AnnualNetBenefit => Metric::Defined(o.annual_net_benefit),
            ComparedField::Npv => Metric::Defined(o.npv),
            ComparedField::Irr => o.irr,
            ComparedField::Payback => o.payback,
        }
    }

    /// 금액 필드 여부(표시 형식 선택용).
    pub fn is_currency(&self) -> bool {
        !matches!(self, ComparedField::Irr | ComparedField::Payback)
    }
}

/// 비교 표의 한 행. `delta = value_b − value_a`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub field: ComparedField,
    pub value_a: Metric,
    pub value_b: Metric,
    pub delta: Metric,
}

/// 두 시나리오의 비교 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub label_a: String,
    pub label_b: String,
    pub strategy_a: AcquisitionStrategy,
    pub strategy_b: AcquisitionStrategy,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn row(&self, field: ComparedField) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.field == field)
    }
}

/// 기본 라벨("A", "B")로 비교한다.
pub fn compare(a: &Scenario, b: &Scenario) -> ComparisonTable {
    compare_labeled(a, b, "A", "B")
}

/// 라벨(예: buy/build)을 붙여 비교한다.
pub fn compare_labeled(a: &Scenario, b: &Scenario, label_a: &str, label_b: &str) -> ComparisonTable {
    let rows = ComparedField::ALL
        .iter()
        .map(|field| {
            let value_a = field.value_of(a);
            let value_b = field.value_of(b);
            ComparisonRow {
                field: *field,
                value_a,
                value_b,
                delta: value_a.delta_to(&value_b),
            }
        })
        .collect();
    ComparisonTable {
        label_a: label_a.to_string(),
        label_b: label_b.to_string(),
        strategy_a: a.inputs.acquisition.strategy,
        strategy_b: b.inputs.acquisition.strategy,
        rows,
    }
}

/// 기준 시나리오 하나를 여러 후보와 병렬로 비교한다.
pub fn compare_against(
    baseline: (&str, &Scenario),
    candidates: &[(String, Scenario)],
) -> Vec<ComparisonTable> {
    let (base_label, base) = baseline;
    candidates
        .par_iter()
        .map(|(label, scenario)| compare_labeled(base, scenario, base_label, label))
        .collect()
}

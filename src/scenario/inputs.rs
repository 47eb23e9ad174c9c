//! 시나리오 입력 모델과 범위 검증.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::finance::FinanceError;

/// 변경 작업 1건을 구성하는 고정된 8단계 워크플로.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    /// 변경 요청 상세(의도, 대상 장비) 확보
    ObtainDetails,
    /// 명령 페이로드 작성
    DevelopPayload,
    /// 영향도 산정
    QuantifyImpact,
    /// 변경관리, 일정, 공지
    ChangeManagement,
    /// 현재 상태 분석/검증
    StateAnalysis,
    /// 변경 실행
    Execute,
    /// 테스트 및 QA
    TestQa,
    /// 문서화, 공지, 종료
    Document,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 8] = [
        WorkflowStep::ObtainDetails,
        WorkflowStep::DevelopPayload,
        WorkflowStep::QuantifyImpact,
        WorkflowStep::ChangeManagement,
        WorkflowStep::StateAnalysis,
        WorkflowStep::Execute,
        WorkflowStep::TestQa,
        WorkflowStep::Document,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            WorkflowStep::ObtainDetails => "obtain_details",
            WorkflowStep::DevelopPayload => "develop_payload",
            WorkflowStep::QuantifyImpact => "quantify_impact",
            WorkflowStep::ChangeManagement => "change_management",
            WorkflowStep::StateAnalysis => "state_analysis",
            WorkflowStep::Execute => "execute",
            WorkflowStep::TestQa => "test_qa",
            WorkflowStep::Document => "document",
        }
    }
}

/// 단계별 소요 시간 [분].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepMinutes {
    pub obtain_details: f64,
    pub develop_payload: f64,
    pub quantify_impact: f64,
    pub change_management: f64,
    pub state_analysis: f64,
    pub execute: f64,
    pub test_qa: f64,
    pub document: f64,
}

impl StepMinutes {
    /// 단계 순서대로 분 값을 받아 생성한다.
    pub fn from_array(values: [f64; 8]) -> Self {
        let [a, b, c, d, e, f, g, h] = values;
        Self {
            obtain_details: a,
            develop_payload: b,
            quantify_impact: c,
            change_management: d,
            state_analysis: e,
            execute: f,
            test_qa: g,
            document: h,
        }
    }

    pub fn get(&self, step: WorkflowStep) -> f64 {
        match step {
            WorkflowStep::ObtainDetails => self.obtain_details,
            WorkflowStep::DevelopPayload => self.develop_payload,
            WorkflowStep::QuantifyImpact => self.quantify_impact,
            WorkflowStep::ChangeManagement => self.change_management,
            WorkflowStep::StateAnalysis => self.state_analysis,
            WorkflowStep::Execute => self.execute,
            WorkflowStep::TestQa => self.test_qa,
            WorkflowStep::Document => self.document,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorkflowStep, f64)> + '_ {
        WorkflowStep::ALL.iter().map(move |s| (*s, self.get(*s)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, m)| m).sum()
    }
}

/// 수동/자동화 단계별 시간.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowMinutes {
    pub manual: StepMinutes,
    pub automated: StepMinutes,
}

/// 물량, 적용 범위 및 인건비 가정.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeInputs {
    /// 사이트당 스위치(네트워크 장비) 수
    pub switches_per_location: u32,
    /// 적용 대상 사이트 수
    pub num_locations: u32,
    /// 월간 변경 건수
    pub changes_per_month: f64,
    /// 자동화 적용 비율(0~1)
    pub automation_coverage: f64,
    /// 엔지니어 시간당 비용 [USD/h]
    pub hourly_rate: f64,
}

impl Default for VolumeInputs {
    fn default() -> Self {
        Self {
            switches_per_location: 10,
            num_locations: 250,
            changes_per_month: 5.0,
            automation_coverage: 0.8,
            hourly_rate: 75.0,
        }
    }
}

impl VolumeInputs {
    /// 적용 범위 전체 스위치 수.
    pub fn total_switches(&self) -> u64 {
        u64::from(self.switches_per_location) * u64::from(self.num_locations)
    }
}

/// 도입 방식. 계산에는 쓰지 않고 비교표와 파일명에만 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStrategy {
    /// 상용 도구 구매
    Buy,
    /// 자체 구축
    #[default]
    Build,
}

impl AcquisitionStrategy {
    pub fn slug(&self) -> &'static str {
        match self {
            AcquisitionStrategy::Buy => "Buy",
            AcquisitionStrategy::Build => "Build",
        }
    }
}

impl fmt::Display for AcquisitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.slug())
    }
}

/// 이름이 붙은 일회성 비용 항목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub name: String,
    pub amount: f64,
}

impl CostItem {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// 도입 비용 구조.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Acquisition {
    pub strategy: AcquisitionStrategy,
    /// 0년차 일회성 비용
    pub one_time_costs: Vec<CostItem>,
    /// 연간 운영비(라이선스/유지보수) [USD/년]
    pub annual_run_cost: f64,
}

impl Acquisition {
    pub fn one_time_total(&self) -> f64 {
        self.one_time_costs.iter().map(|c| c.amount).sum()
    }
}

/// 위험 부채 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    /// 기술 부채
    Technical,
    /// 고객 만족(CSAT) 부채
    Csat,
}

impl DebtKind {
    pub fn key(&self) -> &'static str {
        match self {
            DebtKind::Technical => "technical",
            DebtKind::Csat => "csat",
        }
    }
}

/// 일회성 개선(remediation) 조치.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Remediation {
    /// 0년차에 발생하는 개선 비용
    #[serde(default)]
    pub one_time_cost: f64,
    /// 개선 후 남는 연간 부채 비율(0~1). 0이면 완전 해소.
    pub residual_fraction: f64,
}

/// 부채 항목. 연간 비용은 자동화되지 않은 비율(1 − coverage)만큼 적용된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtParams {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// 영향 100% 기준 연간 비용 [USD/년]
    pub full_impact_annual: f64,
    /// 개선 조치(적용 시에만 존재)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
}

/// 추가 편익 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitCategory {
    RevenueAcceleration,
    CustomerSatisfaction,
    DeploymentSpeed,
    ComplianceAudit,
    SecurityRiskReduction,
    TimeToMarket,
    CompetitiveAdvantage,
    EmployeeRetention,
    ThirdPartySupport,
    Other,
}

impl BenefitCategory {
    pub const ALL: [BenefitCategory; 10] = [
        BenefitCategory::RevenueAcceleration,
        BenefitCategory::CustomerSatisfaction,
        BenefitCategory::DeploymentSpeed,
        BenefitCategory::ComplianceAudit,
        BenefitCategory::SecurityRiskReduction,
        BenefitCategory::TimeToMarket,
        BenefitCategory::CompetitiveAdvantage,
        BenefitCategory::EmployeeRetention,
        BenefitCategory::ThirdPartySupport,
        BenefitCategory::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BenefitCategory::RevenueAcceleration => "revenue_acceleration",
            BenefitCategory::CustomerSatisfaction => "customer_satisfaction",
            BenefitCategory::DeploymentSpeed => "deployment_speed",
            BenefitCategory::ComplianceAudit => "compliance_audit",
            BenefitCategory::SecurityRiskReduction => "security_risk_reduction",
            BenefitCategory::TimeToMarket => "time_to_market",
            BenefitCategory::CompetitiveAdvantage => "competitive_advantage",
            BenefitCategory::EmployeeRetention => "employee_retention",
            BenefitCategory::ThirdPartySupport => "third_party_support",
            BenefitCategory::Other => "other",
        }
    }

    /// 화면/보고서용 기본 이름.
    pub fn label(&self) -> &'static str {
        match self {
            BenefitCategory::RevenueAcceleration => "Revenue Acceleration",
            BenefitCategory::CustomerSatisfaction => "Customer Satisfaction / NPS",
            BenefitCategory::DeploymentSpeed => "Deployment Speed",
            BenefitCategory::ComplianceAudit => "Compliance / Audit Savings",
            BenefitCategory::SecurityRiskReduction => "Security Risk Reduction",
            BenefitCategory::TimeToMarket => "Time-to-Market",
            BenefitCategory::CompetitiveAdvantage => "Competitive Advantage",
            BenefitCategory::EmployeeRetention => "Employee Retention",
            BenefitCategory::ThirdPartySupport => "Reduced 3rd party support spend",
            BenefitCategory::Other => "Other",
        }
    }
}

/// 추가 편익 항목. `methodology`/`assumptions`는 계산에 쓰이지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitEntry {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub name: String,
    /// 연간 편익 [USD/년]
    pub annual_value: f64,
    #[serde(default)]
    pub methodology: String,
    #[serde(default)]
    pub assumptions: String,
}

fn enabled_by_default() -> bool {
    true
}

/// 분석 기간 상한 [년].
pub const MAX_YEARS: u32 = 100;

fn default_years() -> u32 {
    5
}

fn default_discount_rate() -> f64 {
    0.10
}

/// 시나리오 입력 전체. 한 번 만들어지면 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 분석 기간 [년], 1 ~ [`MAX_YEARS`]
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default)]
    pub volume: VolumeInputs,
    #[serde(default)]
    pub steps: WorkflowMinutes,
    #[serde(default)]
    pub acquisition: Acquisition,
    #[serde(default)]
    pub debts: BTreeMap<DebtKind, DebtParams>,
    #[serde(default)]
    pub benefits: BTreeMap<BenefitCategory, BenefitEntry>,
    /// 할인율(소수, 0.10 = 10%)
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            years: default_years(),
            volume: VolumeInputs::default(),
            steps: WorkflowMinutes::default(),
            acquisition: Acquisition::default(),
            debts: BTreeMap::new(),
            benefits: BTreeMap::new(),
            discount_rate: default_discount_rate(),
        }
    }
}

fn non_negative(field: impl FnOnce() -> String, value: f64) -> Result<(), FinanceError> {
    if !value.is_finite() {
        return Err(FinanceError::invalid_input(field(), "유한한 값이어야 합니다."));
    }
    if value < 0.0 {
        return Err(FinanceError::invalid_input(field(), "0 이상이어야 합니다."));
    }
    Ok(())
}

fn fraction(field: impl FnOnce() -> String, value: f64) -> Result<(), FinanceError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(FinanceError::invalid_input(
            field(),
            "0과 1 사이의 비율이어야 합니다.",
        ));
    }
    Ok(())
}

impl ScenarioInputs {
    /// 범위를 검증한다. 값을 보정하지 않고 첫 위반 필드를 오류로 돌려준다.
    pub fn validate(&self) -> Result<(), FinanceError> {
        if self.years < 1 {
            return Err(FinanceError::invalid_input("years", "1 이상이어야 합니다."));
        }
        if self.years > MAX_YEARS {
            return Err(FinanceError::invalid_input("years", "100년 이하여야 합니다."));
        }
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(FinanceError::InvalidDiscountRate {
                rate: self.discount_rate,
            });
        }

        let v = &self.volume;
        non_negative(|| "volume.changes_per_month".into(), v.changes_per_month)?;
        fraction(|| "volume.automation_coverage".into(), v.automation_coverage)?;
        non_negative(|| "volume.hourly_rate".into(), v.hourly_rate)?;

        for (side, minutes) in [("manual", &self.steps.manual), ("automated", &self.steps.automated)] {
            for (step, value) in minutes.iter() {
                non_negative(|| format!("steps.{side}.{}", step.key()), value)?;
            }
        }

        for (i, item) in self.acquisition.one_time_costs.iter().enumerate() {
            non_negative(|| format!("acquisition.one_time_costs[{i}].amount"), item.amount)?;
        }
        non_negative(
            || "acquisition.annual_run_cost".into(),
            self.acquisition.annual_run_cost,
        )?;

        for (kind, debt) in &self.debts {
            let k = kind.key();
            non_negative(
                || format!("debts.{k}.full_impact_annual"),
                debt.full_impact_annual,
            )?;
            if let Some(rem) = &debt.remediation {
                non_negative(
                    || format!("debts.{k}.remediation.one_time_cost"),
                    rem.one_time_cost,
                )?;
                fraction(
                    || format!("debts.{k}.remediation.residual_fraction"),
                    rem.residual_fraction,
                )?;
            }
        }

        for (category, benefit) in &self.benefits {
            non_negative(
                || format!("benefits.{}.annual_value", category.key()),
                benefit.annual_value,
            )?;
        }
        Ok(())
    }

    /// 활성화된 추가 편익 항목만 돌려준다.
    pub fn enabled_benefits(&self) -> impl Iterator<Item = (&BenefitCategory, &BenefitEntry)> {
        self.benefits.iter().filter(|(_, b)| b.enabled)
    }

    /// 활성화된 부채 항목만 돌려준다.
    pub fn enabled_debts(&self) -> impl Iterator<Item = (&DebtKind, &DebtParams)> {
        self.debts.iter().filter(|(_, d)| d.enabled)
    }
}

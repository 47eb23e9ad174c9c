use serde::{Deserialize, Serialize};

use crate::finance::{FinanceError, Metric, UndefinedReason};
use crate::scenario::StepMinutes;

/// 1년 기준 간이 시간 절감 계산 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSavingsInput {
    /// 월간 작업(interaction) 건수
    pub interactions_per_month: f64,
    /// 자동화 비율(0~1)
    pub automation_coverage: f64,
    /// 시간당 비용 [USD/h]
    pub hourly_rate: f64,
    /// 구현 공수(일회성) [h]
    pub implement_hours: f64,
    /// 연간 유지보수 공수 [h/년]
    pub maintain_hours_per_year: f64,
    pub manual: StepMinutes,
    pub automated: StepMinutes,
}

impl Default for TimeSavingsInput {
    fn default() -> Self {
        Self {
            interactions_per_month: 100.0,
            automation_coverage: 0.8,
            hourly_rate: 100.0,
            implement_hours: 40.0,
            maintain_hours_per_year: 2.0,
            manual: StepMinutes::from_array([10.0, 15.0, 10.0, 15.0, 15.0, 10.0, 15.0, 10.0]),
            automated: StepMinutes::from_array([5.0; 8]),
        }
    }
}

/// 간이 시간 절감 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSavingsResult {
    /// 건당 절감 시간 [분]. 음수는 0으로 본다.
    pub minutes_saved_per_interaction: f64,
    pub interactions_per_year: f64,
    pub automated_interactions_per_year: f64,
    pub annual_hours_saved: f64,
    pub annual_cost_savings: f64,
    /// (구현 + 1년 유지보수) 공수 비용 [USD]
    pub one_year_cost: f64,
    /// (절감액 − 비용) / 비용 × 100. 비용이 0이면 정의되지 않는다.
    pub quick_roi_pct: Metric,
}

/// 1년 기준 시간/비용 절감과 간이 ROI를 계산한다.
pub fn compute_time_savings(input: &TimeSavingsInput) -> Result<TimeSavingsResult, FinanceError> {
    for (field, value) in [
        ("interactions_per_month", input.interactions_per_month),
        ("hourly_rate", input.hourly_rate),
        ("implement_hours", input.implement_hours),
        ("maintain_hours_per_year", input.maintain_hours_per_year),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(FinanceError::invalid_input(field, "0 이상이어야 합니다."));
        }
    }
    if !(0.0..=1.0).contains(&input.automation_coverage) {
        return Err(FinanceError::invalid_input(
            "automation_coverage",
            "0과 1 사이의 비율이어야 합니다.",
        ));
    }

    let minutes_saved = (input.manual.total() - input.automated.total()).max(0.0);
    let interactions_per_year = input.interactions_per_month * 12.0;
    let automated_interactions_per_year = interactions_per_year * input.automation_coverage;
    let annual_hours_saved = minutes_saved / 60.0 * automated_interactions_per_year;
    let annual_cost_savings = annual_hours_saved * input.hourly_rate;
    let one_year_cost = (input.implement_hours + input.maintain_hours_per_year) * input.hourly_rate;
    let quick_roi_pct = if one_year_cost > 0.0 {
        Metric::Defined((annual_cost_savings - one_year_cost) / one_year_cost * 100.0)
    } else {
        Metric::Undefined(UndefinedReason::NotMeaningful)
    };

    Ok(TimeSavingsResult {
        minutes_saved_per_interaction: minutes_saved,
        interactions_per_year,
        automated_interactions_per_year,
        annual_hours_saved,
        annual_cost_savings,
        one_year_cost,
        quick_roi_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_inputs() {
        let r = compute_time_savings(&TimeSavingsInput::default()).unwrap();
        assert_eq!(r.minutes_saved_per_interaction, 60.0);
        assert_eq!(r.interactions_per_year, 1_200.0);
        assert!((r.annual_hours_saved - 960.0).abs() < 1e-9);
        assert!((r.annual_cost_savings - 96_000.0).abs() < 1e-6);
        assert_eq!(r.one_year_cost, 4_200.0);
        let roi = r.quick_roi_pct.value().unwrap();
        assert!((roi - (96_000.0 - 4_200.0) / 4_200.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn slower_automation_saves_nothing() {
        let input = TimeSavingsInput {
            automated: StepMinutes::from_array([30.0; 8]),
            ..TimeSavingsInput::default()
        };
        let r = compute_time_savings(&input).unwrap();
        assert_eq!(r.minutes_saved_per_interaction, 0.0);
        assert_eq!(r.annual_cost_savings, 0.0);
    }

    #[test]
    fn zero_cost_leaves_roi_undefined() {
        let input = TimeSavingsInput {
            implement_hours: 0.0,
            maintain_hours_per_year: 0.0,
            ..TimeSavingsInput::default()
        };
        let r = compute_time_savings(&input).unwrap();
        assert_eq!(r.quick_roi_pct, Metric::Undefined(UndefinedReason::NotMeaningful));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let input = TimeSavingsInput {
            hourly_rate: -1.0,
            ..TimeSavingsInput::default()
        };
        assert_eq!(
            compute_time_savings(&input).unwrap_err().field(),
            Some("hourly_rate")
        );
    }
}

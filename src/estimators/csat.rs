//! 고객 만족(CSAT) 부채 추정. 결과의 연간 비용은 CSAT 부채의 100% 기준 비용으로 쓸 수 있다.

use serde::{Deserialize, Serialize};

use crate::finance::{FinanceError, Metric, UndefinedReason};

/// 응답 감성 분포(행복/보통/불만).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentDist {
    pub happy: f64,
    pub neutral: f64,
    pub sad: f64,
}

/// 감성 분포 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentPreset {
    MostlyHappy,
    Ambivalent,
    MostlyUnhappy,
}

impl SentimentPreset {
    pub fn distribution(&self) -> SentimentDist {
        match self {
            SentimentPreset::MostlyHappy => SentimentDist {
                happy: 0.60,
                neutral: 0.30,
                sad: 0.10,
            },
            SentimentPreset::Ambivalent => SentimentDist {
                happy: 1.0 / 3.0,
                neutral: 1.0 / 3.0,
                sad: 1.0 / 3.0,
            },
            SentimentPreset::MostlyUnhappy => SentimentDist {
                happy: 0.10,
                neutral: 0.30,
                sad: 0.60,
            },
        }
    }
}

/// 응답 건수 분포.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SentimentCounts {
    pub happy: u64,
    pub neutral: u64,
    pub sad: u64,
}

impl SentimentCounts {
    pub fn total(&self) -> u64 {
        self.happy + self.neutral + self.sad
    }
}

/// 총 응답 수를 프리셋 비율로 나눈다. 행복/보통은 반올림하고 나머지를 불만에 배정해
/// 합계가 정확히 유지되며 음수가 되지 않는다.
pub fn apply_distribution(expected_total: u64, preset: SentimentPreset) -> SentimentCounts {
    if expected_total == 0 {
        return SentimentCounts::default();
    }
    let dist = preset.distribution();
    let total = expected_total as f64;
    let happy = ((total * dist.happy).round() as u64).min(expected_total);
    let neutral = ((total * dist.neutral).round() as u64).min(expected_total - happy);
    SentimentCounts {
        happy,
        neutral,
        sad: expected_total - happy - neutral,
    }
}

/// 연간 응답 수 = 월 변경 × 12 × 변경당 응답 × 응답률(%, 0~100으로 제한).
pub fn responses_per_year(
    changes_per_month: f64,
    responses_per_change: f64,
    response_rate_pct: f64,
) -> f64 {
    let rate = response_rate_pct.clamp(0.0, 100.0) / 100.0;
    changes_per_month * 12.0 * responses_per_change * rate
}

/// 고객 노력 점수(CES) = (행복 − 불만) / 전체.
pub fn ces(counts: &SentimentCounts) -> Metric {
    let total = counts.total();
    if total == 0 {
        return Metric::Undefined(UndefinedReason::NotMeaningful);
    }
    Metric::Defined((counts.happy as f64 - counts.sad as f64) / total as f64)
}

/// 감성별 응답 1건당 비용.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentWeights {
    pub happy: f64,
    pub neutral: f64,
    pub sad: f64,
}

pub fn total_cost(counts: &SentimentCounts, weights: &SentimentWeights) -> f64 {
    counts.happy as f64 * weights.happy
        + counts.neutral as f64 * weights.neutral
        + counts.sad as f64 * weights.sad
}

pub fn avg_cost_per_response(total_cost: f64, total_responses: u64) -> Metric {
    if total_responses == 0 {
        return Metric::Undefined(UndefinedReason::NotMeaningful);
    }
    Metric::Defined(total_cost / total_responses as f64)
}

/// 연간 CSAT 비용 = 응답당 평균 비용 × 연간 응답 수. 평균이 없으면 0.
pub fn annual_csat_cost(avg_cost_per_response: Metric, responses_per_year: f64) -> f64 {
    avg_cost_per_response.value().unwrap_or(0.0) * responses_per_year
}

/// 작업 시간(분)을 비용으로 환산한다.
pub fn minutes_to_cost(minutes: f64, hourly_rate: f64) -> f64 {
    minutes / 60.0 * hourly_rate
}

/// CSAT 부채 추정 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CsatDebtInput {
    pub changes_per_month: f64,
    pub responses_per_change: f64,
    pub response_rate_pct: f64,
    /// 샘플 응답 수(분포 산정용)
    pub sample_responses: u64,
    pub preset: SentimentPreset,
    pub weights: SentimentWeights,
}

/// CSAT 부채 추정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CsatDebtEstimate {
    pub counts: SentimentCounts,
    pub ces: Metric,
    pub avg_cost_per_response: Metric,
    pub responses_per_year: f64,
    /// 영향 100% 기준 연간 CSAT 비용
    pub annual_cost: f64,
}

impl CsatDebtInput {
    /// 건수와 가중치는 0 이상의 유한한 값이어야 한다. 응답률은 계산 시 0~100으로 제한한다.
    pub fn validate(&self) -> Result<(), FinanceError> {
        for (field, value) in [
            ("changes_per_month", self.changes_per_month),
            ("responses_per_change", self.responses_per_change),
            ("weights.happy", self.weights.happy),
            ("weights.neutral", self.weights.neutral),
            ("weights.sad", self.weights.sad),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FinanceError::invalid_input(field, "0 이상이어야 합니다."));
            }
        }
        if !self.response_rate_pct.is_finite() {
            return Err(FinanceError::invalid_input(
                "response_rate_pct",
                "유한한 값이어야 합니다.",
            ));
        }
        Ok(())
    }
}

/// 입력을 검증한 뒤 연간 CSAT 부채를 추정한다.
pub fn estimate_csat_debt(input: &CsatDebtInput) -> Result<CsatDebtEstimate, FinanceError> {
    input.validate()?;
    let counts = apply_distribution(input.sample_responses, input.preset);
    let total = total_cost(&counts, &input.weights);
    let avg = avg_cost_per_response(total, counts.total());
    let per_year = responses_per_year(
        input.changes_per_month,
        input.responses_per_change,
        input.response_rate_pct,
    );
    let annual_cost = annual_csat_cost(avg, per_year);
    if !annual_cost.is_finite() {
        return Err(FinanceError::invalid_input(
            "annual_cost",
            "계산 결과가 유한하지 않습니다(입력값이 너무 큽니다).",
        ));
    }
    Ok(CsatDebtEstimate {
        counts,
        ces: ces(&counts),
        avg_cost_per_response: avg,
        responses_per_year: per_year,
        annual_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_keeps_total_exact() {
        for total in [1, 2, 3, 7, 10, 101] {
            for preset in [
                SentimentPreset::MostlyHappy,
                SentimentPreset::Ambivalent,
                SentimentPreset::MostlyUnhappy,
            ] {
                assert_eq!(apply_distribution(total, preset).total(), total);
            }
        }
    }

    #[test]
    fn mostly_happy_ten() {
        let c = apply_distribution(10, SentimentPreset::MostlyHappy);
        assert_eq!((c.happy, c.neutral, c.sad), (6, 3, 1));
        assert_eq!(ces(&c), Metric::Defined(0.5));
    }

    #[test]
    fn response_rate_is_clamped() {
        assert_eq!(responses_per_year(10.0, 1.0, 150.0), 120.0);
        assert_eq!(responses_per_year(10.0, 1.0, -5.0), 0.0);
    }

    fn sample_input() -> CsatDebtInput {
        CsatDebtInput {
            changes_per_month: 10.0,
            responses_per_change: 1.0,
            response_rate_pct: 50.0,
            sample_responses: 10,
            preset: SentimentPreset::MostlyHappy,
            weights: SentimentWeights {
                happy: 0.0,
                neutral: 10.0,
                sad: 50.0,
            },
        }
    }

    #[test]
    fn estimate_scales_average_by_yearly_responses() {
        let est = estimate_csat_debt(&sample_input()).unwrap();
        // (3 × 10 + 1 × 50) / 10 = 8, 연 60건
        assert_eq!(est.avg_cost_per_response, Metric::Defined(8.0));
        assert_eq!(est.responses_per_year, 60.0);
        assert_eq!(est.annual_cost, 480.0);
    }

    #[test]
    fn negative_weight_or_volume_is_rejected() {
        let mut input = sample_input();
        input.weights.sad = -50.0;
        assert_eq!(
            estimate_csat_debt(&input).unwrap_err().field(),
            Some("weights.sad")
        );

        let mut input = sample_input();
        input.changes_per_month = -1.0;
        assert_eq!(
            estimate_csat_debt(&input).unwrap_err().field(),
            Some("changes_per_month")
        );
    }

    #[test]
    fn no_responses_means_no_average() {
        assert!(!avg_cost_per_response(100.0, 0).is_defined());
        assert_eq!(
            annual_csat_cost(Metric::Undefined(UndefinedReason::NotMeaningful), 50.0),
            0.0
        );
    }
}

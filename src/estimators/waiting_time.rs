use crate::finance::FinanceError;
use crate::scenario::{BenefitCategory, BenefitEntry};

/// 대기 시간 단축 편익 산정 입력(매출 가속/배포 속도 항목용).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitingTimeInput {
    /// 수동 처리 소요 [일]
    pub manual_days: f64,
    /// 자동화 처리 소요 [일]
    pub automated_days: f64,
    /// 연간 영향 사이트/프로젝트 수
    pub sites_per_year: f64,
    /// 사이트 1곳이 하루 일찍 가동될 때의 가치 [USD/일]
    pub value_per_site_day: f64,
}

impl Default for WaitingTimeInput {
    fn default() -> Self {
        Self {
            manual_days: 5.0,
            automated_days: 1.0,
            sites_per_year: 12.0,
            value_per_site_day: 1000.0,
        }
    }
}

impl WaitingTimeInput {
    /// 일수, 사이트 수, 일당 가치는 0 이상의 유한한 값이어야 한다.
    pub fn validate(&self) -> Result<(), FinanceError> {
        for (field, value) in [
            ("manual_days", self.manual_days),
            ("automated_days", self.automated_days),
            ("sites_per_year", self.sites_per_year),
            ("value_per_site_day", self.value_per_site_day),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FinanceError::invalid_input(field, "0 이상이어야 합니다."));
            }
        }
        if !self.suggested_annual_value().is_finite() {
            return Err(FinanceError::invalid_input(
                "value_per_site_day",
                "계산 결과가 유한하지 않습니다(입력값이 너무 큽니다).",
            ));
        }
        Ok(())
    }

    pub fn days_saved_per_site(&self) -> f64 {
        (self.manual_days - self.automated_days).max(0.0)
    }

    /// 권장 연간 편익 = 절감 일수 × 일당 가치 × 연간 사이트 수
    pub fn suggested_annual_value(&self) -> f64 {
        self.days_saved_per_site() * self.value_per_site_day * self.sites_per_year
    }

    /// 가정 설명 문장.
    pub fn assumptions(&self) -> String {
        format!(
            "Manual duration {:.1} days, automated duration {:.1} days, {:.1} days saved per site; \
             {:.0} sites/year; business value ≈ ${:.0} per site per day.",
            self.manual_days,
            self.automated_days,
            self.days_saved_per_site(),
            self.sites_per_year,
            self.value_per_site_day
        )
    }

    /// 권장값으로 채운 편익 항목을 만든다.
    pub fn to_benefit(&self, category: BenefitCategory) -> Result<BenefitEntry, FinanceError> {
        self.validate()?;
        Ok(BenefitEntry {
            enabled: true,
            name: category.label().to_string(),
            annual_value: self.suggested_annual_value(),
            methodology: format!(
                "{:.1} days saved × ${:.0}/day × {:.0} sites/year",
                self.days_saved_per_site(),
                self.value_per_site_day,
                self.sites_per_year
            ),
            assumptions: self.assumptions(),
        })
    }
}

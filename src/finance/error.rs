use thiserror::Error;

/// 재무 계산 중 발생 가능한 오류를 표현한다.
///
/// 지표가 정의되지 않는 경우(IRR 없음, 회수 미도달 등)는 오류가 아니라
/// [`Metric::Undefined`](super::Metric::Undefined)로 표현한다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FinanceError {
    /// 입력값이 허용 범위를 벗어남. `field`는 점(.)으로 구분된 필드 경로.
    #[error("입력 오류: `{field}` {reason}")]
    InvalidInput { field: String, reason: &'static str },
    /// 할인율이 -100% 이하이거나 유한하지 않음
    #[error("할인율 오류: {rate} (할인율은 -100%보다 커야 합니다)")]
    InvalidDiscountRate { rate: f64 },
}

impl FinanceError {
    pub fn invalid_input(field: impl Into<String>, reason: &'static str) -> Self {
        FinanceError::InvalidInput {
            field: field.into(),
            reason,
        }
    }

    /// `InvalidInput`일 때 문제 필드 경로를 돌려준다.
    pub fn field(&self) -> Option<&str> {
        match self {
            FinanceError::InvalidInput { field, .. } => Some(field),
            FinanceError::InvalidDiscountRate { .. } => None,
        }
    }
}

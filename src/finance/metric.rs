use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 지표가 정의되지 않는 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// IRR: 부호 변화가 없거나 탐색이 수렴하지 않음. 단위당 값: 분모가 0
    NotMeaningful,
    /// 회수기간: 분석 기간 내 누적 현금흐름이 0 이상이 되지 않음
    NotReached,
    /// 누적 체크포인트: 분석 기간보다 뒤의 연도
    BeyondHorizon,
    /// 비교 차이: 한쪽 값이 정의되지 않아 계산하지 않음
    Incomparable,
}

impl UndefinedReason {
    pub fn label(&self) -> &'static str {
        match self {
            UndefinedReason::NotMeaningful => "not meaningful",
            UndefinedReason::NotReached => "not reached",
            UndefinedReason::BeyondHorizon => "beyond horizon",
            UndefinedReason::Incomparable => "n/a",
        }
    }
}

/// 정의 여부가 태그된 수치 지표.
///
/// 0과 "정의되지 않음"을 구분하기 위해 `Option`이나 NaN 대신 사용한다.
/// JSON에서는 값 또는 `null`로 기록하며, 역직렬화 시 필드별 사유를 복원한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Defined(f64),
    Undefined(UndefinedReason),
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Defined(v) => Some(*v),
            Metric::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Metric::Defined(_))
    }

    pub fn reason(&self) -> Option<UndefinedReason> {
        match self {
            Metric::Defined(_) => None,
            Metric::Undefined(r) => Some(*r),
        }
    }

    /// `other - self`. 한쪽이라도 정의되지 않으면 `Incomparable`.
    pub fn delta_to(&self, other: &Metric) -> Metric {
        match (self, other) {
            (Metric::Defined(a), Metric::Defined(b)) => Metric::Defined(b - a),
            _ => Metric::Undefined(UndefinedReason::Incomparable),
        }
    }

    fn from_nullable(value: Option<f64>, reason: UndefinedReason) -> Self {
        match value {
            Some(v) => Metric::Defined(v),
            None => Metric::Undefined(reason),
        }
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Metric::Defined(value)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Metric::Undefined(r) => f.write_str(r.label()),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Defined(v) => serializer.serialize_f64(*v),
            Metric::Undefined(_) => serializer.serialize_none(),
        }
    }
}

fn nullable<'de, D: Deserializer<'de>>(
    deserializer: D,
    reason: UndefinedReason,
) -> Result<Metric, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(Metric::from_nullable(value, reason))
}

/// `irr` 필드: `null` → `NotMeaningful`
pub fn deserialize_irr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Metric, D::Error> {
    nullable(deserializer, UndefinedReason::NotMeaningful)
}

/// `payback` 필드: `null` → `NotReached`
pub fn deserialize_payback<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Metric, D::Error> {
    nullable(deserializer, UndefinedReason::NotReached)
}

/// `cum_k` 필드: `null` → `BeyondHorizon`
pub fn deserialize_checkpoint<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Metric, D::Error> {
    nullable(deserializer, UndefinedReason::BeyondHorizon)
}

/// 단위당 값 필드: `null` → `NotMeaningful`
pub fn deserialize_ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Metric, D::Error> {
    nullable(deserializer, UndefinedReason::NotMeaningful)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_requires_both_sides() {
        let a = Metric::Defined(1.5);
        let b = Metric::Defined(4.0);
        assert_eq!(a.delta_to(&b), Metric::Defined(2.5));
        let missing = Metric::Undefined(UndefinedReason::NotReached);
        assert_eq!(
            a.delta_to(&missing),
            Metric::Undefined(UndefinedReason::Incomparable)
        );
        assert_eq!(
            missing.delta_to(&a),
            Metric::Undefined(UndefinedReason::Incomparable)
        );
    }

    #[test]
    fn display_uses_precision_and_labels() {
        assert_eq!(format!("{:.2}", Metric::Defined(0.12345)), "0.12");
        assert_eq!(
            Metric::Undefined(UndefinedReason::NotMeaningful).to_string(),
            "not meaningful"
        );
    }
}

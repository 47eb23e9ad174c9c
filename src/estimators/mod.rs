//! 본 계산기를 보조하는 간이 추정기 모음.

pub mod csat;
pub mod time_savings;
pub mod waiting_time;

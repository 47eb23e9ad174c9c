//! 재무 계산 엔진: 현금흐름 생성과 투자 지표 계산.

pub mod cash_flow;
pub mod error;
pub mod metric;
pub mod metrics;

pub use cash_flow::{build, CashFlowBreakdown, DebtCharge};
pub use error::FinanceError;
pub use metric::{Metric, UndefinedReason};
pub use metrics::{
    compute, compute_with, cumulative_at, has_sign_change, irr, npv, payback_period, per_unit,
    solve_irr, IrrFailure, IrrSolver, Metrics,
};

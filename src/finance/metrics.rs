//! 현금흐름 시계열로부터 투자 지표(NPV, IRR, 회수기간, 누적 체크포인트)를 계산한다.

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::FinanceError;
use super::metric::{Metric, UndefinedReason};

/// 누적 현금 위치를 보고하는 연도.
pub const CHECKPOINT_YEARS: [usize; 3] = [1, 3, 5];

/// IRR 근 탐색 설정.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrSolver {
    /// 탐색 하한(소수). -1보다 커야 한다.
    pub lower_bound: f64,
    /// 탐색 상한(소수). 10.0 = 1000%
    pub upper_bound: f64,
    /// 브래킷 폭 허용오차(할인율 단위)
    pub rate_tolerance: f64,
    /// |NPV| 허용오차. 최대 |현금흐름|에 대한 비율이다.
    pub npv_tolerance: f64,
    /// 이분법 최대 반복 횟수
    pub max_iterations: u32,
    /// 브래킷이 없을 때 상한을 두 배로 늘리는 최대 횟수
    pub max_expansions: u32,
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self {
            lower_bound: -0.99,
            upper_bound: 10.0,
            rate_tolerance: 1e-9,
            npv_tolerance: 1e-12,
            max_iterations: 200,
            max_expansions: 8,
        }
    }
}

/// IRR을 구하지 못한 구체적 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrrFailure {
    /// 0이 아닌 현금흐름 사이에 부호 변화가 없음
    NoSignChange,
    /// 탐색 구간 안에서 NPV 부호가 바뀌는 구간을 찾지 못함
    NoBracket,
    /// 반복 한도 내 수렴 실패
    NotConverged,
}

/// 할인율별 투자 지표 묶음.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub npv: f64,
    pub irr: Metric,
    pub payback: Metric,
    pub cum_1: Metric,
    pub cum_3: Metric,
    pub cum_5: Metric,
}

fn check_rate(rate: f64) -> Result<(), FinanceError> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(FinanceError::InvalidDiscountRate { rate });
    }
    Ok(())
}

/// 할인율 검증 없이 NPV를 계산한다. `t = 0`의 할인 계수는 정확히 1이다.
fn npv_unchecked(rate: f64, cash_flows: &[f64]) -> f64 {
    let base = 1.0 + rate;
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / base.powi(t as i32))
        .sum()
}

/// 순현재가치(NPV). `cash_flows[0]`은 현재(0년차) 금액이다.
pub fn npv(rate: f64, cash_flows: &[f64]) -> Result<f64, FinanceError> {
    check_rate(rate)?;
    Ok(npv_unchecked(rate, cash_flows))
}

/// 0이 아닌 현금흐름 사이에 부호가 한 번이라도 바뀌는지 확인한다.
pub fn has_sign_change(cash_flows: &[f64]) -> bool {
    let mut signs = cash_flows
        .iter()
        .filter(|cf| **cf != 0.0)
        .map(|cf| cf.is_sign_positive());
    match signs.next() {
        Some(first) => signs.any(|s| s != first),
        None => false,
    }
}

impl IrrSolver {
    /// NPV(r) = 0 인 r을 찾는다.
    ///
    /// 부호 변화 확인 → 브래킷 탐색(양 끝, 균등 스캔, 상한 확장) → 이분법 순서로 진행한다.
    pub fn solve(&self, cash_flows: &[f64]) -> Result<f64, IrrFailure> {
        if !has_sign_change(cash_flows) {
            return Err(IrrFailure::NoSignChange);
        }
        let (mut low, mut high) = self.bracket(cash_flows).ok_or(IrrFailure::NoBracket)?;
        let mut npv_low = npv_unchecked(low, cash_flows);
        let scale = cash_flows.iter().fold(0.0_f64, |m, cf| m.max(cf.abs()));
        let npv_tolerance = self.npv_tolerance * scale;

        for _ in 0..self.max_iterations {
            let mid = (low + high) / 2.0;
            let npv_mid = npv_unchecked(mid, cash_flows);
            if npv_mid.abs() < npv_tolerance || (high - low) / 2.0 < self.rate_tolerance {
                return Ok(mid);
            }
            if npv_low.signum() != npv_mid.signum() {
                high = mid;
            } else {
                low = mid;
                npv_low = npv_mid;
            }
        }
        Err(IrrFailure::NotConverged)
    }

    fn bracket(&self, cash_flows: &[f64]) -> Option<(f64, f64)> {
        const SCAN_STEPS: usize = 64;

        let lower = self.lower_bound.max(-1.0 + f64::EPSILON);
        let upper = self.upper_bound;
        let npv_lower = npv_unchecked(lower, cash_flows);
        if npv_lower == 0.0 {
            return Some((lower, lower));
        }

        // 구간 안에 근이 여러 개일 수 있으므로 가장 낮은 쪽 부호 변화를 우선한다.
        // 하한 근처에서는 할인 계수가 언더플로할 수 있어 유한한 값만 비교한다.
        let step = (upper - lower) / SCAN_STEPS as f64;
        let mut prev = npv_lower.is_finite().then_some((lower, npv_lower));
        for i in 1..=SCAN_STEPS {
            let rate = lower + step * i as f64;
            let value = npv_unchecked(rate, cash_flows);
            if !value.is_finite() {
                continue;
            }
            if value == 0.0 {
                return Some((rate, rate));
            }
            if let Some((prev_rate, prev_npv)) = prev {
                if prev_npv.signum() != value.signum() {
                    return Some((prev_rate, rate));
                }
            }
            prev = Some((rate, value));
        }

        let (_, mut prev_npv) = prev?;
        let mut high = upper;
        for _ in 0..self.max_expansions {
            let next = high * 2.0;
            let value = npv_unchecked(next, cash_flows);
            if value == 0.0 || value.signum() != prev_npv.signum() {
                return Some((high, next));
            }
            high = next;
            prev_npv = value;
        }
        None
    }
}

/// IRR 탐색 결과를 상세 사유와 함께 돌려준다.
pub fn solve_irr(cash_flows: &[f64], solver: &IrrSolver) -> Result<f64, IrrFailure> {
    solver.solve(cash_flows)
}

/// 내부수익률(IRR). 구할 수 없으면 `NotMeaningful`.
pub fn irr(cash_flows: &[f64], solver: &IrrSolver) -> Metric {
    match solver.solve(cash_flows) {
        Ok(rate) => Metric::Defined(rate),
        Err(failure) => {
            debug!("IRR 미정의: {failure:?} (cash_flows={cash_flows:?})");
            Metric::Undefined(UndefinedReason::NotMeaningful)
        }
    }
}

/// 단순(비할인) 회수기간 [년]. 누적이 0을 넘는 연도 안에서 선형 보간한다.
pub fn payback_period(cash_flows: &[f64]) -> Metric {
    let mut cumulative = 0.0;
    for (t, cf) in cash_flows.iter().enumerate() {
        let prev_cumulative = cumulative;
        cumulative += cf;
        if cumulative >= 0.0 {
            if t == 0 {
                return Metric::Defined(0.0);
            }
            if *cf == 0.0 {
                return Metric::Defined(t as f64);
            }
            let fraction = -prev_cumulative / cf;
            return Metric::Defined((t - 1) as f64 + fraction);
        }
    }
    Metric::Undefined(UndefinedReason::NotReached)
}

/// `year`년차까지의 누적 현금 위치. 분석 기간을 넘으면 `BeyondHorizon`.
pub fn cumulative_at(cash_flows: &[f64], year: usize) -> Metric {
    if year >= cash_flows.len() {
        return Metric::Undefined(UndefinedReason::BeyondHorizon);
    }
    Metric::Defined(cash_flows[..=year].iter().sum())
}

/// 단위당 값. 분모가 0이면 `NotMeaningful`.
pub fn per_unit(numerator: f64, denominator: f64) -> Metric {
    if denominator > 0.0 {
        Metric::Defined(numerator / denominator)
    } else {
        Metric::Undefined(UndefinedReason::NotMeaningful)
    }
}

/// 기본 IRR 설정으로 지표를 계산한다.
pub fn compute(cash_flows: &[f64], discount_rate: f64) -> Result<Metrics, FinanceError> {
    compute_with(cash_flows, discount_rate, &IrrSolver::default())
}

/// 주어진 IRR 설정으로 지표를 계산한다.
pub fn compute_with(
    cash_flows: &[f64],
    discount_rate: f64,
    solver: &IrrSolver,
) -> Result<Metrics, FinanceError> {
    let npv = npv(discount_rate, cash_flows)?;
    let [y1, y3, y5] = CHECKPOINT_YEARS;
    Ok(Metrics {
        npv,
        irr: irr(cash_flows, solver),
        payback: payback_period(cash_flows),
        cum_1: cumulative_at(cash_flows, y1),
        cum_3: cumulative_at(cash_flows, y3),
        cum_5: cumulative_at(cash_flows, y5),
    })
}

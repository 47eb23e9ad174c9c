//! 시나리오 저장/로드. 로드 시 출력을 다시 계산할지 저장값을 믿을지 선택한다.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::inputs::ScenarioInputs;
use super::outputs::{Scenario, ScenarioOutputs};
use crate::finance::{FinanceError, IrrSolver, Metric};

/// 교차 검증 시 허용하는 상대 오차.
const CROSS_CHECK_REL_TOL: f64 = 1e-9;

/// 저장/로드 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("파일 입출력 오류 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON 오류: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML 파싱 오류: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("지원하지 않는 입력 형식: {0} (.toml 또는 .json)")]
    UnsupportedFormat(PathBuf),
    #[error(transparent)]
    Finance(#[from] FinanceError),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// 저장된 시나리오를 읽을 때의 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// 저장된 입력으로 출력을 다시 계산하고 저장된 출력과 대조한다.
    #[default]
    Recompute,
    /// 저장된 출력을 그대로 사용한다.
    Trust,
}

/// 저장된 출력과 재계산 출력이 다른 필드. `cash_flows`는 `cash_flows[t]`처럼 원소별로 표기한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub field: String,
    pub stored: Metric,
    pub recomputed: Metric,
}

/// 로드 결과. `discrepancies`는 `Recompute` 정책에서만 채워진다.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub scenario: Scenario,
    pub discrepancies: Vec<Discrepancy>,
}

fn same(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= CROSS_CHECK_REL_TOL * a.abs().max(b.abs()).max(1.0)
}

fn same_metric(a: &Metric, b: &Metric) -> bool {
    match (a, b) {
        (Metric::Defined(x), Metric::Defined(y)) => same(*x, *y),
        (Metric::Undefined(x), Metric::Undefined(y)) => x == y,
        _ => false,
    }
}

/// 저장된 출력과 다시 계산한 출력을 필드별로 대조한다.
pub fn cross_check(stored: &ScenarioOutputs, recomputed: &ScenarioOutputs) -> Vec<Discrepancy> {
    let scalars: [(&'static str, f64, f64); 15] = [
        ("tasks_per_year", stored.tasks_per_year, recomputed.tasks_per_year),
        ("manual_total_minutes", stored.manual_total_minutes, recomputed.manual_total_minutes),
        ("automated_total_minutes", stored.automated_total_minutes, recomputed.automated_total_minutes),
        ("minutes_saved_per_change", stored.minutes_saved_per_change, recomputed.minutes_saved_per_change),
        ("hours_saved_per_change", stored.hours_saved_per_change, recomputed.hours_saved_per_change),
        ("effective_changes_per_year", stored.effective_changes_per_year, recomputed.effective_changes_per_year),
        ("annual_hours_saved", stored.annual_hours_saved, recomputed.annual_hours_saved),
        ("annual_cost_savings", stored.annual_cost_savings, recomputed.annual_cost_savings),
        ("annual_additional_benefits", stored.annual_additional_benefits, recomputed.annual_additional_benefits),
        ("annual_total_benefit", stored.annual_total_benefit, recomputed.annual_total_benefit),
        ("annual_run_cost_effective", stored.annual_run_cost_effective, recomputed.annual_run_cost_effective),
        ("annual_net_benefit", stored.annual_net_benefit, recomputed.annual_net_benefit),
        ("project_cost_effective", stored.project_cost_effective, recomputed.project_cost_effective),
        ("npv", stored.npv, recomputed.npv),
        ("total_switches", stored.total_switches as f64, recomputed.total_switches as f64),
    ];

    let mut out: Vec<Discrepancy> = scalars
        .into_iter()
        .filter(|(_, a, b)| !same(*a, *b))
        .map(|(field, a, b)| Discrepancy {
            field: field.to_string(),
            stored: Metric::Defined(a),
            recomputed: Metric::Defined(b),
        })
        .collect();

    let (a, b) = (&stored.cash_flows, &recomputed.cash_flows);
    if a.len() != b.len() {
        out.push(Discrepancy {
            field: "cash_flows.len".to_string(),
            stored: Metric::Defined(a.len() as f64),
            recomputed: Metric::Defined(b.len() as f64),
        });
    }
    out.extend(
        a.iter()
            .zip(b)
            .enumerate()
            .filter(|(_, (x, y))| !same(**x, **y))
            .map(|(t, (x, y))| Discrepancy {
                field: format!("cash_flows[{t}]"),
                stored: Metric::Defined(*x),
                recomputed: Metric::Defined(*y),
            }),
    );

    out.extend(
        stored
            .metric_fields()
            .into_iter()
            .zip(recomputed.metric_fields())
            .filter(|((_, a), (_, b))| !same_metric(a, b))
            .map(|((field, stored), (_, recomputed))| Discrepancy {
                field: field.to_string(),
                stored,
                recomputed,
            }),
    );
    out
}

/// 시나리오를 보기 좋은 JSON 문자열로 직렬화한다.
pub fn to_json(scenario: &Scenario) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(scenario)?)
}

/// JSON 문자열에서 시나리오를 읽는다. 출력은 저장된 그대로다.
pub fn from_json(src: &str) -> Result<Scenario, StoreError> {
    Ok(serde_json::from_str(src)?)
}

/// 확장자(.toml/.json)에 따라 문서를 읽는다.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(toml::from_str(&content)?),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(serde_json::from_str(&content)?),
        _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// 시나리오 입력 문서를 읽는다. 범위 검증은 계산 시점에 한다.
pub fn read_inputs(path: &Path) -> Result<ScenarioInputs, StoreError> {
    read_document(path)
}

/// 저장 파일 이름: `BusinessCaseScenario_<slug>_<YYYYmmdd_HHMMSS>.json`
pub fn scenario_file_name(slug: &str, at: DateTime<Utc>) -> String {
    format!(
        "BusinessCaseScenario_{slug}_{}.json",
        at.format("%Y%m%d_%H%M%S")
    )
}

/// 시나리오를 `dir`에 타임스탬프 파일로 저장하고 경로를 돌려준다.
///
/// `slug`가 없으면 도입 방식(Buy/Build)을 사용한다.
pub fn save(scenario: &Scenario, dir: &Path, slug: Option<&str>) -> Result<PathBuf, StoreError> {
    let now = Utc::now();
    let mut stamped = scenario.clone();
    stamped.saved_at = Some(now);
    let slug = slug.unwrap_or_else(|| scenario.strategy_slug());
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    let path = dir.join(scenario_file_name(slug, now));
    fs::write(&path, to_json(&stamped)?).map_err(|e| StoreError::io(&path, e))?;
    info!("시나리오 저장: {}", path.display());
    Ok(path)
}

/// 저장된 시나리오 파일을 정책에 따라 읽는다.
pub fn load(path: &Path, policy: LoadPolicy, solver: &IrrSolver) -> Result<LoadedScenario, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let stored = from_json(&content)?;
    match policy {
        LoadPolicy::Trust => Ok(LoadedScenario {
            scenario: stored,
            discrepancies: Vec::new(),
        }),
        LoadPolicy::Recompute => {
            let scenario = stored.recomputed(solver)?;
            let discrepancies = cross_check(&stored.outputs, &scenario.outputs);
            for d in &discrepancies {
                warn!(
                    "{}: 저장된 `{}` 값({})이 재계산 값({})과 다릅니다.",
                    path.display(),
                    d.field,
                    d.stored,
                    d.recomputed
                );
            }
            Ok(LoadedScenario {
                scenario,
                discrepancies,
            })
        }
    }
}

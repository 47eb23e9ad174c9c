use std::path::Path;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::estimators::waiting_time::WaitingTimeInput;
use crate::finance::FinanceError;
use crate::i18n::Translator;
use crate::scenario::StoreError;
use crate::ui_cli::{self, Command};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 시나리오 저장/로드 오류
    #[error("시나리오 파일 오류: {0}")]
    Store(#[from] StoreError),
    /// 입력 검증/계산 오류
    #[error("계산 오류: {0}")]
    Finance(#[from] FinanceError),
    /// 결과 직렬화 오류
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 파싱된 명령 하나를 실행한다.
pub fn run(
    command: &Command,
    config: &mut Config,
    config_path: &Path,
    tr: &Translator,
) -> Result<(), AppError> {
    match command {
        Command::Compute {
            inputs,
            save,
            slug,
            json,
        } => ui_cli::handle_compute(config, tr, inputs, save.clone(), slug.as_deref(), *json),
        Command::Compare {
            a,
            b,
            label_a,
            label_b,
            load,
            json,
        } => ui_cli::handle_compare(
            config,
            tr,
            a,
            b,
            (label_a.as_str(), label_b.as_str()),
            load.resolve(config),
            *json,
        ),
        Command::CompareAll {
            baseline,
            candidates,
            load,
            json,
        } => ui_cli::handle_compare_all(
            config,
            tr,
            baseline,
            candidates,
            load.resolve(config),
            *json,
        ),
        Command::TimeSavings { inputs, json } => {
            ui_cli::handle_time_savings(config, tr, inputs.as_deref(), *json)
        }
        Command::CsatDebt { inputs, json } => ui_cli::handle_csat_debt(config, tr, inputs, *json),
        Command::WaitingTime {
            manual_days,
            automated_days,
            sites_per_year,
            value_per_site_day,
            category,
            json,
        } => {
            let input = WaitingTimeInput {
                manual_days: *manual_days,
                automated_days: *automated_days,
                sites_per_year: *sites_per_year,
                value_per_site_day: *value_per_site_day,
            };
            ui_cli::handle_waiting_time(config, tr, &input, *category, *json)
        }
        Command::Config { action } => ui_cli::handle_settings(config, config_path, tr, action),
    }
}

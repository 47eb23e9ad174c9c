use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::finance::IrrSolver;
use crate::scenario::LoadPolicy;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 결과 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// 사람이 읽는 표
    #[default]
    Table,
    /// JSON
    Json,
}

/// 출력 관련 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// 금액 소수 자릿수
    pub currency_decimals: usize,
    /// 시나리오 저장 디렉터리
    pub save_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            currency_decimals: 2,
            save_dir: PathBuf::from("."),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(ko/en/auto)
    pub language: String,
    /// 저장된 시나리오 로드 정책
    pub load_policy: LoadPolicy,
    pub irr: IrrSolver,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            load_policy: LoadPolicy::Recompute,
            irr: IrrSolver::default(),
            output: OutputConfig::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 값 범위 오류
    #[error("설정 값 오류: {0}")]
    Invalid(&'static str),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        log::debug!("설정 로드: {}", path.display());
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        log::info!("기본 설정 생성: {}", path.display());
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }

    /// IRR 탐색 구간이 의미 있는지 확인한다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let irr = &self.irr;
        if !(irr.lower_bound > -1.0) || !(irr.upper_bound > irr.lower_bound) {
            return Err(ConfigError::Invalid(
                "irr.lower_bound는 -1보다 크고 irr.upper_bound보다 작아야 합니다.",
            ));
        }
        if irr.max_iterations == 0 {
            return Err(ConfigError::Invalid("irr.max_iterations는 1 이상이어야 합니다."));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("language = \"en\"\n").unwrap();
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.load_policy, LoadPolicy::Recompute);
        assert_eq!(cfg.irr, IrrSolver::default());
    }

    #[test]
    fn inverted_irr_bounds_are_rejected() {
        let mut cfg = Config::default();
        cfg.irr.upper_bound = -0.5;
        assert!(cfg.validate().is_err());
    }
}

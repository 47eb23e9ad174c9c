//! 자동화 비즈니스 케이스 계산 엔진. 계산 로직은 라이브러리에, 파일 기반 CLI는 얇은 껍데기로 둔다.

pub mod app;
pub mod comparison;
pub mod config;
pub mod estimators;
pub mod finance;
pub mod i18n;
pub mod scenario;
pub mod ui_cli;

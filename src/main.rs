use clap::Parser;

use automation_business_case::i18n::{self, keys, Translator};
use automation_business_case::ui_cli::Cli;
use automation_business_case::{app, config};

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
///
/// 언어는 한 번만 정하며 오류 메시지에도 같은 번역기를 쓴다.
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let loaded = config::load_or_default(&cli.config);
    let config_lang = loaded.as_ref().ok().map(|cfg| cfg.language.as_str());
    let tr = Translator::new(&i18n::resolve_language(&cli.lang, config_lang));
    log::debug!("언어: {}", tr.language_code());

    let result = loaded
        .map_err(app::AppError::from)
        .and_then(|mut cfg| app::run(&cli.command, &mut cfg, &cli.config, &tr));
    if let Err(err) = result {
        eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
        std::process::exit(1);
    }
}

/// `-v` 횟수에 따라 기본 로그 수준을 정한다. RUST_LOG가 있으면 그것이 우선한다.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

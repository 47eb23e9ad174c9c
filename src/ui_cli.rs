use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::app::AppError;
use crate::comparison::{self, ComparedField, ComparisonTable};
use crate::config::{Config, OutputFormat, DEFAULT_CONFIG_PATH};
use crate::estimators::csat::{estimate_csat_debt, CsatDebtInput};
use crate::estimators::time_savings::{compute_time_savings, TimeSavingsInput};
use crate::estimators::waiting_time::WaitingTimeInput;
use crate::finance::{Metric, UndefinedReason};
use crate::i18n::{keys, Translator};
use crate::scenario::{store, BenefitCategory, DebtKind, LoadPolicy, LoadedScenario, Scenario};

/// 명령행 인자.
#[derive(Debug, Parser)]
#[command(
    name = "business_case_cli",
    version,
    about = "자동화 비즈니스 케이스 계산기 (NPV / IRR / 회수기간)"
)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// 표시 언어(ko/en/auto). auto면 설정 파일, 시스템 로케일 순으로 결정한다.
    #[arg(long, global = true, value_name = "CODE", default_value = "auto")]
    pub lang: String,
    /// 로그 상세도(-v: info, -vv: debug). RUST_LOG가 있으면 그것을 따른다.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 입력 문서(.toml/.json)로 시나리오를 계산한다.
    Compute {
        inputs: PathBuf,
        /// 계산 결과를 저장할 디렉터리. 값을 생략하면 설정의 save_dir을 쓴다.
        #[arg(long, value_name = "DIR", num_args = 0..=1)]
        save: Option<Option<PathBuf>>,
        /// 저장 파일 이름의 구분자(기본: Buy/Build)
        #[arg(long, requires = "save")]
        slug: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// 저장된 두 시나리오를 비교한다.
    Compare {
        a: PathBuf,
        b: PathBuf,
        #[arg(long, default_value = "A")]
        label_a: String,
        #[arg(long, default_value = "B")]
        label_b: String,
        #[command(flatten)]
        load: LoadArgs,
        #[arg(long)]
        json: bool,
    },
    /// 기준 시나리오를 여러 후보와 비교한다.
    CompareAll {
        baseline: PathBuf,
        #[arg(required = true)]
        candidates: Vec<PathBuf>,
        #[command(flatten)]
        load: LoadArgs,
        #[arg(long)]
        json: bool,
    },
    /// 1년 기준 간이 시간 절감/ROI를 계산한다. 입력이 없으면 기본값을 쓴다.
    TimeSavings {
        inputs: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// 설문 응답 분포로 연간 CSAT 부채를 추정한다.
    CsatDebt {
        inputs: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// 대기 시간 단축에 따른 연간 편익을 제안한다.
    WaitingTime {
        #[arg(long, default_value_t = 5.0)]
        manual_days: f64,
        #[arg(long, default_value_t = 1.0)]
        automated_days: f64,
        #[arg(long, default_value_t = 12.0)]
        sites_per_year: f64,
        #[arg(long, default_value_t = 1000.0)]
        value_per_site_day: f64,
        /// 편익 항목 키(JSON 출력용)
        #[arg(long, default_value = "revenue_acceleration", value_parser = parse_benefit_category)]
        category: BenefitCategory,
        #[arg(long)]
        json: bool,
    },
    /// 설정을 조회하거나 변경한다.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    SetLanguage { code: String },
    SetLoadPolicy {
        #[arg(value_enum)]
        policy: PolicyArg,
    },
}

/// 저장된 시나리오를 읽을 때의 정책 선택.
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// 생략하면 설정의 load_policy를 따른다.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Recompute,
    Trust,
}

impl From<PolicyArg> for LoadPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Recompute => LoadPolicy::Recompute,
            PolicyArg::Trust => LoadPolicy::Trust,
        }
    }
}

impl LoadArgs {
    pub fn resolve(&self, cfg: &Config) -> LoadPolicy {
        self.policy.map(LoadPolicy::from).unwrap_or(cfg.load_policy)
    }
}

fn parse_benefit_category(s: &str) -> Result<BenefitCategory, String> {
    BenefitCategory::ALL
        .iter()
        .copied()
        .find(|c| c.key() == s)
        .ok_or_else(|| {
            let known: Vec<&str> = BenefitCategory::ALL.iter().map(|c| c.key()).collect();
            format!("알 수 없는 편익 항목: {s} (가능: {})", known.join(", "))
        })
}

fn wants_json(cfg: &Config, flag: bool) -> bool {
    flag || cfg.output.format == OutputFormat::Json
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn reason_key(reason: UndefinedReason) -> &'static str {
    match reason {
        UndefinedReason::NotMeaningful => keys::UNDEFINED_NOT_MEANINGFUL,
        UndefinedReason::NotReached => keys::UNDEFINED_NOT_REACHED,
        UndefinedReason::BeyondHorizon => keys::UNDEFINED_BEYOND_HORIZON,
        UndefinedReason::Incomparable => keys::UNDEFINED_INCOMPARABLE,
    }
}

/// 정의된 값은 소수 자릿수에 맞춰, 정의되지 않은 값은 사유 문구로 표시한다.
fn metric_text(tr: &Translator, metric: &Metric, decimals: usize) -> String {
    match metric {
        Metric::Defined(v) => format!("{v:.decimals$}"),
        Metric::Undefined(r) => tr.t(reason_key(*r)).to_string(),
    }
}

fn percent_text(tr: &Translator, metric: &Metric) -> String {
    match metric {
        Metric::Defined(v) => format!("{:.2}%", v * 100.0),
        Metric::Undefined(r) => tr.t(reason_key(*r)).to_string(),
    }
}

fn row(label: &str, value: impl std::fmt::Display) {
    println!("  {label:<34} {value:>18}");
}

fn debt_label(tr: &Translator, kind: DebtKind) -> &str {
    match kind {
        DebtKind::Technical => tr.t(keys::DEBT_TECHNICAL),
        DebtKind::Csat => tr.t(keys::DEBT_CSAT),
    }
}

/// 계산된 시나리오를 표 형식으로 출력한다.
pub fn print_scenario(tr: &Translator, cfg: &Config, scenario: &Scenario) {
    let d = cfg.output.currency_decimals;
    let inputs = &scenario.inputs;
    let o = &scenario.outputs;

    println!("\n{}", tr.t(keys::COMPUTE_HEADING));
    if !inputs.title.is_empty() {
        println!("{} ({})", inputs.title, inputs.acquisition.strategy);
    }

    println!("{}", tr.t(keys::COMPUTE_VOLUME));
    row(tr.t(keys::TASKS_PER_YEAR), format!("{:.0}", o.tasks_per_year));
    row(tr.t(keys::MANUAL_MINUTES), format!("{:.1}", o.manual_total_minutes));
    row(tr.t(keys::AUTOMATED_MINUTES), format!("{:.1}", o.automated_total_minutes));
    row(tr.t(keys::HOURS_SAVED_PER_CHANGE), format!("{:.3}", o.hours_saved_per_change));
    row(tr.t(keys::EFFECTIVE_CHANGES), format!("{:.1}", o.effective_changes_per_year));
    row(tr.t(keys::ANNUAL_HOURS_SAVED), format!("{:.1}", o.annual_hours_saved));

    println!("{}", tr.t(keys::COMPUTE_BENEFITS));
    row(tr.t(keys::ANNUAL_COST_SAVINGS), format!("{:.d$}", o.annual_cost_savings));
    for (_, entry) in inputs.enabled_benefits() {
        row(&format!("+ {}", entry.name), format!("{:.d$}", entry.annual_value));
    }
    row(tr.t(keys::ANNUAL_ADDITIONAL_BENEFITS), format!("{:.d$}", o.annual_additional_benefits));
    row(tr.t(keys::ANNUAL_TOTAL_BENEFIT), format!("{:.d$}", o.annual_total_benefit));

    if !o.debt_charges.is_empty() {
        println!("{}", tr.t(keys::COMPUTE_DEBTS));
        for charge in &o.debt_charges {
            let name = debt_label(tr, charge.kind);
            row(
                &format!("{name} {}", tr.t(keys::DEBT_IMPACT)),
                format!("{:.0}%", charge.impact_fraction * 100.0),
            );
            row(
                &format!("{name} {}", tr.t(keys::DEBT_AFTER)),
                format!("{:.d$}", charge.annual_after_remediation),
            );
            if charge.remediation_one_time > 0.0 {
                row(
                    &format!("{name} {}", tr.t(keys::DEBT_REMEDIATION)),
                    format!("{:.d$}", charge.remediation_one_time),
                );
            }
        }
    }

    println!("{}", tr.t(keys::COMPUTE_COSTS));
    row(tr.t(keys::PROJECT_COST), format!("{:.d$}", o.project_cost_effective));
    row(tr.t(keys::ANNUAL_RUN_COST), format!("{:.d$}", o.annual_run_cost_effective));
    row(tr.t(keys::ANNUAL_NET_BENEFIT), format!("{:.d$}", o.annual_net_benefit));

    println!("{}", tr.t(keys::COMPUTE_METRICS));
    row(tr.t(keys::NPV), format!("{:.d$}", o.npv));
    row(tr.t(keys::IRR), percent_text(tr, &o.irr));
    row(tr.t(keys::PAYBACK), metric_text(tr, &o.payback, 2));
    row(tr.t(keys::CUM_1), metric_text(tr, &o.cum_1, d));
    row(tr.t(keys::CUM_3), metric_text(tr, &o.cum_3, d));
    row(tr.t(keys::CUM_5), metric_text(tr, &o.cum_5, d));

    println!("{}", tr.t(keys::COMPUTE_SANITY));
    row(tr.t(keys::TOTAL_SWITCHES), o.total_switches);
    row(tr.t(keys::HOURS_SAVED_PER_CHANGE), format!("{:.2}", o.hours_saved_per_change));
    row(tr.t(keys::HOURS_PER_SWITCH), metric_text(tr, &o.hours_saved_per_switch_per_year, 3));
    row(tr.t(keys::HOURS_PER_SITE), metric_text(tr, &o.hours_saved_per_site_per_year, 3));
    row(tr.t(keys::BENEFIT_PER_SWITCH), metric_text(tr, &o.benefit_per_switch_per_year, d));
    row(tr.t(keys::BENEFIT_PER_SITE), metric_text(tr, &o.benefit_per_site_per_year, d));
    row(tr.t(keys::BENEFIT_PER_CHANGE), metric_text(tr, &o.benefit_per_change, d));

    println!("{}", tr.t(keys::COMPUTE_CASH_FLOWS));
    for (t, cf) in o.cash_flows.iter().enumerate() {
        row(&format!("{} {t}", tr.t(keys::YEAR)), format!("{cf:.d$}"));
    }
}

fn field_key(field: ComparedField) -> &'static str {
    match field {
        ComparedField::ProjectCost => keys::PROJECT_COST,
        ComparedField::AnnualRunCost => keys::ANNUAL_RUN_COST,
        ComparedField::AnnualTotalBenefit => keys::ANNUAL_TOTAL_BENEFIT,
        ComparedField::AnnualNetBenefit => keys::ANNUAL_NET_BENEFIT,
        ComparedField::Npv => keys::NPV,
        ComparedField::Irr => keys::IRR,
        ComparedField::Payback => keys::PAYBACK,
    }
}

fn compared_text(tr: &Translator, field: ComparedField, metric: &Metric, decimals: usize) -> String {
    match field {
        ComparedField::Irr => percent_text(tr, metric),
        ComparedField::Payback => metric_text(tr, metric, 2),
        _ => metric_text(tr, metric, decimals),
    }
}

/// 비교 표를 출력한다. 마지막 행은 도입 방식(차이 없음).
pub fn print_comparison(tr: &Translator, cfg: &Config, table: &ComparisonTable) {
    let d = cfg.output.currency_decimals;
    println!("\n{}", tr.t(keys::COMPARE_HEADING));
    println!(
        "  {:<30} {:>18} {:>18} {:>18}",
        tr.t(keys::COMPARE_METRIC),
        table.label_a,
        table.label_b,
        tr.t(keys::COMPARE_DELTA)
    );
    for r in &table.rows {
        println!(
            "  {:<30} {:>18} {:>18} {:>18}",
            tr.t(field_key(r.field)),
            compared_text(tr, r.field, &r.value_a, d),
            compared_text(tr, r.field, &r.value_b, d),
            compared_text(tr, r.field, &r.delta, d),
        );
    }
    println!(
        "  {:<30} {:>18} {:>18} {:>18}",
        tr.t(keys::COMPARE_STRATEGY),
        table.strategy_a,
        table.strategy_b,
        "-"
    );
}

fn report_discrepancies(tr: &Translator, path: &Path, loaded: &LoadedScenario) {
    for d in &loaded.discrepancies {
        eprintln!(
            "{} {} `{}`: {} -> {}",
            tr.t(keys::LOAD_DISCREPANCY),
            path.display(),
            d.field,
            d.stored,
            d.recomputed
        );
    }
}

fn load_scenario(
    cfg: &Config,
    tr: &Translator,
    path: &Path,
    policy: LoadPolicy,
) -> Result<Scenario, AppError> {
    let loaded = store::load(path, policy, &cfg.irr)?;
    report_discrepancies(tr, path, &loaded);
    Ok(loaded.scenario)
}

/// `compute` 명령을 처리한다.
pub fn handle_compute(
    cfg: &Config,
    tr: &Translator,
    inputs: &Path,
    save: Option<Option<PathBuf>>,
    slug: Option<&str>,
    json: bool,
) -> Result<(), AppError> {
    let scenario_inputs = store::read_inputs(inputs)?;
    let scenario = Scenario::compute_with(scenario_inputs, &cfg.irr)?;
    if wants_json(cfg, json) {
        print_json(&scenario)?;
    } else {
        print_scenario(tr, cfg, &scenario);
    }
    if let Some(dir) = save {
        let dir = dir.unwrap_or_else(|| cfg.output.save_dir.clone());
        let path = store::save(&scenario, &dir, slug)?;
        eprintln!("{} {}", tr.t(keys::COMPUTE_SAVED), path.display());
    }
    Ok(())
}

/// `compare` 명령을 처리한다.
pub fn handle_compare(
    cfg: &Config,
    tr: &Translator,
    a: &Path,
    b: &Path,
    labels: (&str, &str),
    policy: LoadPolicy,
    json: bool,
) -> Result<(), AppError> {
    let sa = load_scenario(cfg, tr, a, policy)?;
    let sb = load_scenario(cfg, tr, b, policy)?;
    let table = comparison::compare_labeled(&sa, &sb, labels.0, labels.1);
    if wants_json(cfg, json) {
        print_json(&table)?;
    } else {
        print_comparison(tr, cfg, &table);
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `compare-all` 명령을 처리한다. 후보 순서대로 표를 출력한다.
pub fn handle_compare_all(
    cfg: &Config,
    tr: &Translator,
    baseline: &Path,
    candidates: &[PathBuf],
    policy: LoadPolicy,
    json: bool,
) -> Result<(), AppError> {
    let base = load_scenario(cfg, tr, baseline, policy)?;
    let loaded = candidates
        .iter()
        .map(|p| -> Result<(String, Scenario), AppError> {
            Ok((file_label(p), load_scenario(cfg, tr, p, policy)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let base_label = file_label(baseline);
    let tables = comparison::compare_against((&base_label, &base), &loaded);
    if wants_json(cfg, json) {
        print_json(&tables)?;
    } else {
        for table in &tables {
            print_comparison(tr, cfg, table);
        }
    }
    Ok(())
}

/// `time-savings` 명령을 처리한다.
pub fn handle_time_savings(
    cfg: &Config,
    tr: &Translator,
    inputs: Option<&Path>,
    json: bool,
) -> Result<(), AppError> {
    let input: TimeSavingsInput = match inputs {
        Some(path) => store::read_document(path)?,
        None => TimeSavingsInput::default(),
    };
    let result = compute_time_savings(&input)?;
    if wants_json(cfg, json) {
        return print_json(&result);
    }
    let d = cfg.output.currency_decimals;
    println!("\n{}", tr.t(keys::TIME_SAVINGS_HEADING));
    row(tr.t(keys::TIME_SAVINGS_MINUTES), format!("{:.1}", result.minutes_saved_per_interaction));
    row(tr.t(keys::TIME_SAVINGS_INTERACTIONS), format!("{:.0}", result.interactions_per_year));
    row(tr.t(keys::TIME_SAVINGS_AUTOMATED), format!("{:.1}", result.automated_interactions_per_year));
    row(tr.t(keys::ANNUAL_HOURS_SAVED), format!("{:.1}", result.annual_hours_saved));
    row(tr.t(keys::ANNUAL_COST_SAVINGS), format!("{:.d$}", result.annual_cost_savings));
    row(tr.t(keys::TIME_SAVINGS_COST), format!("{:.d$}", result.one_year_cost));
    row(tr.t(keys::TIME_SAVINGS_ROI), metric_text(tr, &result.quick_roi_pct, 1));
    Ok(())
}

/// `csat-debt` 명령을 처리한다.
pub fn handle_csat_debt(
    cfg: &Config,
    tr: &Translator,
    inputs: &Path,
    json: bool,
) -> Result<(), AppError> {
    let input: CsatDebtInput = store::read_document(inputs)?;
    let estimate = estimate_csat_debt(&input)?;
    if wants_json(cfg, json) {
        return print_json(&estimate);
    }
    let d = cfg.output.currency_decimals;
    let c = estimate.counts;
    println!("\n{}", tr.t(keys::CSAT_HEADING));
    row(tr.t(keys::CSAT_COUNTS), format!("{} / {} / {}", c.happy, c.neutral, c.sad));
    row(tr.t(keys::CSAT_CES), metric_text(tr, &estimate.ces, 3));
    row(tr.t(keys::CSAT_AVG_COST), metric_text(tr, &estimate.avg_cost_per_response, d));
    row(tr.t(keys::CSAT_RESPONSES), format!("{:.1}", estimate.responses_per_year));
    row(tr.t(keys::CSAT_ANNUAL_COST), format!("{:.d$}", estimate.annual_cost));
    Ok(())
}

/// `waiting-time` 명령을 처리한다. JSON 출력은 바로 입력 문서에 넣을 수 있는 편익 항목이다.
pub fn handle_waiting_time(
    cfg: &Config,
    tr: &Translator,
    input: &WaitingTimeInput,
    category: BenefitCategory,
    json: bool,
) -> Result<(), AppError> {
    if wants_json(cfg, json) {
        return print_json(&input.to_benefit(category)?);
    }
    input.validate()?;
    let d = cfg.output.currency_decimals;
    println!("\n{}", tr.t(keys::WAITING_HEADING));
    row(tr.t(keys::WAITING_DAYS_SAVED), format!("{:.1}", input.days_saved_per_site()));
    row(tr.t(keys::WAITING_ANNUAL_VALUE), format!("{:.d$}", input.suggested_annual_value()));
    println!("  {}: {}", tr.t(keys::WAITING_ASSUMPTIONS), input.assumptions());
    Ok(())
}

/// 현재 설정을 출력한다.
pub fn print_settings(tr: &Translator, cfg: &Config) {
    println!("\n{}", tr.t(keys::SETTINGS_HEADING));
    row(tr.t(keys::SETTINGS_LANGUAGE), &cfg.language);
    row(tr.t(keys::SETTINGS_LOAD_POLICY), format!("{:?}", cfg.load_policy).to_lowercase());
    row(
        tr.t(keys::SETTINGS_IRR),
        format!(
            "[{}, {}] tol {:e} / {:e}, {}",
            cfg.irr.lower_bound,
            cfg.irr.upper_bound,
            cfg.irr.rate_tolerance,
            cfg.irr.npv_tolerance,
            cfg.irr.max_iterations
        ),
    );
}

/// `config` 명령을 처리한다. 변경 시 설정 파일에 바로 저장한다.
pub fn handle_settings(
    cfg: &mut Config,
    config_path: &Path,
    tr: &Translator,
    action: &ConfigAction,
) -> Result<(), AppError> {
    match action {
        ConfigAction::Show => {
            print_settings(tr, cfg);
            return Ok(());
        }
        ConfigAction::SetLanguage { code } => {
            cfg.language = code.trim().to_lowercase();
        }
        ConfigAction::SetLoadPolicy { policy } => {
            cfg.load_policy = (*policy).into();
        }
    }
    cfg.save(config_path)?;
    println!("{}", tr.t(keys::SETTINGS_SAVED));
    Ok(())
}

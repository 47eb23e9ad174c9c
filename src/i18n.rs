use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";

    pub const COMPUTE_HEADING: &str = "compute.heading";
    pub const COMPUTE_VOLUME: &str = "compute.volume";
    pub const COMPUTE_BENEFITS: &str = "compute.benefits";
    pub const COMPUTE_COSTS: &str = "compute.costs";
    pub const COMPUTE_METRICS: &str = "compute.metrics";
    pub const COMPUTE_CASH_FLOWS: &str = "compute.cash_flows";
    pub const COMPUTE_DEBTS: &str = "compute.debts";
    pub const COMPUTE_SANITY: &str = "compute.sanity";
    pub const COMPUTE_SAVED: &str = "compute.saved";
    pub const YEAR: &str = "compute.year";

    pub const TASKS_PER_YEAR: &str = "field.tasks_per_year";
    pub const MANUAL_MINUTES: &str = "field.manual_total_minutes";
    pub const AUTOMATED_MINUTES: &str = "field.automated_total_minutes";
    pub const HOURS_SAVED_PER_CHANGE: &str = "field.hours_saved_per_change";
    pub const EFFECTIVE_CHANGES: &str = "field.effective_changes_per_year";
    pub const ANNUAL_HOURS_SAVED: &str = "field.annual_hours_saved";
    pub const ANNUAL_COST_SAVINGS: &str = "field.annual_cost_savings";
    pub const ANNUAL_ADDITIONAL_BENEFITS: &str = "field.annual_additional_benefits";
    pub const ANNUAL_TOTAL_BENEFIT: &str = "field.annual_total_benefit";
    pub const ANNUAL_RUN_COST: &str = "field.annual_run_cost_effective";
    pub const ANNUAL_NET_BENEFIT: &str = "field.annual_net_benefit";
    pub const PROJECT_COST: &str = "field.project_cost_effective";
    pub const NPV: &str = "field.npv";
    pub const IRR: &str = "field.irr";
    pub const PAYBACK: &str = "field.payback";
    pub const CUM_1: &str = "field.cum_1";
    pub const CUM_3: &str = "field.cum_3";
    pub const CUM_5: &str = "field.cum_5";
    pub const TOTAL_SWITCHES: &str = "field.total_switches";
    pub const HOURS_PER_SWITCH: &str = "field.hours_saved_per_switch_per_year";
    pub const HOURS_PER_SITE: &str = "field.hours_saved_per_site_per_year";
    pub const BENEFIT_PER_SWITCH: &str = "field.benefit_per_switch_per_year";
    pub const BENEFIT_PER_SITE: &str = "field.benefit_per_site_per_year";
    pub const BENEFIT_PER_CHANGE: &str = "field.benefit_per_change";
    pub const DEBT_TECHNICAL: &str = "field.debt_technical";
    pub const DEBT_CSAT: &str = "field.debt_csat";
    pub const DEBT_IMPACT: &str = "field.debt_impact";
    pub const DEBT_AFTER: &str = "field.debt_after";
    pub const DEBT_REMEDIATION: &str = "field.debt_remediation";

    pub const UNDEFINED_NOT_MEANINGFUL: &str = "undefined.not_meaningful";
    pub const UNDEFINED_NOT_REACHED: &str = "undefined.not_reached";
    pub const UNDEFINED_BEYOND_HORIZON: &str = "undefined.beyond_horizon";
    pub const UNDEFINED_INCOMPARABLE: &str = "undefined.incomparable";

    pub const COMPARE_HEADING: &str = "compare.heading";
    pub const COMPARE_METRIC: &str = "compare.metric";
    pub const COMPARE_DELTA: &str = "compare.delta";
    pub const COMPARE_STRATEGY: &str = "compare.strategy";
    pub const LOAD_DISCREPANCY: &str = "load.discrepancy";

    pub const TIME_SAVINGS_HEADING: &str = "time_savings.heading";
    pub const TIME_SAVINGS_MINUTES: &str = "time_savings.minutes_saved";
    pub const TIME_SAVINGS_INTERACTIONS: &str = "time_savings.interactions_per_year";
    pub const TIME_SAVINGS_AUTOMATED: &str = "time_savings.automated_per_year";
    pub const TIME_SAVINGS_COST: &str = "time_savings.one_year_cost";
    pub const TIME_SAVINGS_ROI: &str = "time_savings.quick_roi";

    pub const CSAT_HEADING: &str = "csat.heading";
    pub const CSAT_COUNTS: &str = "csat.counts";
    pub const CSAT_CES: &str = "csat.ces";
    pub const CSAT_AVG_COST: &str = "csat.avg_cost";
    pub const CSAT_RESPONSES: &str = "csat.responses_per_year";
    pub const CSAT_ANNUAL_COST: &str = "csat.annual_cost";

    pub const WAITING_HEADING: &str = "waiting.heading";
    pub const WAITING_DAYS_SAVED: &str = "waiting.days_saved";
    pub const WAITING_ANNUAL_VALUE: &str = "waiting.annual_value";
    pub const WAITING_ASSUMPTIONS: &str = "waiting.assumptions";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_LOAD_POLICY: &str = "settings.load_policy";
    pub const SETTINGS_IRR: &str = "settings.irr";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 내장 언어팩으로 번역기를 생성한다.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_code(lang_code);
        let strings = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code))
            .or_else(|| built_in_pack(lang.as_code()))
            .unwrap_or_default();
        let fallback = built_in_pack(Language::En.as_code()).unwrap_or_default();
        Self {
            lang,
            strings,
            fallback,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// 번역을 가져온다. 없으면 영어 내장 문자열, 그것도 없으면 키 자체를 돌려준다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" => Some("ko".into()),
        "ko-kr" => Some("ko-kr".into()),
        "en" => Some("en".into()),
        "en-us" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., en-us)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., en)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match lang.to_lowercase().as_str() {
        "en-us" | "en" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        "ko-kr" | "ko" => parse_toml_to_map(include_str!("../locales/ko-kr.toml")),
        _ => None,
    }
}

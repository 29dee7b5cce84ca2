use chrono::NaiveDate;
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use sourcing_rules::config::RulesConfig;
use sourcing_rules::error::AppError;
use sourcing_rules::workflows::sourcing::{
    LoadedRuleSource, RuleSource, SmartRulesEngine, StaticRuleSource,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Command-line overrides for where reference tables come from.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RulesArgs {
    /// JSON reference table snapshot (overrides APP_RULES_PATH)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// CSV sheet of extra client rules (overrides APP_CLIENT_RULES_CSV)
    #[arg(long)]
    pub(crate) client_rules: Option<PathBuf>,
}

impl RulesArgs {
    pub(crate) fn apply(self, mut config: RulesConfig) -> RulesConfig {
        if let Some(path) = self.rules {
            config.tables_path = Some(path);
        }
        if let Some(path) = self.client_rules {
            config.client_rules_csv = Some(path);
        }
        config
    }
}

/// Picks the rule source once: a loaded snapshot when configured, otherwise
/// the built-in catalog.
pub(crate) fn build_rule_source(config: &RulesConfig) -> Result<Arc<dyn RuleSource>, AppError> {
    let Some(path) = config.tables_path.as_ref() else {
        info!("using built-in sourcing catalog");
        return Ok(Arc::new(StaticRuleSource::standard()));
    };

    let mut source = LoadedRuleSource::from_path(path)?;
    if let Some(sheet) = config.client_rules_csv.as_ref() {
        source = source.with_client_rules_csv(sheet)?;
    }

    info!(
        path = %path.display(),
        version = source.snapshot().version(),
        "reference tables loaded"
    );
    Ok(Arc::new(source))
}

pub(crate) fn build_engine(config: &RulesConfig) -> Result<Arc<SmartRulesEngine>, AppError> {
    let source = build_rule_source(config)?;
    Ok(Arc::new(SmartRulesEngine::new(source, config.cache_capacity)))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcing_rules::workflows::sourcing::RuleSourceKind;

    #[test]
    fn defaults_to_the_built_in_catalog() {
        let engine = build_engine(&RulesConfig::default()).expect("engine builds");
        assert_eq!(engine.kind(), RuleSourceKind::Static);
    }

    #[test]
    fn cli_overrides_replace_configured_paths() {
        let args = RulesArgs {
            rules: Some(PathBuf::from("tables.json")),
            client_rules: None,
        };
        let config = args.apply(RulesConfig {
            tables_path: Some(PathBuf::from("other.json")),
            client_rules_csv: Some(PathBuf::from("clients.csv")),
            cache_capacity: 8,
        });

        assert_eq!(config.tables_path, Some(PathBuf::from("tables.json")));
        assert_eq!(config.client_rules_csv, Some(PathBuf::from("clients.csv")));
        assert_eq!(config.cache_capacity, 8);
    }

    #[test]
    fn missing_snapshot_surfaces_as_rule_source_error() {
        let config = RulesConfig {
            tables_path: Some(PathBuf::from("/nonexistent/sourcing/tables.json")),
            ..RulesConfig::default()
        };
        assert!(matches!(
            build_engine(&config),
            Err(AppError::RuleSource(_))
        ));
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-03-10 "),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"))
        );
        assert!(parse_date("10/03/2025").is_err());
    }
}

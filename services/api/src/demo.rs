use crate::infra::{build_engine, parse_date, RulesArgs};
use chrono::{Days, NaiveDate, Utc};
use clap::Args;
use sourcing_rules::config::{AppConfig, RulesConfig};
use sourcing_rules::error::AppError;
use sourcing_rules::workflows::sourcing::resolvers::{
    categories_for_sector, resolve_sector, Resolution,
};
use sourcing_rules::workflows::sourcing::{
    validate_tables, FieldId, ReferenceTables, Selection, Severity, SmartRecommendation,
    SmartRulesEngine,
};
use std::fmt::Write as _;

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    /// Sector code (required for a recommendation)
    #[arg(long)]
    pub(crate) sector: Option<String>,
    /// Category code refining the sector defaults
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Client code whose policy takes precedence
    #[arg(long)]
    pub(crate) client: Option<String>,
    /// Requesting department code
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Date the event opens (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the raw recommendation as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) rules: RulesArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OptionsArgs {
    /// Only list categories tagged with this sector
    #[arg(long)]
    pub(crate) sector: Option<String>,
    #[command(flatten)]
    pub(crate) rules: RulesArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    pub(crate) rules: RulesArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the demo events open (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) rules: RulesArgs,
}

fn rules_config(args: RulesArgs) -> Result<RulesConfig, AppError> {
    let config = AppConfig::load()?;
    Ok(args.apply(config.rules))
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        sector,
        category,
        client,
        department,
        today,
        json,
        rules,
    } = args;

    let engine = build_engine(&rules_config(rules)?)?;
    let selection = Selection {
        sector,
        category,
        client,
        department,
    };
    let today = today.unwrap_or_else(|| Utc::now().date_naive());

    match engine.recommend(&selection) {
        Some(recommendation) if json => {
            let rendered = serde_json::to_string_pretty(&recommendation)
                .map_err(|err| AppError::Io(err.into()))?;
            println!("{rendered}");
        }
        Some(recommendation) => print!("{}", render_recommendation(&recommendation, today)),
        None => match resolve_sector(engine.tables(), selection.sector.as_deref()) {
            Resolution::NotSelected => {
                println!("Select a sector to receive sourcing recommendations.")
            }
            _ => println!("No recommendation for the selected sector."),
        },
    }

    Ok(())
}

pub(crate) fn run_options(args: OptionsArgs) -> Result<(), AppError> {
    let engine = build_engine(&rules_config(args.rules)?)?;
    print!("{}", render_options(engine.tables(), args.sector.as_deref()));
    Ok(())
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let engine = build_engine(&rules_config(args.rules)?)?;
    let issues = validate_tables(engine.tables());

    let version = engine.snapshot().version();
    println!(
        "Reference tables {} ({})",
        version.get(..12).unwrap_or(version),
        engine.kind().label()
    );
    if issues.is_empty() {
        println!("No data-quality issues found.");
    } else {
        println!("{} issue(s) found:", issues.len());
        for issue in &issues {
            println!("- {issue}");
        }
    }

    Ok(())
}

/// Reference scenarios exercised by the demo walkthrough.
const DEMO_SCENARIOS: &[(&str, &str, Option<&str>, Option<&str>, Option<&str>)] = &[
    ("Sector only", "industria", None, None, None),
    (
        "Client override",
        "industria",
        None,
        Some("petrobras"),
        None,
    ),
    (
        "Category refinement",
        "servicos_gerais",
        Some("consultoria_estrategica"),
        None,
        None,
    ),
    (
        "Department mandate",
        "construcao",
        Some("obras_civis"),
        Some("vale"),
        Some("engenharia"),
    ),
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = build_engine(&rules_config(args.rules)?)?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    print!("{}", render_demo(&engine, today));
    Ok(())
}

fn render_demo(engine: &SmartRulesEngine, today: NaiveDate) -> String {
    let mut out = String::new();
    writeln!(out, "Sourcing rules demo ({})", engine.kind().label()).expect("write demo header");

    for (title, sector, category, client, department) in DEMO_SCENARIOS {
        let selection = Selection {
            sector: Some(sector.to_string()),
            category: category.map(str::to_string),
            client: client.map(str::to_string),
            department: department.map(str::to_string),
        };
        writeln!(out, "\n== {title} ==").expect("write scenario title");
        match engine.recommend(&selection) {
            Some(recommendation) => out.push_str(&render_recommendation(&recommendation, today)),
            None => {
                writeln!(out, "No recommendation: sector '{sector}' is not catalogued.")
                    .expect("write missing sector");
            }
        }
    }

    writeln!(out, "\n== Empty selection ==").expect("write empty scenario title");
    if engine.recommend(&Selection::default()).is_none() {
        writeln!(out, "Select a sector to receive sourcing recommendations.")
            .expect("write prompt");
    }

    out
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "WARN",
        Severity::Error => "ERROR",
    }
}

fn field_codes<'a>(fields: impl IntoIterator<Item = &'a FieldId>) -> String {
    let codes: Vec<&str> = fields.into_iter().map(|field| field.code()).collect();
    if codes.is_empty() {
        "-".to_string()
    } else {
        codes.join(", ")
    }
}

pub(crate) fn render_recommendation(
    recommendation: &SmartRecommendation,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let due = today
        .checked_add_days(Days::new(u64::from(recommendation.response_days)))
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());

    writeln!(
        out,
        "Event type: {} ({})",
        recommendation.event_type.label(),
        recommendation.event_focus
    )
    .expect("write event type");
    writeln!(
        out,
        "Auction: {} | policy {}",
        if recommendation.auction_allowed {
            "allowed"
        } else {
            "not allowed"
        },
        recommendation.auction_policy.label()
    )
    .expect("write auction policy");
    writeln!(out, "Weights technical/commercial: {}", recommendation.weights)
        .expect("write weights");
    writeln!(
        out,
        "Response window: {} days (due {due})",
        recommendation.response_days
    )
    .expect("write response window");
    writeln!(
        out,
        "Required: {}",
        field_codes(&recommendation.required_fields)
    )
    .expect("write required fields");
    writeln!(out, "Hidden: {}", field_codes(&recommendation.hidden_fields))
        .expect("write hidden fields");
    for lock in &recommendation.field_locks {
        let value = lock
            .value
            .as_ref()
            .map(|value| format!(" = {value}"))
            .unwrap_or_default();
        writeln!(out, "Locked {}{value}: {}", lock.field, lock.justification)
            .expect("write field lock");
    }
    for suggestion in &recommendation.suggestions {
        let value = suggestion
            .value
            .as_ref()
            .map(|value| format!(" = {value}"))
            .unwrap_or_default();
        writeln!(
            out,
            "Suggested {}{value}: {}",
            suggestion.field, suggestion.justification
        )
        .expect("write suggestion");
    }
    if let Some(approval) = &recommendation.approval {
        writeln!(
            out,
            "Approval: {} above BRL {}{}",
            approval.department,
            approval.approval_threshold,
            if approval.multiple_quotes_required {
                ", multiple quotes"
            } else {
                ""
            }
        )
        .expect("write approval");
    }

    writeln!(out, "Applied rules:").expect("write applied rules header");
    for rule in &recommendation.applied_rules {
        writeln!(out, "  - {rule}").expect("write applied rule");
    }
    if !recommendation.alerts.is_empty() {
        writeln!(out, "Alerts:").expect("write alerts header");
        for alert in &recommendation.alerts {
            writeln!(
                out,
                "  [{}] {}: {}",
                severity_tag(alert.severity),
                alert.origin,
                alert.message
            )
            .expect("write alert");
        }
    }

    out
}

fn render_options(tables: &ReferenceTables, sector: Option<&str>) -> String {
    let mut out = String::new();

    writeln!(out, "Sectors:").expect("write sectors header");
    for entry in &tables.sectors {
        writeln!(
            out,
            "  {} - {} (suggests {})",
            entry.code,
            entry.name,
            entry.suggested_event_type.label()
        )
        .expect("write sector");
    }

    if let Some(sector) = sector.map(str::trim).filter(|sector| !sector.is_empty()) {
        writeln!(out, "Categories in {sector}:").expect("write categories header");
        for category in categories_for_sector(tables, sector) {
            writeln!(out, "  {} - {}", category.code, category.name).expect("write category");
        }
    }

    writeln!(out, "Clients:").expect("write clients header");
    for client in &tables.clients {
        writeln!(
            out,
            "  {} - {} ({} rules)",
            client.code,
            client.name,
            client.rules.len()
        )
        .expect("write client");
    }

    writeln!(out, "Departments:").expect("write departments header");
    for department in &tables.departments {
        writeln!(out, "  {} - {}", department.code, department.name)
            .expect("write department");
    }

    out
}

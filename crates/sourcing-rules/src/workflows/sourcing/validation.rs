use std::collections::HashSet;

use tracing::warn;

use super::domain::{EventTypeCode, FieldId, FieldValueKind, WeightSplit};
use super::tables::ReferenceTables;

/// Inconsistencies an offline check finds in reference tables.
///
/// None of these stop resolution; they flag data an administrator should fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableIssue {
    #[error("{table} '{key}' weights {weights} do not sum to 100")]
    UnbalancedWeights {
        table: &'static str,
        key: String,
        weights: WeightSplit,
    },
    #[error("category '{category}' response window {min}-{max} days is inverted")]
    InvertedResponseWindow { category: String, min: u32, max: u32 },
    #[error("client '{client}' minimum technical weight {minimum}% exceeds 100")]
    TechnicalMinimumOutOfRange { client: String, minimum: u8 },
    #[error("client '{client}' rule for {field} carries a {found:?} value, expected {expected:?}")]
    ValueKindMismatch {
        client: String,
        field: FieldId,
        expected: FieldValueKind,
        found: FieldValueKind,
    },
    #[error("client '{client}' declares {count} rules for {field}; the last one wins")]
    DuplicateClientRule {
        client: String,
        field: FieldId,
        count: usize,
    },
    #[error("category '{category}' is tagged with unknown sector '{sector}'")]
    UnknownSector { category: String, sector: String },
    #[error("department '{department}' allows unknown {table} code '{code}'")]
    UnknownMandateCode {
        department: String,
        table: &'static str,
        code: String,
    },
    #[error("{table} '{key}' suggests event type {event_type} missing from the event type table")]
    MissingEventType {
        table: &'static str,
        key: String,
        event_type: EventTypeCode,
    },
}

/// Runs every consistency check and logs each finding at warn level.
pub fn validate_tables(tables: &ReferenceTables) -> Vec<TableIssue> {
    let mut issues = Vec::new();

    check_weights(tables, &mut issues);
    check_response_windows(tables, &mut issues);
    check_clients(tables, &mut issues);
    check_references(tables, &mut issues);

    for issue in &issues {
        warn!(%issue, "reference table issue");
    }

    issues
}

fn check_weights(tables: &ReferenceTables, issues: &mut Vec<TableIssue>) {
    let mut flag = |table: &'static str, key: &str, weights: WeightSplit| {
        if !weights.is_balanced() {
            issues.push(TableIssue::UnbalancedWeights {
                table,
                key: key.to_string(),
                weights,
            });
        }
    };

    for event in &tables.event_types {
        flag("event_types", event.code.code(), event.default_weights);
    }
    for sector in &tables.sectors {
        if let Some(weights) = sector.default_weights {
            flag("sectors", sector.code.as_str(), weights);
        }
    }
    for category in &tables.categories {
        if let Some(weights) = category.weights {
            flag("categories", category.code.as_str(), weights);
        }
    }
}

fn check_response_windows(tables: &ReferenceTables, issues: &mut Vec<TableIssue>) {
    issues.extend(
        tables
            .categories
            .iter()
            .filter(|category| category.min_response_days > category.max_response_days)
            .map(|category| TableIssue::InvertedResponseWindow {
                category: category.code.to_string(),
                min: category.min_response_days,
                max: category.max_response_days,
            }),
    );
}

fn check_clients(tables: &ReferenceTables, issues: &mut Vec<TableIssue>) {
    for client in &tables.clients {
        let code = client.code.to_string();

        if let Some(minimum) = client
            .fixed
            .as_ref()
            .and_then(|fixed| fixed.min_technical_weight)
            .filter(|minimum| *minimum > 100)
        {
            issues.push(TableIssue::TechnicalMinimumOutOfRange {
                client: code.clone(),
                minimum,
            });
        }

        for rule in &client.rules {
            let Some(value) = &rule.value else {
                continue;
            };
            if value.kind() != rule.field.value_kind() {
                issues.push(TableIssue::ValueKindMismatch {
                    client: code.clone(),
                    field: rule.field,
                    expected: rule.field.value_kind(),
                    found: value.kind(),
                });
            }
        }

        let mut reported = HashSet::new();
        for rule in &client.rules {
            let count = client
                .rules
                .iter()
                .filter(|other| other.field == rule.field)
                .count();
            if count > 1 && reported.insert(rule.field) {
                issues.push(TableIssue::DuplicateClientRule {
                    client: code.clone(),
                    field: rule.field,
                    count,
                });
            }
        }
    }
}

fn check_references(tables: &ReferenceTables, issues: &mut Vec<TableIssue>) {
    let missing_event = |code: EventTypeCode| tables.event_type(code).is_none();

    for sector in &tables.sectors {
        if missing_event(sector.suggested_event_type) {
            issues.push(TableIssue::MissingEventType {
                table: "sectors",
                key: sector.code.to_string(),
                event_type: sector.suggested_event_type,
            });
        }
    }

    for category in &tables.categories {
        if let Some(sector) = category
            .sector
            .as_ref()
            .filter(|sector| tables.sector(sector.as_str()).is_none())
        {
            issues.push(TableIssue::UnknownSector {
                category: category.code.to_string(),
                sector: sector.to_string(),
            });
        }
        if let Some(event_type) = category.suggested_event_type.filter(|code| missing_event(*code)) {
            issues.push(TableIssue::MissingEventType {
                table: "categories",
                key: category.code.to_string(),
                event_type,
            });
        }
    }

    for department in &tables.departments {
        for sector in &department.allowed_sectors {
            if tables.sector(sector.as_str()).is_none() {
                issues.push(TableIssue::UnknownMandateCode {
                    department: department.code.to_string(),
                    table: "sectors",
                    code: sector.to_string(),
                });
            }
        }
        for category in &department.allowed_categories {
            if tables.category(category.as_str()).is_none() {
                issues.push(TableIssue::UnknownMandateCode {
                    department: department.code.to_string(),
                    table: "categories",
                    code: category.to_string(),
                });
            }
        }
    }
}

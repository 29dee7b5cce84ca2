use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::ImportError;
use crate::workflows::sourcing::domain::{FieldId, RuleAction};
use crate::workflows::sourcing::tables::ReferenceTables;

pub fn load_tables(path: impl AsRef<Path>) -> Result<ReferenceTables, ImportError> {
    let file = File::open(path.as_ref())?;
    parse_tables(BufReader::new(file))
}

/// Parses a snapshot, naming unknown field codes and actions before serde sees
/// them so a typo points at the offending entry.
pub fn parse_tables<R: Read>(reader: R) -> Result<ReferenceTables, ImportError> {
    let raw: Value = serde_json::from_reader(reader)?;

    check_field_codes(&raw)?;
    check_rule_actions(&raw)?;

    let tables: ReferenceTables = serde_json::from_value(raw)?;
    check_duplicate_keys(&tables)?;

    debug!(
        event_types = tables.event_types.len(),
        sectors = tables.sectors.len(),
        categories = tables.categories.len(),
        clients = tables.clients.len(),
        departments = tables.departments.len(),
        "reference tables parsed"
    );

    Ok(tables)
}

/// (table, list-valued keys holding field codes)
const FIELD_LISTS: &[(&str, &[&str])] = &[
    ("event_types", &["required_fields"]),
    ("sectors", &["required_fields", "hidden_fields"]),
    ("categories", &["required_fields", "hidden_fields"]),
];

fn entries<'a>(raw: &'a Value, table: &str) -> impl Iterator<Item = &'a Value> {
    raw.get(table)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn entry_key(entry: &Value) -> String {
    entry
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string()
}

fn ensure_field(table: &'static str, entry: &Value, code: &Value) -> Result<(), ImportError> {
    match code.as_str() {
        Some(code) if FieldId::from_code(code).is_some() => Ok(()),
        _ => Err(ImportError::UnknownField {
            table,
            key: entry_key(entry),
            field: code.as_str().map(str::to_string).unwrap_or_else(|| code.to_string()),
        }),
    }
}

fn ensure_fields(table: &'static str, entry: &Value, list: Option<&Value>) -> Result<(), ImportError> {
    for code in list.and_then(Value::as_array).into_iter().flatten() {
        ensure_field(table, entry, code)?;
    }
    Ok(())
}

fn check_field_codes(raw: &Value) -> Result<(), ImportError> {
    for &(table, keys) in FIELD_LISTS {
        for entry in entries(raw, table) {
            for key in keys {
                ensure_fields(table, entry, entry.get(*key))?;
            }
        }
    }

    for client in entries(raw, "clients") {
        for rule in client.get("rules").and_then(Value::as_array).into_iter().flatten() {
            if let Some(field) = rule.get("field") {
                ensure_field("clients", client, field)?;
            }
        }
        if let Some(fixed) = client.get("fixed") {
            ensure_fields("clients", client, fixed.get("mandatory_documents"))?;
            ensure_fields("clients", client, fixed.get("blocked_fields"))?;
        }
    }

    Ok(())
}

fn check_rule_actions(raw: &Value) -> Result<(), ImportError> {
    for client in entries(raw, "clients") {
        for rule in client.get("rules").and_then(Value::as_array).into_iter().flatten() {
            let Some(action) = rule.get("action") else {
                continue;
            };
            let known = action
                .as_str()
                .map(|code| RuleAction::from_code(code).is_some())
                .unwrap_or(false);
            if !known {
                return Err(ImportError::UnknownAction {
                    client: entry_key(client),
                    action: action.as_str().map(str::to_string).unwrap_or_else(|| action.to_string()),
                });
            }
        }
    }
    Ok(())
}

fn check_duplicate_keys(tables: &ReferenceTables) -> Result<(), ImportError> {
    fn unique<'a>(
        table: &'static str,
        keys: impl Iterator<Item = &'a str>,
    ) -> Result<(), ImportError> {
        let mut seen = HashSet::new();
        for key in keys {
            if !seen.insert(key) {
                return Err(ImportError::DuplicateKey {
                    table,
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    unique(
        "event_types",
        tables.event_types.iter().map(|event| event.code.code()),
    )?;
    unique("sectors", tables.sectors.iter().map(|sector| sector.code.as_str()))?;
    unique(
        "categories",
        tables.categories.iter().map(|category| category.code.as_str()),
    )?;
    unique("clients", tables.clients.iter().map(|client| client.code.as_str()))?;
    unique(
        "departments",
        tables.departments.iter().map(|department| department.code.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sourcing::catalog::standard_tables;

    #[test]
    fn standard_catalog_survives_a_json_round_trip() {
        let json = serde_json::to_vec(&standard_tables()).expect("catalog serializes");
        let parsed = parse_tables(json.as_slice()).expect("catalog parses");
        assert_eq!(parsed, standard_tables());
    }

    #[test]
    fn unknown_field_codes_name_the_entry() {
        let json = r#"{
            "sectors": [{
                "code": "agro",
                "name": "Agronegocio",
                "suggested_event_type": "rfq",
                "acquisition_nature": "bens",
                "auction_policy": "direto",
                "required_fields": ["unit_price", "harvest_window"]
            }]
        }"#;

        match parse_tables(json.as_bytes()) {
            Err(ImportError::UnknownField { table, key, field }) => {
                assert_eq!(table, "sectors");
                assert_eq!(key, "agro");
                assert_eq!(field, "harvest_window");
            }
            other => panic!("expected unknown field error, got {other:?}"),
        }
    }

    #[test]
    fn codes_must_match_their_snake_case_spelling() {
        let json = r#"{
            "sectors": [{
                "code": "agro",
                "name": "Agronegocio",
                "suggested_event_type": "rfq",
                "acquisition_nature": "bens",
                "auction_policy": "direto",
                "required_fields": ["Unit_Price"]
            }]
        }"#;

        match parse_tables(json.as_bytes()) {
            Err(ImportError::UnknownField { table, key, field }) => {
                assert_eq!(table, "sectors");
                assert_eq!(key, "agro");
                assert_eq!(field, "Unit_Price");
            }
            other => panic!("expected unknown field error, got {other:?}"),
        }

        let json = r#"{
            "clients": [{
                "code": "acme",
                "name": "Acme",
                "rules": [{"field": "samples", "action": "Require", "justification": "", "priority": 1}]
            }]
        }"#;

        match parse_tables(json.as_bytes()) {
            Err(ImportError::UnknownAction { client, action }) => {
                assert_eq!(client, "acme");
                assert_eq!(action, "Require");
            }
            other => panic!("expected unknown action error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_rule_actions_are_rejected() {
        let json = r#"{
            "clients": [{
                "code": "acme",
                "name": "Acme",
                "rules": [{"field": "samples", "action": "forbid", "justification": "", "priority": 1}]
            }]
        }"#;

        match parse_tables(json.as_bytes()) {
            Err(ImportError::UnknownAction { client, action }) => {
                assert_eq!(client, "acme");
                assert_eq!(action, "forbid");
            }
            other => panic!("expected unknown action error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let mut tables = standard_tables();
        let copy = tables.clients[0].clone();
        tables.clients.push(copy);
        let json = serde_json::to_vec(&tables).expect("tables serialize");

        match parse_tables(json.as_slice()) {
            Err(ImportError::DuplicateKey { table, key }) => {
                assert_eq!(table, "clients");
                assert_eq!(key, "petrobras");
            }
            other => panic!("expected duplicate key error, got {other:?}"),
        }
    }
}

//! Reference table import: JSON snapshots exported by the rules store and CSV
//! sheets of client rules maintained by procurement.

mod rule_sheet;
mod snapshot;

pub use rule_sheet::{apply_client_rules, parse_client_rules, ClientRuleRow};
pub use snapshot::{load_tables, parse_tables};

use thiserror::Error;

use super::domain::{FieldId, FieldValueKind};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read reference data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reference table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid client rule sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("{table} entry '{key}' references unknown field '{field}'")]
    UnknownField {
        table: &'static str,
        key: String,
        field: String,
    },
    #[error("client '{client}' uses unknown rule action '{action}'")]
    UnknownAction { client: String, action: String },
    #[error("client '{client}' rule for {field} expects a {expected:?} value, got '{value}'")]
    InvalidValue {
        client: String,
        field: FieldId,
        expected: FieldValueKind,
        value: String,
    },
    #[error("{table} declares '{key}' more than once")]
    DuplicateKey { table: &'static str, key: String },
}

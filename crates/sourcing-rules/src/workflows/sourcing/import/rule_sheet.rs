use std::io::Read;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::ImportError;
use crate::workflows::sourcing::domain::{
    ClientCode, ClientPolicy, ClientRule, FieldId, FieldValue, RuleAction,
};
use crate::workflows::sourcing::tables::ReferenceTables;

/// One row of a `client,field,action,value,justification,priority` sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRuleRow {
    pub client: String,
    pub field: String,
    pub action: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub justification: String,
    pub priority: u8,
}

impl ClientRuleRow {
    fn into_rule(self) -> Result<(ClientCode, ClientRule), ImportError> {
        let field = FieldId::from_code(&self.field).ok_or_else(|| ImportError::UnknownField {
            table: "client_rules",
            key: self.client.clone(),
            field: self.field.clone(),
        })?;
        let action =
            RuleAction::from_code(&self.action).ok_or_else(|| ImportError::UnknownAction {
                client: self.client.clone(),
                action: self.action.clone(),
            })?;

        let value = match self.value {
            Some(raw) => Some(FieldValue::parse(field.value_kind(), &raw).ok_or_else(|| {
                ImportError::InvalidValue {
                    client: self.client.clone(),
                    field,
                    expected: field.value_kind(),
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        Ok((
            ClientCode::new(self.client),
            ClientRule {
                field,
                action,
                value,
                justification: self.justification,
                priority: self.priority,
            },
        ))
    }
}

pub fn parse_client_rules<R: Read>(
    reader: R,
) -> Result<Vec<(ClientCode, ClientRule)>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rules = Vec::new();
    for row in csv_reader.deserialize::<ClientRuleRow>() {
        rules.push(row?.into_rule()?);
    }
    Ok(rules)
}

/// Appends sheet rules to their clients in sheet order. Unknown clients get an
/// empty policy named after their code.
pub fn apply_client_rules<R: Read>(
    tables: &mut ReferenceTables,
    reader: R,
) -> Result<usize, ImportError> {
    let rules = parse_client_rules(reader)?;
    let count = rules.len();

    for (client, rule) in rules {
        match tables.client_mut(client.as_str()) {
            Some(policy) => policy.rules.push(rule),
            None => {
                debug!(client = %client, "client rule sheet introduces a new client");
                tables.clients.push(ClientPolicy {
                    name: client.as_str().to_string(),
                    code: client,
                    rules: vec![rule],
                    fixed: None,
                });
            }
        }
    }

    Ok(count)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

use serde::Serialize;

use super::Resolution;
use crate::workflows::sourcing::domain::{
    ClientPolicy, ClientRule, EventTypeCode, FieldId, FieldValue, FixedConfiguration, RuleAction,
};
use crate::workflows::sourcing::tables::ReferenceTables;

pub fn resolve_client<'a>(
    tables: &'a ReferenceTables,
    code: Option<&str>,
) -> Resolution<ClientPolicyView<'a>> {
    Resolution::lookup(code, |code| tables.client(code).map(ClientPolicyView::new))
}

/// A field the UI must disable, with the value to show and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLock {
    pub field: FieldId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSuggestion {
    pub field: FieldId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    pub justification: String,
}

/// Read-only accessors over a resolved client policy.
///
/// When several rules target the same field the last declared one wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientPolicyView<'a> {
    policy: &'a ClientPolicy,
}

impl<'a> ClientPolicyView<'a> {
    pub fn new(policy: &'a ClientPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &'a ClientPolicy {
        self.policy
    }

    pub fn name(&self) -> &'a str {
        &self.policy.name
    }

    pub fn fixed(&self) -> Option<&'a FixedConfiguration> {
        self.policy.fixed.as_ref()
    }

    pub fn rule_for(&self, field: FieldId) -> Option<&'a ClientRule> {
        self.policy.rules.iter().rev().find(|rule| rule.field == field)
    }

    pub fn is_field_blocked(&self, field: FieldId) -> bool {
        self.rule_for(field)
            .map(|rule| rule.action.locks_field())
            .unwrap_or(false)
    }

    pub fn is_field_required(&self, field: FieldId) -> bool {
        self.rule_for(field)
            .map(|rule| rule.action == RuleAction::Require)
            .unwrap_or(false)
    }

    pub fn is_field_hidden(&self, field: FieldId) -> bool {
        self.rule_for(field)
            .map(|rule| rule.action == RuleAction::Hide)
            .unwrap_or(false)
    }

    pub fn field_fixed_value(&self, field: FieldId) -> Option<&'a FieldValue> {
        self.rule_for(field).and_then(|rule| rule.value.as_ref())
    }

    pub fn field_justification(&self, field: FieldId) -> Option<&'a str> {
        self.rule_for(field).map(|rule| rule.justification.as_str())
    }

    /// Effective rules (one per field) sorted by ascending priority rank.
    pub fn active_rules(&self) -> Vec<&'a ClientRule> {
        let mut rules: Vec<&'a ClientRule> = self
            .policy
            .rules
            .iter()
            .enumerate()
            .filter(|(index, rule)| {
                !self.policy.rules[index + 1..]
                    .iter()
                    .any(|later| later.field == rule.field)
            })
            .map(|(_, rule)| rule)
            .collect();
        rules.sort_by_key(|rule| rule.priority);
        rules
    }

    fn effective_fields(&self, action: RuleAction) -> impl Iterator<Item = FieldId> + 'a {
        let view = *self;
        let policy = self.policy;
        policy
            .rules
            .iter()
            .map(|rule| rule.field)
            .filter(move |field| {
                view.rule_for(*field)
                    .map(|rule| rule.action == action)
                    .unwrap_or(false)
            })
    }

    /// Fields the client demands: `require` rules plus the fixed mandatory documents.
    pub fn required_fields(&self) -> Vec<FieldId> {
        let mut fields: Vec<FieldId> = self.effective_fields(RuleAction::Require).collect();
        if let Some(fixed) = self.fixed() {
            fields.extend(fixed.mandatory_documents.iter().copied());
        }
        fields.sort();
        fields.dedup();
        fields
    }

    pub fn blocked_fields(&self) -> Vec<FieldId> {
        let mut fields: Vec<FieldId> = self
            .effective_fields(RuleAction::Block)
            .chain(self.effective_fields(RuleAction::ForceValue))
            .collect();
        if let Some(fixed) = self.fixed() {
            fields.extend(fixed.blocked_fields.iter().copied());
        }
        fields.sort();
        fields.dedup();
        fields
    }

    /// Locks in priority order; fixed blocked fields without a rule come last.
    pub fn field_locks(&self) -> Vec<FieldLock> {
        let mut locks: Vec<FieldLock> = self
            .active_rules()
            .into_iter()
            .filter(|rule| rule.action.locks_field())
            .map(|rule| FieldLock {
                field: rule.field,
                value: rule.value.clone(),
                justification: rule.justification.clone(),
            })
            .collect();

        if let Some(fixed) = self.fixed() {
            for field in &fixed.blocked_fields {
                if !locks.iter().any(|lock| lock.field == *field) {
                    locks.push(FieldLock {
                        field: *field,
                        value: None,
                        justification: format!("Locked by {} policy", self.policy.name),
                    });
                }
            }
        }

        locks
    }

    pub fn suggestions(&self) -> Vec<FieldSuggestion> {
        self.active_rules()
            .into_iter()
            .filter(|rule| rule.action == RuleAction::Suggest)
            .map(|rule| FieldSuggestion {
                field: rule.field,
                value: rule.value.clone(),
                justification: rule.justification.clone(),
            })
            .collect()
    }

    /// Event type the client imposes, from the fixed block or a locking rule.
    pub fn locked_event_type(&self) -> Option<EventTypeCode> {
        self.fixed()
            .and_then(|fixed| fixed.event_type)
            .or_else(|| match self.rule_for(FieldId::EventType) {
                Some(ClientRule {
                    action,
                    value: Some(FieldValue::EventType(code)),
                    ..
                }) if action.locks_field() => Some(*code),
                _ => None,
            })
    }

    pub fn prohibits_auction(&self) -> bool {
        if self.fixed().map(FixedConfiguration::prohibits_auction) == Some(true) {
            return true;
        }

        matches!(
            self.rule_for(FieldId::AuctionEnabled),
            Some(ClientRule {
                action,
                value: Some(FieldValue::Flag(false)),
                ..
            }) if action.locks_field()
        )
    }

    pub fn min_technical_weight(&self) -> Option<u8> {
        self.fixed().and_then(|fixed| fixed.min_technical_weight)
    }

    pub fn min_response_days(&self) -> Option<u32> {
        self.fixed().and_then(|fixed| fixed.min_response_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sourcing::catalog::standard_tables;
    use crate::workflows::sourcing::domain::ClientCode;

    fn rule(field: FieldId, action: RuleAction, justification: &str, priority: u8) -> ClientRule {
        ClientRule {
            field,
            action,
            value: None,
            justification: justification.to_string(),
            priority,
        }
    }

    fn policy_with(rules: Vec<ClientRule>) -> ClientPolicy {
        ClientPolicy {
            code: ClientCode::new("acme"),
            name: "Acme".to_string(),
            rules,
            fixed: None,
        }
    }

    #[test]
    fn accessors_reflect_petrobras_policy() {
        let tables = standard_tables();
        let view = resolve_client(&tables, Some("petrobras"))
            .found()
            .expect("petrobras catalogued");

        assert!(view.is_field_blocked(FieldId::EventType));
        assert!(view.is_field_blocked(FieldId::AuctionEnabled));
        assert!(view.is_field_required(FieldId::SafetyCertificate));
        assert!(view.is_field_hidden(FieldId::Samples));
        assert!(!view.is_field_required(FieldId::Samples));
        assert_eq!(
            view.field_fixed_value(FieldId::EventType),
            Some(&FieldValue::EventType(EventTypeCode::Rfp))
        );
        assert!(view
            .field_justification(FieldId::AuctionEnabled)
            .expect("justified")
            .contains("prohibited"));
        assert_eq!(view.field_fixed_value(FieldId::Scope), None);
        assert_eq!(view.locked_event_type(), Some(EventTypeCode::Rfp));
        assert!(view.prohibits_auction());
    }

    #[test]
    fn last_declared_rule_wins_for_duplicate_fields() {
        let policy = policy_with(vec![
            rule(FieldId::Samples, RuleAction::Require, "first", 1),
            rule(FieldId::Scope, RuleAction::Require, "scope", 2),
            rule(FieldId::Samples, RuleAction::Hide, "second", 5),
        ]);
        let view = ClientPolicyView::new(&policy);

        assert!(view.is_field_hidden(FieldId::Samples));
        assert!(!view.is_field_required(FieldId::Samples));
        assert_eq!(view.field_justification(FieldId::Samples), Some("second"));
        assert_eq!(view.required_fields(), vec![FieldId::Scope]);

        let active: Vec<&str> = view
            .active_rules()
            .iter()
            .map(|rule| rule.justification.as_str())
            .collect();
        assert_eq!(active, vec!["scope", "second"]);
    }

    #[test]
    fn active_rules_sort_by_priority_keeping_declaration_order_for_ties() {
        let policy = policy_with(vec![
            rule(FieldId::Warranty, RuleAction::Require, "warranty", 3),
            rule(FieldId::Insurance, RuleAction::Require, "insurance", 1),
            rule(FieldId::Schedule, RuleAction::Suggest, "schedule", 3),
        ]);
        let view = ClientPolicyView::new(&policy);

        let ordered: Vec<FieldId> = view.active_rules().iter().map(|rule| rule.field).collect();
        assert_eq!(
            ordered,
            vec![FieldId::Insurance, FieldId::Warranty, FieldId::Schedule]
        );
    }

    #[test]
    fn field_locks_carry_values_and_fixed_blocked_fields() {
        let tables = standard_tables();
        let vale = resolve_client(&tables, Some("vale"))
            .found()
            .expect("vale catalogued");

        let locks = vale.field_locks();
        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].field, FieldId::ProposalGuarantee);
        assert_eq!(locks[0].value, Some(FieldValue::Percent(5)));
        assert!(!vale.prohibits_auction());
        assert_eq!(vale.locked_event_type(), None);
        assert_eq!(vale.suggestions().len(), 1);
    }
}

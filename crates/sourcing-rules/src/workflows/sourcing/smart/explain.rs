use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::sourcing::domain::{
    AuctionPolicy, CategoryConfig, EventTypeCode, FieldId, SectorConfig, WeightSplit,
};
use crate::workflows::sourcing::resolvers::{ClientPolicyView, DepartmentView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// Which reference source contributed a value or raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "setor")]
    Sector,
    #[serde(rename = "categoria")]
    Category,
    #[serde(rename = "cliente")]
    Client,
    #[serde(rename = "departamento")]
    Department,
}

impl Origin {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sector => "setor",
            Self::Category => "categoria",
            Self::Client => "cliente",
            Self::Department => "departamento",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Part of the recommendation a rule touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    EventType,
    Auction,
    Weights,
    RequiredFields,
    HiddenFields,
    BlockedFields,
    Criteria,
    ResponseDeadline,
    Approval,
    Mandate,
}

/// Audit trail entry: who contributed what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub origin: Origin,
    pub aspect: Aspect,
    pub description: String,
}

impl fmt::Display for AppliedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.origin, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub origin: Origin,
    pub aspect: Aspect,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldId>,
}

fn field_list(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(|field| field.code())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collects the audit trail and alerts in the order merge steps run.
#[derive(Debug, Default)]
pub(crate) struct Explanations {
    applied: Vec<AppliedRule>,
    alerts: Vec<Alert>,
}

impl Explanations {
    pub(crate) fn into_parts(self) -> (Vec<AppliedRule>, Vec<Alert>) {
        (self.applied, self.alerts)
    }

    fn record(&mut self, origin: Origin, aspect: Aspect, description: String) {
        self.applied.push(AppliedRule {
            origin,
            aspect,
            description,
        });
    }

    fn alert(&mut self, severity: Severity, origin: Origin, aspect: Aspect, message: String) {
        self.alerts.push(Alert {
            severity,
            origin,
            aspect,
            message,
            field: None,
        });
    }

    pub(crate) fn sector_event_type(&mut self, sector: &SectorConfig) {
        let event = sector.suggested_event_type;
        self.record(
            Origin::Sector,
            Aspect::EventType,
            format!("Sector {} suggests {}", sector.name, event.label()),
        );
        self.alert(
            Severity::Info,
            Origin::Sector,
            Aspect::EventType,
            format!("{} is the usual event type for {}", event.label(), sector.name),
        );
    }

    pub(crate) fn category_event_type(
        &mut self,
        category: &CategoryConfig,
        previous: EventTypeCode,
        suggested: EventTypeCode,
    ) {
        self.record(
            Origin::Category,
            Aspect::EventType,
            format!("Category {} sets {}", category.name, suggested.label()),
        );
        if previous != suggested {
            self.alert(
                Severity::Warning,
                Origin::Category,
                Aspect::EventType,
                format!(
                    "Category {} replaced {} with {}",
                    category.name,
                    previous.label(),
                    suggested.label()
                ),
            );
        }
    }

    pub(crate) fn client_event_type(
        &mut self,
        client: &ClientPolicyView<'_>,
        previous: EventTypeCode,
        locked: EventTypeCode,
    ) {
        let reason = client
            .field_justification(FieldId::EventType)
            .map(|reason| format!(": {reason}"))
            .unwrap_or_default();
        self.record(
            Origin::Client,
            Aspect::EventType,
            format!("Client {} locks {}{}", client.name(), locked.label(), reason),
        );
        if previous != locked {
            self.alert(
                Severity::Warning,
                Origin::Client,
                Aspect::EventType,
                format!(
                    "{} policy requires {} instead of {}{}",
                    client.name(),
                    locked.label(),
                    previous.label(),
                    reason
                ),
            );
        }
    }

    pub(crate) fn client_prohibits_auction(&mut self, client: &ClientPolicyView<'_>) {
        self.record(
            Origin::Client,
            Aspect::Auction,
            format!("Client {} prohibits auctions", client.name()),
        );
        let reason = client
            .field_justification(FieldId::AuctionEnabled)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} does not allow reverse auctions", client.name()));
        self.alert(Severity::Warning, Origin::Client, Aspect::Auction, reason);
    }

    pub(crate) fn sector_disables_auction(&mut self, sector: &SectorConfig) {
        self.record(
            Origin::Sector,
            Aspect::Auction,
            format!("Sector {} disables auctions", sector.name),
        );
        self.alert(
            Severity::Info,
            Origin::Sector,
            Aspect::Auction,
            format!("Auctions are not used in the {} sector", sector.name),
        );
    }

    pub(crate) fn category_disables_auction(&mut self, category: &CategoryConfig) {
        self.record(
            Origin::Category,
            Aspect::Auction,
            format!("Category {} disables auctions", category.name),
        );
        self.alert(
            Severity::Info,
            Origin::Category,
            Aspect::Auction,
            format!("Auctions are not used for {}", category.name),
        );
    }

    pub(crate) fn category_auction_timing(&mut self, category: &CategoryConfig, policy: AuctionPolicy) {
        self.record(
            Origin::Category,
            Aspect::Auction,
            format!("Category {} opens auctions {}", category.name, policy.label()),
        );
    }

    pub(crate) fn category_weights(&mut self, category: &CategoryConfig, weights: WeightSplit) {
        self.record(
            Origin::Category,
            Aspect::Weights,
            format!("Category {} weights technical/commercial {}", category.name, weights),
        );
    }

    pub(crate) fn sector_weight_floor(&mut self, sector: &SectorConfig, weights: WeightSplit) {
        self.record(
            Origin::Sector,
            Aspect::Weights,
            format!("Sector {} raises technical weight to {}", sector.name, weights),
        );
    }

    pub(crate) fn client_weight_floor(
        &mut self,
        client: &ClientPolicyView<'_>,
        previous: WeightSplit,
        weights: WeightSplit,
    ) {
        self.record(
            Origin::Client,
            Aspect::Weights,
            format!(
                "Client {} minimum technical weight {}%",
                client.name(),
                weights.technical
            ),
        );
        self.alert(
            Severity::Warning,
            Origin::Client,
            Aspect::Weights,
            format!(
                "{} requires at least {}% technical weight; split changed from {} to {}",
                client.name(),
                weights.technical,
                previous,
                weights
            ),
        );
    }

    pub(crate) fn required_fields(&mut self, origin: Origin, source: &str, added: &[FieldId]) {
        if added.is_empty() {
            return;
        }
        self.record(
            origin,
            Aspect::RequiredFields,
            format!("{source} requires {}", field_list(added)),
        );
    }

    pub(crate) fn hidden_fields(&mut self, sector: &SectorConfig, hidden: &[FieldId]) {
        if hidden.is_empty() {
            return;
        }
        self.record(
            Origin::Sector,
            Aspect::HiddenFields,
            format!("Sector {} hides {}", sector.name, field_list(hidden)),
        );
    }

    pub(crate) fn required_but_hidden(&mut self, sector: &SectorConfig, field: FieldId) {
        self.alerts.push(Alert {
            severity: Severity::Error,
            origin: Origin::Sector,
            aspect: Aspect::HiddenFields,
            message: format!(
                "Field {} is required but hidden by sector {}; review the reference tables",
                field, sector.name
            ),
            field: Some(field),
        });
    }

    pub(crate) fn blocked_fields(&mut self, client: &ClientPolicyView<'_>, blocked: &[FieldId]) {
        if blocked.is_empty() {
            return;
        }
        self.record(
            Origin::Client,
            Aspect::BlockedFields,
            format!("Client {} locks {}", client.name(), field_list(blocked)),
        );
    }

    pub(crate) fn category_criteria(&mut self, category: &CategoryConfig) {
        if category.evaluation_criteria.is_empty() && category.validations.is_empty() {
            return;
        }
        self.record(
            Origin::Category,
            Aspect::Criteria,
            format!(
                "Category {} supplies {} criteria and {} validations",
                category.name,
                category.evaluation_criteria.len(),
                category.validations.len()
            ),
        );
    }

    pub(crate) fn department_deadline(&mut self, department: &DepartmentView<'_>, days: u32) {
        self.record(
            Origin::Department,
            Aspect::ResponseDeadline,
            format!(
                "Department {} starts the response window at {days} days",
                department.template().name
            ),
        );
    }

    pub(crate) fn category_deadline(&mut self, category: &CategoryConfig, from: u32, to: u32) {
        self.record(
            Origin::Category,
            Aspect::ResponseDeadline,
            format!(
                "Category {} keeps the response window within {}-{} days ({from} -> {to})",
                category.name, category.min_response_days, category.max_response_days
            ),
        );
    }

    pub(crate) fn client_deadline(&mut self, client: &ClientPolicyView<'_>, from: u32, to: u32) {
        self.record(
            Origin::Client,
            Aspect::ResponseDeadline,
            format!("Client {} minimum response window {to} days", client.name()),
        );
        self.alert(
            Severity::Info,
            Origin::Client,
            Aspect::ResponseDeadline,
            format!(
                "{} requires at least {to} days for responses (was {from})",
                client.name()
            ),
        );
    }

    pub(crate) fn department_approval(&mut self, department: &DepartmentView<'_>) {
        let template = department.template();
        let quotes = if template.multiple_quotes_required {
            "; multiple competing quotes required"
        } else {
            ""
        };
        self.record(
            Origin::Department,
            Aspect::Approval,
            format!(
                "Department {} approval threshold BRL {}{}",
                template.name, template.approval_threshold, quotes
            ),
        );
    }

    pub(crate) fn outside_mandate(&mut self, department: &DepartmentView<'_>, what: &str, code: &str) {
        self.alert(
            Severity::Warning,
            Origin::Department,
            Aspect::Mandate,
            format!(
                "{what} {code} is outside the mandate of department {}",
                department.template().name
            ),
        );
    }

    pub(crate) fn category_outside_sector(&mut self, category: &CategoryConfig, sector: &SectorConfig) {
        let owner = category
            .sector
            .as_ref()
            .map(|code| code.as_str())
            .unwrap_or("no sector");
        self.alert(
            Severity::Warning,
            Origin::Category,
            Aspect::Mandate,
            format!(
                "Category {} is catalogued under {owner}, not {}",
                category.name, sector.code
            ),
        );
    }
}

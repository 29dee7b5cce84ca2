mod engine;
mod explain;
mod merge;

pub use engine::SmartRulesEngine;
pub use explain::{Alert, AppliedRule, Aspect, Origin, Severity};
pub use merge::aggregate;

use serde::{Deserialize, Serialize};

use super::domain::{
    AcquisitionNature, AuctionPolicy, DepartmentCode, EvaluationMode, EventTypeCode, FieldId,
    FieldSet, PriceStructure, WeightSplit,
};
use super::resolvers::{FieldLock, FieldSuggestion};

/// Approval routing data contributed by the requesting department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalGuidance {
    pub department: DepartmentCode,
    pub approval_threshold: u64,
    pub multiple_quotes_required: bool,
}

/// Final merged configuration driving form defaults, visibility and validation.
///
/// Derived and ephemeral: recomputed whenever the selection changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartRecommendation {
    pub event_type: EventTypeCode,
    pub event_focus: String,
    pub evaluation_mode: EvaluationMode,
    pub price_structure: PriceStructure,
    pub comparison_enabled: bool,
    pub acquisition_nature: AcquisitionNature,
    pub auction_allowed: bool,
    pub auction_policy: AuctionPolicy,
    pub weights: WeightSplit,
    pub response_days: u32,
    pub required_fields: FieldSet,
    pub hidden_fields: FieldSet,
    pub blocked_fields: FieldSet,
    pub field_locks: Vec<FieldLock>,
    pub suggestions: Vec<FieldSuggestion>,
    pub evaluation_criteria: Vec<String>,
    pub validations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalGuidance>,
    pub applied_rules: Vec<AppliedRule>,
    pub alerts: Vec<Alert>,
}

impl SmartRecommendation {
    pub fn alerts_from(&self, origin: Origin) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |alert| alert.origin == origin)
    }

    pub fn rules_for(&self, aspect: Aspect) -> impl Iterator<Item = &AppliedRule> {
        self.applied_rules
            .iter()
            .filter(move |rule| rule.aspect == aspect)
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.alerts.iter().map(|alert| alert.severity).max()
    }

    pub fn is_required(&self, field: FieldId) -> bool {
        self.required_fields.contains(&field)
    }
}

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! code_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

code_newtype!(
    /// Broad industry classification key, e.g. `industria`.
    SectorCode
);
code_newtype!(
    /// Finer-grained classification key, e.g. `consultoria_estrategica`.
    CategoryCode
);
code_newtype!(
    /// Organization key for client-specific policy.
    ClientCode
);
code_newtype!(
    /// Requesting department key.
    DepartmentCode
);

/// Sourcing event archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTypeCode {
    Rfi,
    Rfp,
    Rfq,
    Leilao,
}

impl EventTypeCode {
    pub const fn ordered() -> [Self; 4] {
        [Self::Rfi, Self::Rfp, Self::Rfq, Self::Leilao]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Rfi => "rfi",
            Self::Rfp => "rfp",
            Self::Rfq => "rfq",
            Self::Leilao => "leilao",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rfi => "Request for Information (RFI)",
            Self::Rfp => "Request for Proposal (RFP)",
            Self::Rfq => "Request for Quotation (RFQ)",
            Self::Leilao => "Reverse Auction",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|candidate| candidate.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for EventTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionNature {
    Bens,
    Servicos,
    Misto,
}

impl AcquisitionNature {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bens => "Goods",
            Self::Servicos => "Services",
            Self::Misto => "Goods and services",
        }
    }
}

/// When, if ever, an auction round may be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionPolicy {
    /// Auction may open immediately.
    Direto,
    /// Auction only after the technical review closes.
    PosTecnica,
    Desabilitado,
}

impl AuctionPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Direto => "immediate",
            Self::PosTecnica => "after technical review",
            Self::Desabilitado => "disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceStructure {
    None,
    SingleTotal,
    PerItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    Manual,
    TechnicalCommercial,
    LowestPrice,
    LiveAuction,
}

/// Technical-vs-commercial scoring proportion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightSplit {
    pub technical: u8,
    pub commercial: u8,
}

impl WeightSplit {
    /// Builds a split whose commercial share is derived, so the pair always sums to 100.
    pub fn with_technical(technical: u8) -> Self {
        let technical = technical.min(100);
        Self {
            technical,
            commercial: 100 - technical,
        }
    }

    pub fn total(&self) -> u16 {
        self.technical as u16 + self.commercial as u16
    }

    pub fn is_balanced(&self) -> bool {
        self.total() == 100
    }
}

impl fmt::Display for WeightSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.technical, self.commercial)
    }
}

/// The shape a field's value takes when a rule fixes or suggests it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValueKind {
    EventType,
    Flag,
    Percent,
    Days,
    Text,
}

/// Typed value attached to a client rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    EventType(EventTypeCode),
    Flag(bool),
    Percent(u8),
    Days(u32),
    Text(String),
}

impl FieldValue {
    pub const fn kind(&self) -> FieldValueKind {
        match self {
            Self::EventType(_) => FieldValueKind::EventType,
            Self::Flag(_) => FieldValueKind::Flag,
            Self::Percent(_) => FieldValueKind::Percent,
            Self::Days(_) => FieldValueKind::Days,
            Self::Text(_) => FieldValueKind::Text,
        }
    }

    /// Parses a raw cell according to the kind the target field expects.
    pub fn parse(kind: FieldValueKind, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match kind {
            FieldValueKind::EventType => EventTypeCode::from_code(trimmed).map(Self::EventType),
            FieldValueKind::Flag => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "sim" | "1" => Some(Self::Flag(true)),
                "false" | "no" | "nao" | "não" | "0" => Some(Self::Flag(false)),
                _ => None,
            },
            FieldValueKind::Percent => trimmed
                .parse::<u8>()
                .ok()
                .filter(|value| *value <= 100)
                .map(Self::Percent),
            FieldValueKind::Days => trimmed.parse::<u32>().ok().map(Self::Days),
            FieldValueKind::Text => (!trimmed.is_empty()).then(|| Self::Text(trimmed.to_string())),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventType(code) => write!(f, "{code}"),
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Percent(value) => write!(f, "{value}%"),
            Self::Days(days) => write!(f, "{days} days"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

macro_rules! field_ids {
    ($($variant:ident => ($code:literal, $kind:ident)),+ $(,)?) => {
        /// Closed set of sourcing form fields that rules may reference.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum FieldId {
            $($variant),+
        }

        impl FieldId {
            pub const ALL: &'static [FieldId] = &[$(FieldId::$variant),+];

            pub const fn code(self) -> &'static str {
                match self {
                    $(FieldId::$variant => $code),+
                }
            }

            pub const fn value_kind(self) -> FieldValueKind {
                match self {
                    $(FieldId::$variant => FieldValueKind::$kind),+
                }
            }
        }
    };
}

field_ids! {
    UnitPrice => ("unit_price", Text),
    TotalPrice => ("total_price", Text),
    TechnicalProposal => ("technical_proposal", Text),
    TechnicalCriteria => ("technical_criteria", Text),
    Specifications => ("specifications", Text),
    Quantity => ("quantity", Text),
    DeliveryDeadline => ("delivery_deadline", Days),
    PaymentTerms => ("payment_terms", Text),
    Schedule => ("schedule", Text),
    CostBreakdown => ("cost_breakdown", Text),
    Samples => ("samples", Flag),
    SiteVisit => ("site_visit", Flag),
    Bids => ("bids", Text),
    TechnicalCapabilityCertificate => ("technical_capability_certificate", Text),
    RegulatoryRegistration => ("regulatory_registration", Text),
    EnvironmentalLicense => ("environmental_license", Text),
    SafetyCertificate => ("safety_certificate", Text),
    SupplierRegistration => ("supplier_registration", Text),
    ProposalGuarantee => ("proposal_guarantee", Percent),
    Insurance => ("insurance", Text),
    Warranty => ("warranty", Days),
    ServiceLevelAgreement => ("service_level_agreement", Text),
    Scope => ("scope", Text),
    Questionnaire => ("questionnaire", Text),
    CompanyProfile => ("company_profile", Text),
    EventType => ("event_type", EventType),
    AuctionEnabled => ("auction_enabled", Flag),
    TechnicalWeight => ("technical_weight", Percent),
    CommercialWeight => ("commercial_weight", Percent),
    ResponseDeadline => ("response_deadline", Days),
}

impl FieldId {
    /// Exact snake_case match, the same spelling serde accepts.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.code() == code)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub type FieldSet = BTreeSet<FieldId>;

/// Intrinsic defaults of one event archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTypeConfig {
    pub code: EventTypeCode,
    pub allows_price: bool,
    pub allows_technical: bool,
    pub allows_auction: bool,
    pub required_fields: FieldSet,
    pub default_weights: WeightSplit,
    pub price_structure: PriceStructure,
    pub evaluation_mode: EvaluationMode,
    pub comparison: bool,
    pub default_response_days: u32,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorConfig {
    pub code: SectorCode,
    pub name: String,
    pub suggested_event_type: EventTypeCode,
    pub acquisition_nature: AcquisitionNature,
    pub auction_policy: AuctionPolicy,
    #[serde(default)]
    pub required_fields: FieldSet,
    #[serde(default)]
    pub hidden_fields: FieldSet,
    /// The technical share acts as a floor when no category refines the split.
    #[serde(default)]
    pub default_weights: Option<WeightSplit>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub code: CategoryCode,
    pub name: String,
    #[serde(default)]
    pub sector: Option<SectorCode>,
    #[serde(default)]
    pub suggested_event_type: Option<EventTypeCode>,
    #[serde(default)]
    pub required_fields: FieldSet,
    #[serde(default)]
    pub hidden_fields: FieldSet,
    #[serde(default)]
    pub evaluation_criteria: Vec<String>,
    #[serde(default)]
    pub auction_override: Option<AuctionPolicy>,
    #[serde(default)]
    pub weights: Option<WeightSplit>,
    #[serde(default)]
    pub validations: Vec<String>,
    pub min_response_days: u32,
    pub max_response_days: u32,
}

impl CategoryConfig {
    pub fn belongs_to(&self, sector: &str) -> bool {
        self.sector
            .as_ref()
            .map(|own| own.as_str() == sector)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Require,
    Hide,
    Block,
    Suggest,
    ForceValue,
}

impl RuleAction {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Require => "require",
            Self::Hide => "hide",
            Self::Block => "block",
            Self::Suggest => "suggest",
            Self::ForceValue => "force_value",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [
            Self::Require,
            Self::Hide,
            Self::Block,
            Self::Suggest,
            Self::ForceValue,
        ]
        .into_iter()
        .find(|action| action.code() == code)
    }

    pub const fn locks_field(self) -> bool {
        matches!(self, Self::Block | Self::ForceValue)
    }
}

/// One client-specific constraint on a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRule {
    pub field: FieldId,
    pub action: RuleAction,
    #[serde(default)]
    pub value: Option<FieldValue>,
    pub justification: String,
    /// Lower ranks take precedence.
    pub priority: u8,
}

/// Policy applied on every recommendation for the client, regardless of rule priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedConfiguration {
    #[serde(default)]
    pub event_type: Option<EventTypeCode>,
    #[serde(default)]
    pub auction_allowed: Option<bool>,
    #[serde(default)]
    pub min_technical_weight: Option<u8>,
    #[serde(default)]
    pub min_response_days: Option<u32>,
    #[serde(default)]
    pub mandatory_documents: Vec<FieldId>,
    #[serde(default)]
    pub blocked_fields: Vec<FieldId>,
}

impl FixedConfiguration {
    pub fn prohibits_auction(&self) -> bool {
        self.auction_allowed == Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPolicy {
    pub code: ClientCode,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<ClientRule>,
    #[serde(default)]
    pub fixed: Option<FixedConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDefaults {
    #[serde(default)]
    pub response_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentTemplate {
    pub code: DepartmentCode,
    pub name: String,
    #[serde(default)]
    pub defaults: DepartmentDefaults,
    #[serde(default)]
    pub allowed_sectors: Vec<SectorCode>,
    #[serde(default)]
    pub allowed_categories: Vec<CategoryCode>,
    /// Spend above this amount (BRL) needs a second approval level.
    pub approval_threshold: u64,
    pub multiple_quotes_required: bool,
}

/// Optional codes identifying what the user picked on the sourcing form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl Selection {
    pub fn sector(code: impl Into<String>) -> Self {
        Self::default().with_sector(code)
    }

    pub fn with_sector(mut self, code: impl Into<String>) -> Self {
        self.sector = Some(code.into());
        self
    }

    pub fn with_category(mut self, code: impl Into<String>) -> Self {
        self.category = Some(code.into());
        self
    }

    pub fn with_client(mut self, code: impl Into<String>) -> Self {
        self.client = Some(code.into());
        self
    }

    pub fn with_department(mut self, code: impl Into<String>) -> Self {
        self.department = Some(code.into());
        self
    }

    /// Trims every code and drops blanks so equivalent selections compare equal.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
        }

        Self {
            sector: clean(&self.sector),
            category: clean(&self.category),
            client: clean(&self.client),
            department: clean(&self.department),
        }
    }

    pub fn is_empty(&self) -> bool {
        let normalized = self.normalized();
        normalized.sector.is_none()
            && normalized.category.is_none()
            && normalized.client.is_none()
            && normalized.department.is_none()
    }
}

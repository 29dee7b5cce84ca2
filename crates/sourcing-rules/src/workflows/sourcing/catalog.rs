use super::domain::{
    AcquisitionNature, AuctionPolicy, CategoryCode, CategoryConfig, ClientCode, ClientPolicy,
    ClientRule, DepartmentCode, DepartmentDefaults, DepartmentTemplate, EvaluationMode,
    EventTypeCode, EventTypeConfig, FieldId, FieldSet, FieldValue, FixedConfiguration,
    PriceStructure, RuleAction, SectorCode, SectorConfig, WeightSplit,
};
use super::tables::ReferenceTables;

/// Built-in reference tables used when no external snapshot is configured.
pub fn standard_tables() -> ReferenceTables {
    ReferenceTables {
        event_types: standard_event_types(),
        sectors: standard_sectors(),
        categories: standard_categories(),
        clients: standard_clients(),
        departments: standard_departments(),
    }
}

/// Intrinsic defaults for an event archetype, used when a loaded snapshot omits it.
pub fn event_type_defaults(code: EventTypeCode) -> EventTypeConfig {
    standard_event_types()
        .into_iter()
        .find(|config| config.code == code)
        .unwrap_or_else(rfi)
}

fn fields(ids: &[FieldId]) -> FieldSet {
    ids.iter().copied().collect()
}

fn criteria(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn standard_event_types() -> Vec<EventTypeConfig> {
    vec![
        rfi(),
        EventTypeConfig {
            code: EventTypeCode::Rfp,
            allows_price: true,
            allows_technical: true,
            allows_auction: false,
            required_fields: fields(&[
                FieldId::Scope,
                FieldId::TechnicalProposal,
                FieldId::TechnicalCriteria,
                FieldId::TotalPrice,
                FieldId::Schedule,
            ]),
            default_weights: WeightSplit::with_technical(70),
            price_structure: PriceStructure::SingleTotal,
            evaluation_mode: EvaluationMode::TechnicalCommercial,
            comparison: true,
            default_response_days: 15,
            focus: "Solution design and technical merit weighed against total cost".to_string(),
        },
        EventTypeConfig {
            code: EventTypeCode::Rfq,
            allows_price: true,
            allows_technical: true,
            allows_auction: true,
            required_fields: fields(&[
                FieldId::Specifications,
                FieldId::Quantity,
                FieldId::UnitPrice,
                FieldId::DeliveryDeadline,
            ]),
            default_weights: WeightSplit::with_technical(20),
            price_structure: PriceStructure::PerItem,
            evaluation_mode: EvaluationMode::LowestPrice,
            comparison: true,
            default_response_days: 7,
            focus: "Price per line item for a well-specified demand".to_string(),
        },
        EventTypeConfig {
            code: EventTypeCode::Leilao,
            allows_price: true,
            allows_technical: false,
            allows_auction: true,
            required_fields: fields(&[
                FieldId::Specifications,
                FieldId::Quantity,
                FieldId::UnitPrice,
                FieldId::Bids,
            ]),
            default_weights: WeightSplit::with_technical(0),
            price_structure: PriceStructure::PerItem,
            evaluation_mode: EvaluationMode::LiveAuction,
            comparison: false,
            default_response_days: 3,
            focus: "Live downward bidding on commoditized items".to_string(),
        },
    ]
}

fn rfi() -> EventTypeConfig {
    EventTypeConfig {
        code: EventTypeCode::Rfi,
        allows_price: false,
        allows_technical: false,
        allows_auction: false,
        required_fields: fields(&[
            FieldId::Scope,
            FieldId::Questionnaire,
            FieldId::CompanyProfile,
        ]),
        default_weights: WeightSplit::with_technical(100),
        price_structure: PriceStructure::None,
        evaluation_mode: EvaluationMode::Manual,
        comparison: false,
        default_response_days: 10,
        focus: "Market sounding and supplier capability mapping".to_string(),
    }
}

fn standard_sectors() -> Vec<SectorConfig> {
    vec![
        SectorConfig {
            code: SectorCode::new("industria"),
            name: "Industrial".to_string(),
            suggested_event_type: EventTypeCode::Rfq,
            acquisition_nature: AcquisitionNature::Bens,
            auction_policy: AuctionPolicy::Direto,
            required_fields: fields(&[FieldId::Specifications, FieldId::Quantity]),
            hidden_fields: FieldSet::new(),
            default_weights: None,
            notes: "Standardized inputs bought on price; auctions may open right away.".to_string(),
        },
        SectorConfig {
            code: SectorCode::new("servicos_gerais"),
            name: "General services".to_string(),
            suggested_event_type: EventTypeCode::Rfp,
            acquisition_nature: AcquisitionNature::Servicos,
            auction_policy: AuctionPolicy::PosTecnica,
            required_fields: fields(&[FieldId::Scope, FieldId::ServiceLevelAgreement]),
            hidden_fields: fields(&[FieldId::Samples]),
            default_weights: Some(WeightSplit::with_technical(60)),
            notes: "Service quality drives the award; price rounds only after technical review."
                .to_string(),
        },
        SectorConfig {
            code: SectorCode::new("construcao"),
            name: "Construction".to_string(),
            suggested_event_type: EventTypeCode::Rfp,
            acquisition_nature: AcquisitionNature::Misto,
            auction_policy: AuctionPolicy::PosTecnica,
            required_fields: fields(&[
                FieldId::TechnicalCapabilityCertificate,
                FieldId::Insurance,
                FieldId::Schedule,
            ]),
            hidden_fields: fields(&[FieldId::Samples]),
            default_weights: Some(WeightSplit::with_technical(50)),
            notes: "Works need proven capability and a physical-financial schedule.".to_string(),
        },
        SectorConfig {
            code: SectorCode::new("saude"),
            name: "Healthcare".to_string(),
            suggested_event_type: EventTypeCode::Rfq,
            acquisition_nature: AcquisitionNature::Bens,
            auction_policy: AuctionPolicy::Desabilitado,
            required_fields: fields(&[FieldId::RegulatoryRegistration]),
            hidden_fields: fields(&[FieldId::Bids]),
            default_weights: Some(WeightSplit::with_technical(40)),
            notes: "Regulated items; sanitary registration is checked before price.".to_string(),
        },
        SectorConfig {
            code: SectorCode::new("tecnologia"),
            name: "Technology".to_string(),
            suggested_event_type: EventTypeCode::Rfp,
            acquisition_nature: AcquisitionNature::Servicos,
            auction_policy: AuctionPolicy::PosTecnica,
            required_fields: fields(&[FieldId::ServiceLevelAgreement]),
            hidden_fields: fields(&[FieldId::Samples, FieldId::SiteVisit]),
            default_weights: Some(WeightSplit::with_technical(60)),
            notes: String::new(),
        },
        SectorConfig {
            code: SectorCode::new("logistica"),
            name: "Logistics".to_string(),
            suggested_event_type: EventTypeCode::Rfq,
            acquisition_nature: AcquisitionNature::Servicos,
            auction_policy: AuctionPolicy::Direto,
            required_fields: fields(&[FieldId::DeliveryDeadline]),
            hidden_fields: fields(&[FieldId::Samples]),
            default_weights: None,
            notes: "Lane pricing; freight auctions are common.".to_string(),
        },
    ]
}

fn standard_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig {
            code: CategoryCode::new("consultoria_estrategica"),
            name: "Strategic consulting".to_string(),
            sector: Some(SectorCode::new("servicos_gerais")),
            suggested_event_type: Some(EventTypeCode::Rfp),
            required_fields: fields(&[FieldId::TechnicalProposal]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: criteria(&["Methodology", "Team seniority", "Sector references"]),
            auction_override: None,
            weights: Some(WeightSplit::with_technical(80)),
            validations: criteria(&["portfolio_review"]),
            min_response_days: 15,
            max_response_days: 30,
        },
        CategoryConfig {
            code: CategoryCode::new("limpeza_predial"),
            name: "Facility cleaning".to_string(),
            sector: Some(SectorCode::new("servicos_gerais")),
            suggested_event_type: Some(EventTypeCode::Rfq),
            required_fields: fields(&[FieldId::SiteVisit, FieldId::CostBreakdown]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: criteria(&["Staffing plan", "Price per square meter"]),
            auction_override: None,
            weights: Some(WeightSplit::with_technical(30)),
            validations: criteria(&["labor_compliance_certificate"]),
            min_response_days: 5,
            max_response_days: 15,
        },
        CategoryConfig {
            code: CategoryCode::new("manutencao_industrial"),
            name: "Industrial maintenance".to_string(),
            sector: Some(SectorCode::new("industria")),
            suggested_event_type: Some(EventTypeCode::Rfp),
            required_fields: fields(&[FieldId::SiteVisit, FieldId::SafetyCertificate]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: criteria(&["Response time", "Certified technicians"]),
            auction_override: None,
            weights: Some(WeightSplit::with_technical(60)),
            validations: criteria(&["nr10_training_record"]),
            min_response_days: 10,
            max_response_days: 20,
        },
        CategoryConfig {
            code: CategoryCode::new("materia_prima"),
            name: "Raw materials".to_string(),
            sector: Some(SectorCode::new("industria")),
            suggested_event_type: Some(EventTypeCode::Leilao),
            required_fields: fields(&[FieldId::Samples]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: Vec::new(),
            auction_override: None,
            weights: None,
            validations: criteria(&["technical_datasheet"]),
            min_response_days: 2,
            max_response_days: 7,
        },
        CategoryConfig {
            code: CategoryCode::new("obras_civis"),
            name: "Civil works".to_string(),
            sector: Some(SectorCode::new("construcao")),
            suggested_event_type: Some(EventTypeCode::Rfp),
            required_fields: fields(&[FieldId::ProposalGuarantee, FieldId::CostBreakdown]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: criteria(&["Execution plan", "Similar works delivered"]),
            auction_override: None,
            weights: Some(WeightSplit::with_technical(60)),
            validations: criteria(&["crea_registration_mandatory"]),
            min_response_days: 20,
            max_response_days: 45,
        },
        CategoryConfig {
            code: CategoryCode::new("equipamentos_medicos"),
            name: "Medical equipment".to_string(),
            sector: Some(SectorCode::new("saude")),
            suggested_event_type: Some(EventTypeCode::Rfp),
            required_fields: fields(&[FieldId::Warranty]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: criteria(&["Clinical performance", "Service network"]),
            auction_override: Some(AuctionPolicy::Desabilitado),
            weights: Some(WeightSplit::with_technical(70)),
            validations: criteria(&["anvisa_registration_mandatory"]),
            min_response_days: 10,
            max_response_days: 30,
        },
        CategoryConfig {
            code: CategoryCode::new("medicamentos"),
            name: "Pharmaceuticals".to_string(),
            sector: Some(SectorCode::new("saude")),
            suggested_event_type: Some(EventTypeCode::Rfq),
            required_fields: fields(&[FieldId::RegulatoryRegistration]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: Vec::new(),
            auction_override: None,
            weights: None,
            validations: criteria(&["anvisa_registration_mandatory", "cold_chain_declaration"]),
            min_response_days: 5,
            max_response_days: 15,
        },
        CategoryConfig {
            code: CategoryCode::new("licencas_software"),
            name: "Software licensing".to_string(),
            sector: Some(SectorCode::new("tecnologia")),
            suggested_event_type: Some(EventTypeCode::Rfq),
            required_fields: fields(&[FieldId::Warranty]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: criteria(&["Licensing model", "Vendor support tier"]),
            auction_override: None,
            weights: Some(WeightSplit::with_technical(20)),
            validations: Vec::new(),
            min_response_days: 5,
            max_response_days: 10,
        },
        CategoryConfig {
            code: CategoryCode::new("desenvolvimento_sistemas"),
            name: "Software development".to_string(),
            sector: Some(SectorCode::new("tecnologia")),
            suggested_event_type: Some(EventTypeCode::Rfp),
            required_fields: fields(&[FieldId::TechnicalProposal, FieldId::Schedule]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: criteria(&["Architecture", "Delivery methodology", "Team"]),
            auction_override: None,
            weights: Some(WeightSplit::with_technical(70)),
            validations: criteria(&["source_code_escrow"]),
            min_response_days: 15,
            max_response_days: 30,
        },
        CategoryConfig {
            code: CategoryCode::new("transporte_cargas"),
            name: "Freight transport".to_string(),
            sector: Some(SectorCode::new("logistica")),
            suggested_event_type: Some(EventTypeCode::Leilao),
            required_fields: fields(&[FieldId::Insurance]),
            hidden_fields: FieldSet::new(),
            evaluation_criteria: Vec::new(),
            auction_override: Some(AuctionPolicy::PosTecnica),
            weights: None,
            validations: criteria(&["antt_registration"]),
            min_response_days: 3,
            max_response_days: 10,
        },
    ]
}

fn rule(
    field: FieldId,
    action: RuleAction,
    value: Option<FieldValue>,
    justification: &str,
    priority: u8,
) -> ClientRule {
    ClientRule {
        field,
        action,
        value,
        justification: justification.to_string(),
        priority,
    }
}

fn standard_clients() -> Vec<ClientPolicy> {
    vec![
        ClientPolicy {
            code: ClientCode::new("petrobras"),
            name: "Petrobras".to_string(),
            rules: vec![
                rule(
                    FieldId::EventType,
                    RuleAction::ForceValue,
                    Some(FieldValue::EventType(EventTypeCode::Rfp)),
                    "Petrobras contracting manual requires formal proposals (RFP)",
                    1,
                ),
                rule(
                    FieldId::AuctionEnabled,
                    RuleAction::Block,
                    Some(FieldValue::Flag(false)),
                    "Reverse auctions are prohibited for Petrobras events",
                    1,
                ),
                rule(
                    FieldId::SafetyCertificate,
                    RuleAction::Require,
                    None,
                    "HSSE certification is mandatory for every supplier",
                    2,
                ),
                rule(
                    FieldId::SupplierRegistration,
                    RuleAction::Require,
                    None,
                    "Suppliers must hold an active CRCC registration",
                    2,
                ),
                rule(
                    FieldId::TechnicalWeight,
                    RuleAction::Suggest,
                    Some(FieldValue::Percent(70)),
                    "Category managers usually score technical merit at 70%",
                    3,
                ),
                rule(
                    FieldId::Samples,
                    RuleAction::Hide,
                    None,
                    "Samples are handled in the qualification process",
                    4,
                ),
            ],
            fixed: Some(FixedConfiguration {
                event_type: Some(EventTypeCode::Rfp),
                auction_allowed: Some(false),
                min_technical_weight: Some(60),
                min_response_days: Some(20),
                mandatory_documents: vec![FieldId::SafetyCertificate, FieldId::SupplierRegistration],
                blocked_fields: vec![FieldId::EventType, FieldId::AuctionEnabled],
            }),
        },
        ClientPolicy {
            code: ClientCode::new("vale"),
            name: "Vale".to_string(),
            rules: vec![
                rule(
                    FieldId::EnvironmentalLicense,
                    RuleAction::Require,
                    None,
                    "Environmental licensing is checked on every mining supply contract",
                    1,
                ),
                rule(
                    FieldId::ProposalGuarantee,
                    RuleAction::ForceValue,
                    Some(FieldValue::Percent(5)),
                    "Bid bond fixed at 5% of the proposal value",
                    2,
                ),
                rule(
                    FieldId::PaymentTerms,
                    RuleAction::Suggest,
                    Some(FieldValue::Text("90 days after invoice".to_string())),
                    "Standard Vale payment cycle",
                    3,
                ),
            ],
            fixed: Some(FixedConfiguration {
                event_type: None,
                auction_allowed: Some(true),
                min_technical_weight: Some(50),
                min_response_days: None,
                mandatory_documents: vec![FieldId::EnvironmentalLicense],
                blocked_fields: Vec::new(),
            }),
        },
        ClientPolicy {
            code: ClientCode::new("ambev"),
            name: "Ambev".to_string(),
            rules: vec![
                rule(
                    FieldId::PaymentTerms,
                    RuleAction::ForceValue,
                    Some(FieldValue::Text("120 days after delivery".to_string())),
                    "Corporate treasury policy sets supplier payment terms",
                    1,
                ),
                rule(
                    FieldId::Samples,
                    RuleAction::Require,
                    None,
                    "Quality team approves samples before award",
                    2,
                ),
                rule(
                    FieldId::DeliveryDeadline,
                    RuleAction::Suggest,
                    Some(FieldValue::Days(15)),
                    "Brewery replenishment cycle",
                    3,
                ),
            ],
            fixed: None,
        },
    ]
}

fn standard_departments() -> Vec<DepartmentTemplate> {
    vec![
        DepartmentTemplate {
            code: DepartmentCode::new("suprimentos"),
            name: "Corporate procurement".to_string(),
            defaults: DepartmentDefaults::default(),
            allowed_sectors: Vec::new(),
            allowed_categories: Vec::new(),
            approval_threshold: 1_000_000,
            multiple_quotes_required: true,
        },
        DepartmentTemplate {
            code: DepartmentCode::new("engenharia"),
            name: "Engineering".to_string(),
            defaults: DepartmentDefaults {
                response_days: Some(20),
            },
            allowed_sectors: vec![SectorCode::new("industria"), SectorCode::new("construcao")],
            allowed_categories: Vec::new(),
            approval_threshold: 500_000,
            multiple_quotes_required: true,
        },
        DepartmentTemplate {
            code: DepartmentCode::new("ti"),
            name: "Information technology".to_string(),
            defaults: DepartmentDefaults::default(),
            allowed_sectors: vec![SectorCode::new("tecnologia")],
            allowed_categories: vec![
                CategoryCode::new("licencas_software"),
                CategoryCode::new("desenvolvimento_sistemas"),
            ],
            approval_threshold: 250_000,
            multiple_quotes_required: false,
        },
        DepartmentTemplate {
            code: DepartmentCode::new("facilities"),
            name: "Facilities".to_string(),
            defaults: DepartmentDefaults::default(),
            allowed_sectors: vec![
                SectorCode::new("servicos_gerais"),
                SectorCode::new("construcao"),
            ],
            allowed_categories: Vec::new(),
            approval_threshold: 150_000,
            multiple_quotes_required: true,
        },
        DepartmentTemplate {
            code: DepartmentCode::new("hospitalar"),
            name: "Hospital operations".to_string(),
            defaults: DepartmentDefaults {
                response_days: Some(10),
            },
            allowed_sectors: vec![SectorCode::new("saude")],
            allowed_categories: Vec::new(),
            approval_threshold: 300_000,
            multiple_quotes_required: true,
        },
    ]
}

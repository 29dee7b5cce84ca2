use std::path::PathBuf;

use sourcing_rules::workflows::sourcing::{
    aggregate, validate_tables, AuctionPolicy, EventTypeCode, FieldId, FieldValue, ImportError,
    LoadedRuleSource, Origin, RuleSource, RuleSourceKind, Selection, Severity, WeightSplit,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn loaded() -> LoadedRuleSource {
    LoadedRuleSource::from_path(fixture("reference_tables.json")).expect("fixture loads")
}

#[test]
fn snapshot_fixture_loads_and_validates_cleanly() {
    let source = loaded();

    assert_eq!(source.kind(), RuleSourceKind::Loaded);
    assert_eq!(source.origin(), Some(fixture("reference_tables.json").as_path()));
    assert_eq!(source.tables().sectors.len(), 2);
    assert_eq!(source.tables().categories.len(), 2);
    assert_eq!(source.snapshot().version().len(), 64);
    assert!(validate_tables(source.tables()).is_empty());
}

#[test]
fn loaded_sector_applies_its_weight_floor() {
    let source = loaded();
    let recommendation = aggregate(source.tables(), &Selection::sector("mineracao"))
        .expect("sector resolves");

    assert_eq!(recommendation.event_type, EventTypeCode::Rfq);
    assert!(recommendation.auction_allowed);
    assert_eq!(recommendation.auction_policy, AuctionPolicy::Direto);
    assert_eq!(recommendation.weights, WeightSplit::with_technical(30));
    assert!(recommendation.is_required(FieldId::EnvironmentalLicense));
    assert!(recommendation.hidden_fields.contains(&FieldId::Samples));
    assert_eq!(recommendation.response_days, 7);
}

#[test]
fn loaded_client_department_and_category_combine() {
    let source = loaded();
    let selection = Selection::sector("mineracao")
        .with_category("explosivos")
        .with_client("cvale")
        .with_department("operacoes");

    let recommendation = aggregate(source.tables(), &selection).expect("selection resolves");

    assert_eq!(recommendation.event_type, EventTypeCode::Rfp);
    assert!(!recommendation.auction_allowed);
    assert_eq!(recommendation.weights, WeightSplit::with_technical(75));
    assert_eq!(recommendation.response_days, 25);
    for field in [
        FieldId::Scope,
        FieldId::EnvironmentalLicense,
        FieldId::RegulatoryRegistration,
        FieldId::Insurance,
    ] {
        assert!(recommendation.is_required(field), "{field} should be required");
    }
    assert_eq!(
        recommendation.evaluation_criteria,
        vec!["Licensed storage".to_string(), "Handling record".to_string()]
    );
    assert_eq!(
        recommendation
            .approval
            .as_ref()
            .map(|approval| approval.approval_threshold),
        Some(750_000)
    );
    assert!(recommendation
        .alerts_from(Origin::Client)
        .any(|alert| alert.severity == Severity::Warning));
    assert!(recommendation.alerts_from(Origin::Department).next().is_none());
}

#[test]
fn client_rule_sheet_extends_the_snapshot() {
    let base = loaded();
    let base_version = base.snapshot().version().to_string();
    let extended = base
        .with_client_rules_csv(fixture("client_rules.csv"))
        .expect("sheet applies");

    assert_ne!(extended.snapshot().version(), base_version);
    assert!(extended.origin().is_some());

    let cvale = aggregate(
        extended.tables(),
        &Selection::sector("mineracao").with_client("cvale"),
    )
    .expect("selection resolves");
    assert!(cvale.is_required(FieldId::SiteVisit));
    assert_eq!(
        cvale.suggestions[0].value,
        Some(FieldValue::Days(30))
    );

    let aurora = aggregate(
        extended.tables(),
        &Selection::sector("mineracao").with_client("aurora"),
    )
    .expect("selection resolves");
    assert_eq!(aurora.event_type, EventTypeCode::Rfq);
    assert!(!aurora.auction_allowed);
    assert!(aurora.blocked_fields.contains(&FieldId::AuctionEnabled));
    assert!(aurora.blocked_fields.contains(&FieldId::PaymentTerms));
    assert_eq!(aurora.field_locks.len(), 2);
    assert_eq!(
        aurora.field_locks[1].value,
        Some(FieldValue::Text("60 days after invoice".to_string()))
    );
}

#[test]
fn missing_and_malformed_snapshots_are_reported() {
    match LoadedRuleSource::from_path(fixture("absent.json")) {
        Err(ImportError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }

    match LoadedRuleSource::from_reader(&b"{\"sectors\": [{\"code\": 7}]}"[..]) {
        Err(ImportError::Json(_)) => {}
        other => panic!("expected json error, got {other:?}"),
    }
}

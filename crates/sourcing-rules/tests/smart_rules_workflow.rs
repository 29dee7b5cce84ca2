use std::sync::Arc;
use std::thread;

use sourcing_rules::workflows::sourcing::{
    aggregate, catalog, Aspect, EventTypeCode, Origin, Selection, Severity, SmartRulesEngine,
    StaticRuleSource, WeightSplit,
};

#[test]
fn sector_only_scenario() {
    let tables = catalog::standard_tables();
    let recommendation =
        aggregate(&tables, &Selection::sector("industria")).expect("sector resolves");

    assert_eq!(recommendation.event_type, EventTypeCode::Rfq);
    assert!(recommendation.auction_allowed);
    assert_eq!(recommendation.weights, WeightSplit { technical: 20, commercial: 80 });
    assert_eq!(recommendation.rules_for(Aspect::EventType).count(), 1);
}

#[test]
fn client_override_scenario() {
    let tables = catalog::standard_tables();
    let recommendation = aggregate(
        &tables,
        &Selection::sector("industria").with_client("petrobras"),
    )
    .expect("selection resolves");

    assert_eq!(recommendation.event_type, EventTypeCode::Rfp);
    assert!(!recommendation.auction_allowed);
    assert!(recommendation.weights.technical >= 60);

    let warned: Vec<Aspect> = recommendation
        .alerts_from(Origin::Client)
        .filter(|alert| alert.severity == Severity::Warning)
        .map(|alert| alert.aspect)
        .collect();
    assert!(warned.contains(&Aspect::EventType));
    assert!(warned.contains(&Aspect::Auction));
}

#[test]
fn category_refinement_scenario() {
    let tables = catalog::standard_tables();
    let recommendation = aggregate(
        &tables,
        &Selection::sector("servicos_gerais").with_category("consultoria_estrategica"),
    )
    .expect("selection resolves");

    assert_eq!(recommendation.weights, WeightSplit { technical: 80, commercial: 20 });
    assert!(recommendation
        .rules_for(Aspect::EventType)
        .any(|rule| rule.origin == Origin::Category));
}

#[test]
fn absence_scenario() {
    let tables = catalog::standard_tables();
    let selection = Selection {
        sector: Some(String::new()),
        category: Some(String::new()),
        client: Some(String::new()),
        department: None,
    };

    assert!(aggregate(&tables, &selection).is_none());
}

#[test]
fn shared_engine_serves_concurrent_callers() {
    let engine = Arc::new(SmartRulesEngine::new(
        Arc::new(StaticRuleSource::standard()),
        64,
    ));
    let selections = [
        Selection::sector("industria"),
        Selection::sector("saude").with_category("medicamentos"),
        Selection::sector("construcao").with_client("petrobras"),
        Selection::sector("tecnologia").with_department("ti"),
    ];

    let expected: Vec<_> = selections
        .iter()
        .map(|selection| aggregate(engine.tables(), selection))
        .collect();

    thread::scope(|scope| {
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            let selections = &selections;
            let expected = &expected;
            scope.spawn(move || {
                for (selection, expected) in selections.iter().zip(expected.iter()) {
                    assert_eq!(&engine.recommend(selection), expected);
                }
            });
        }
    });

    assert_eq!(engine.cached_entries(), selections.len());
}

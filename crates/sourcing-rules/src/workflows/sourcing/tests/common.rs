use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::sourcing::catalog::standard_tables;
use crate::workflows::sourcing::domain::Selection;
use crate::workflows::sourcing::smart::{
    aggregate, Alert, Aspect, Origin, Severity, SmartRecommendation, SmartRulesEngine,
};
use crate::workflows::sourcing::source::StaticRuleSource;
use crate::workflows::sourcing::tables::ReferenceTables;
use crate::workflows::sourcing::sourcing_router;

pub(super) fn tables() -> ReferenceTables {
    standard_tables()
}

pub(super) fn recommend(selection: Selection) -> SmartRecommendation {
    aggregate(&tables(), &selection).expect("selection yields a recommendation")
}

pub(super) fn engine() -> Arc<SmartRulesEngine> {
    Arc::new(SmartRulesEngine::new(
        Arc::new(StaticRuleSource::standard()),
        16,
    ))
}

pub(super) fn router() -> axum::Router {
    sourcing_router(engine())
}

pub(super) fn alerts_matching(
    recommendation: &SmartRecommendation,
    severity: Severity,
    origin: Origin,
    aspect: Aspect,
) -> Vec<&Alert> {
    recommendation
        .alerts
        .iter()
        .filter(|alert| alert.severity == severity && alert.origin == origin && alert.aspect == aspect)
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

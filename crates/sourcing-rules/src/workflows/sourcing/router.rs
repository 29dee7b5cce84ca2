use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::Selection;
use super::resolvers::{
    categories_for_sector, resolve_client, resolve_sector, ClientPolicyView, Resolution,
};
use super::smart::SmartRulesEngine;

pub const SELECT_SECTOR_PROMPT: &str =
    "select a sector to receive sourcing recommendations";

/// Router builder exposing the recommendation engine and its picker options.
pub fn sourcing_router(engine: Arc<SmartRulesEngine>) -> Router {
    Router::new()
        .route(
            "/api/v1/sourcing/recommendation",
            post(recommendation_handler),
        )
        .route("/api/v1/sourcing/options", get(options_handler))
        .route(
            "/api/v1/sourcing/clients/:client_code/rules",
            get(client_rules_handler),
        )
        .with_state(engine)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    /// Anchor for the response due date; defaults to the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl RecommendationRequest {
    fn selection(&self) -> Selection {
        Selection {
            sector: self.sector.clone(),
            category: self.category.clone(),
            client: self.client.clone(),
            department: self.department.clone(),
        }
    }
}

pub(crate) async fn recommendation_handler(
    State(engine): State<Arc<SmartRulesEngine>>,
    axum::Json(request): axum::Json<RecommendationRequest>,
) -> Response {
    let selection = request.selection();

    match engine.recommend(&selection) {
        Some(recommendation) => {
            let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
            let response_due =
                today.checked_add_days(Days::new(u64::from(recommendation.response_days)));
            let payload = json!({
                "recommendation": recommendation,
                "response_due": response_due,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        // Only an empty sector earns a prompt; unknown codes stay silent.
        None => {
            let payload = match resolve_sector(engine.tables(), selection.sector.as_deref()) {
                Resolution::NotSelected => json!({
                    "recommendation": serde_json::Value::Null,
                    "prompt": SELECT_SECTOR_PROMPT,
                }),
                _ => json!({ "recommendation": serde_json::Value::Null }),
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsQuery {
    #[serde(default)]
    pub sector: Option<String>,
}

pub(crate) async fn options_handler(
    State(engine): State<Arc<SmartRulesEngine>>,
    Query(query): Query<OptionsQuery>,
) -> Response {
    let tables = engine.tables();

    let sectors: Vec<_> = tables
        .sectors
        .iter()
        .map(|sector| json!({ "code": sector.code, "name": sector.name }))
        .collect();
    let categories: Vec<_> = query
        .sector
        .as_deref()
        .map(str::trim)
        .filter(|sector| !sector.is_empty())
        .map(|sector| categories_for_sector(tables, sector))
        .unwrap_or_default()
        .into_iter()
        .map(|category| json!({ "code": category.code, "name": category.name }))
        .collect();
    let clients: Vec<_> = tables
        .clients
        .iter()
        .map(|client| json!({ "code": client.code, "name": client.name }))
        .collect();
    let departments: Vec<_> = tables
        .departments
        .iter()
        .map(|department| json!({ "code": department.code, "name": department.name }))
        .collect();

    let payload = json!({
        "sectors": sectors,
        "categories": categories,
        "clients": clients,
        "departments": departments,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn client_rules_handler(
    State(engine): State<Arc<SmartRulesEngine>>,
    Path(client_code): Path<String>,
) -> Response {
    match resolve_client(engine.tables(), Some(client_code.as_str())) {
        Resolution::Found(view) => {
            (StatusCode::OK, axum::Json(client_rules_payload(&view))).into_response()
        }
        Resolution::NotSelected | Resolution::Unknown(_) => {
            let payload = json!({
                "error": format!("unknown client '{}'", client_code.trim()),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

fn client_rules_payload(view: &ClientPolicyView<'_>) -> serde_json::Value {
    json!({
        "client": view.policy().code,
        "name": view.name(),
        "rules": view.active_rules(),
        "fixed": view.fixed(),
        "required_fields": view.required_fields(),
        "blocked_fields": view.blocked_fields(),
    })
}

use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState};
use crate::routes::with_sourcing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sourcing_rules::config::AppConfig;
use sourcing_rules::error::AppError;
use sourcing_rules::telemetry;
use sourcing_rules::workflows::sourcing::validate_tables;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    config.rules = args.rules.apply(config.rules);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = build_engine(&config.rules)?;
    let issues = validate_tables(engine.tables());
    if !issues.is_empty() {
        warn!(count = issues.len(), "reference tables have data-quality issues");
    }

    let app = with_sourcing_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sourcing rules service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::{
    controllers::{health, narration::NarrationController, report::ReportController},
    infrastructure::auth::{auth_middleware, request_id_middleware},
};

/// Build the application router with every route and layer
pub fn build_router(
    pool: Arc<DbPool>,
    report_controller: Arc<ReportController>,
    narration_controller: Arc<NarrationController>,
) -> Router {
    // Report routes (require caller identity)
    let report_routes = Router::new()
        .route(
            "/api/reports",
            get(ReportController::list_reports).post(ReportController::generate_report),
        )
        .route("/api/reports/:reportId", get(ReportController::get_report))
        .with_state(report_controller)
        .layer(middleware::from_fn(auth_middleware));

    // Narration trigger (requires caller identity)
    let narration_routes = Router::new()
        .route("/api/narration", post(NarrationController::narrate))
        .with_state(narration_controller)
        .layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(report_routes)
        .merge(narration_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    pool: Arc<DbPool>,
    report_controller: Arc<ReportController>,
    narration_controller: Arc<NarrationController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = build_router(pool, report_controller, narration_controller);

    if config.is_development() {
        app = app.layer(CorsLayer::permissive());
    }

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * - `TraceLayer` - one span per request, logged through `tracing`
 * - `CorsLayer::permissive()` - clients are served from other origins
 *
 * Unknown paths get a JSON 404 in the same shape as handler errors.
 */

use axum::{http::StatusCode, response::IntoResponse, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

async fn not_found() -> impl IntoResponse {
    BackendError::handler(StatusCode::NOT_FOUND, "Not found")
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    configure_api_routes(&app_state)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

//! API handlers for the room directory REST endpoints

pub mod health;
pub mod openapi;
pub mod rooms;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Directory
        .route("/directory", get(rooms::get_directory))
        .route("/rooms", get(rooms::search_rooms))
        // Reference data
        .route("/buildings", get(rooms::list_buildings))
        .route("/features", get(rooms::list_features))
        .route("/features/grouped", get(rooms::list_feature_groups))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, rooms};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Room Directory API",
        version = "1.0.0",
        description = "Search and filter rooms across campus",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Rooms
        rooms::get_directory,
        rooms::search_rooms,
        rooms::list_buildings,
        rooms::list_features,
        rooms::list_feature_groups,
    ),
    components(
        schemas(
            // Rooms
            crate::models::filters::SearchFilters,
            crate::models::room::Building,
            crate::models::room::BuildingSummary,
            crate::models::room::Feature,
            crate::models::room::FeatureGroup,
            crate::models::room::EnrichedRoom,
            crate::models::room::RoomType,
            crate::services::rooms::DirectoryPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rooms", description = "Room search and reference data")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

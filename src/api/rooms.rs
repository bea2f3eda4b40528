//! Room directory endpoints
//!
//! Query strings are read raw so that repeated keys (`features=a&features=b`)
//! reach the normalizer intact.

use axum::{
    extract::{RawQuery, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        filters::{RawParams, SearchFilters, SearchParamsDoc},
        room::{Building, EnrichedRoom, Feature, FeatureGroup},
    },
    services::rooms::DirectoryPage,
};

fn filters_from_query(query: Option<String>) -> SearchFilters {
    let params = query.as_deref().map(RawParams::parse).unwrap_or_default();
    SearchFilters::from_params(&params)
}

/// Filtered rooms plus reference data, in one response
#[utoipa::path(
    get,
    path = "/directory",
    tag = "rooms",
    params(SearchParamsDoc),
    responses(
        (status = 200, description = "Directory page", body = DirectoryPage),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_directory(
    State(state): State<crate::AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<DirectoryPage>> {
    let filters = filters_from_query(query);
    let page = state.services.rooms.load_directory(filters).await?;
    Ok(Json(page))
}

/// Search rooms
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    params(SearchParamsDoc),
    responses(
        (status = 200, description = "Matching rooms", body = Vec<EnrichedRoom>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_rooms(
    State(state): State<crate::AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<Vec<EnrichedRoom>>> {
    let filters = filters_from_query(query);
    let rooms = state.services.rooms.search_rooms(&filters).await?;
    Ok(Json(rooms))
}

/// List all buildings
#[utoipa::path(
    get,
    path = "/buildings",
    tag = "rooms",
    responses(
        (status = 200, description = "Buildings ordered by name", body = Vec<Building>)
    )
)]
pub async fn list_buildings(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Building>>> {
    let buildings = state.services.rooms.list_buildings().await?;
    Ok(Json(buildings))
}

/// List all features
#[utoipa::path(
    get,
    path = "/features",
    tag = "rooms",
    responses(
        (status = 200, description = "Features ordered by category then name", body = Vec<Feature>)
    )
)]
pub async fn list_features(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Feature>>> {
    let features = state.services.rooms.list_features().await?;
    Ok(Json(features))
}

/// List features grouped by category
#[utoipa::path(
    get,
    path = "/features/grouped",
    tag = "rooms",
    responses(
        (status = 200, description = "Feature groups", body = Vec<FeatureGroup>)
    )
)]
pub async fn list_feature_groups(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<FeatureGroup>>> {
    let groups = state.services.rooms.feature_groups().await?;
    Ok(Json(groups))
}

//! In-process API tests against the bundled sample catalog

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use room_directory::{
    api::create_router,
    models::{
        query::QueryPlan,
        room::{Building, Feature, Room, RoomFeatureRow},
    },
    repository::{Catalog, InMemoryRoomStore, RoomStore},
    services::Services,
    AppError, AppResult, AppState,
};

fn app_with(store: Arc<dyn RoomStore>) -> Router {
    create_router(AppState {
        services: Arc::new(Services::new(store)),
    })
}

fn app() -> Router {
    let catalog = Catalog::from_json_file(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.json"))
        .expect("Failed to load sample catalog");
    app_with(Arc::new(InMemoryRoomStore::new(catalog)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn room_ids(uri: &str) -> Vec<String> {
    let (status, body) = get(app(), uri).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    body.as_array()
        .expect("Expected an array of rooms")
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get(app(), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(app(), "/api/v1/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_unfiltered_rooms_ordered_by_building_then_number() {
    assert_eq!(
        room_ids("/api/v1/rooms").await,
        vec!["lib-301", "sci-101", "sci-210", "sci-b02"]
    );
}

#[tokio::test]
async fn test_features_are_conjunctive() {
    assert_eq!(
        room_ids("/api/v1/rooms?features=whiteboard").await,
        vec!["lib-301", "sci-101"]
    );
    assert_eq!(
        room_ids("/api/v1/rooms?features=whiteboard&features=fume-hood").await,
        vec!["sci-101"]
    );
    assert!(room_ids("/api/v1/rooms?features=whiteboard&features=projector")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_search_name_or_number_case_insensitive() {
    assert_eq!(room_ids("/api/v1/rooms?q=LECTURE").await, vec!["sci-210"]);
    assert_eq!(room_ids("/api/v1/rooms?q=b02").await, vec!["sci-b02"]);
    assert_eq!(room_ids("/api/v1/rooms?q=101").await, vec!["sci-101"]);
}

#[tokio::test]
async fn test_numeric_filters() {
    assert_eq!(room_ids("/api/v1/rooms?floor=-1").await, vec!["sci-b02"]);
    assert_eq!(
        room_ids("/api/v1/rooms?minCapacity=10&maxCapacity=100").await,
        vec!["sci-101"]
    );
    assert!(room_ids("/api/v1/rooms?minCapacity=10&maxCapacity=5")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_garbled_values_do_not_narrow() {
    let all = room_ids("/api/v1/rooms").await;
    assert_eq!(room_ids("/api/v1/rooms?minCapacity=abc").await, all);
    assert_eq!(room_ids("/api/v1/rooms?accessible=false").await, all);
    assert_eq!(room_ids("/api/v1/rooms?accessible=yes").await, all);
    assert_eq!(room_ids("/api/v1/rooms?building=sci&building=lib").await, all);
}

#[tokio::test]
async fn test_accessible_and_type() {
    assert_eq!(
        room_ids("/api/v1/rooms?accessible=true").await,
        vec!["lib-301", "sci-101", "sci-210"]
    );
    assert_eq!(room_ids("/api/v1/rooms?type=lecture-hall").await, vec!["sci-210"]);
    assert!(room_ids("/api/v1/rooms?type=broom-closet").await.is_empty());
}

#[tokio::test]
async fn test_enriched_room_shape() {
    let (status, body) = get(app(), "/api/v1/rooms?building=sci&q=chem").await;
    assert_eq!(status, StatusCode::OK);

    let room = &body[0];
    assert_eq!(room["building"]["abbreviation"], "SCI");
    assert_eq!(room["building"]["name"], "Science Center");
    assert_eq!(room["building"]["label"], "SCI - Science Center");
    assert_eq!(room["room_type_label"], "Lab");
    let features: Vec<_> = room["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(features, vec!["fume-hood", "whiteboard"]);
}

#[tokio::test]
async fn test_directory_page() {
    let (status, body) = get(app(), "/api/v1/directory?building=sci&features=projector").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["filters"]["building_id"], "sci");
    assert_eq!(body["filters"]["feature_ids"][0], "projector");
    assert_eq!(body["filters"]["min_capacity"], Value::Null);
    assert_eq!(body["query_string"], "building=sci&features=projector");

    let buildings: Vec<_> = body["buildings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(buildings, vec!["Library", "Science Center"]);

    let features: Vec<_> = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(features, vec!["projector", "speakers", "fume-hood", "whiteboard"]);

    assert_eq!(body["feature_groups"].as_array().unwrap().len(), 3);
    assert_eq!(body["rooms"].as_array().unwrap().len(), 1);
    assert_eq!(body["rooms"][0]["id"], "sci-210");
}

#[tokio::test]
async fn test_grouped_features() {
    let (status, body) = get(app(), "/api/v1/features/grouped").await;
    assert_eq!(status, StatusCode::OK);

    let categories: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["AV", "Lab Equipment", "Teaching"]);
}

#[tokio::test]
async fn test_empty_store() {
    let app = app_with(Arc::new(InMemoryRoomStore::new(Catalog::default())));

    let (status, body) = get(app.clone(), "/api/v1/buildings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));

    let (status, body) = get(app, "/api/v1/features").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
}

/// Store whose feature catalog is unreachable
struct BrokenFeatures(InMemoryRoomStore);

#[async_trait]
impl RoomStore for BrokenFeatures {
    async fn find_rooms(&self, plan: &QueryPlan) -> AppResult<Vec<Room>> {
        self.0.find_rooms(plan).await
    }

    async fn buildings_by_ids(&self, ids: &[String]) -> AppResult<Vec<Building>> {
        self.0.buildings_by_ids(ids).await
    }

    async fn features_for_rooms(&self, room_ids: &[String]) -> AppResult<Vec<RoomFeatureRow>> {
        self.0.features_for_rooms(room_ids).await
    }

    async fn list_buildings(&self) -> AppResult<Vec<Building>> {
        self.0.list_buildings().await
    }

    async fn list_features(&self) -> AppResult<Vec<Feature>> {
        Err(AppError::Storage("features table unreachable".to_string()))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::Storage("unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_storage_failure_fails_whole_directory() {
    let app = app_with(Arc::new(BrokenFeatures(InMemoryRoomStore::new(Catalog::default()))));

    let (status, body) = get(app.clone(), "/api/v1/directory").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "StorageUnavailable");
    assert!(body.get("rooms").is_none());

    // room search alone does not touch the feature catalog
    let (status, _) = get(app.clone(), "/api/v1/rooms").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(app, "/api/v1/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

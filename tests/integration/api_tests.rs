//! API integration tests against a running server
//!
//! Start the server with the memory backend and the sample catalog first:
//! `ROOMDIR_STORAGE__BACKEND=memory ROOMDIR_STORAGE__SEED_FILE=data/catalog.json cargo run`

use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/api/v1";

async fn get_json(client: &Client, path: &str) -> Value {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success(), "GET {} -> {}", path, response.status());
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();
    let body = get_json(&client, "/health").await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_ready() {
    let client = Client::new();
    let body = get_json(&client, "/ready").await;
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_list_buildings() {
    let client = Client::new();
    let body = get_json(&client, "/buildings").await;
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_list_features() {
    let client = Client::new();
    let body = get_json(&client, "/features").await;
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_search_rooms_with_repeated_features() {
    let client = Client::new();
    let response = client
        .get(format!("{}/rooms", BASE_URL))
        .query(&[("features", "whiteboard"), ("features", "fume-hood")])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    for room in body.as_array().expect("No rooms array") {
        let ids: Vec<_> = room["features"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["id"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&"whiteboard"));
        assert!(ids.contains(&"fume-hood"));
    }
}

#[tokio::test]
#[ignore]
async fn test_directory_echoes_filters() {
    let client = Client::new();
    let body = get_json(&client, "/directory?q=lab&accessible=true&minCapacity=x").await;

    assert_eq!(body["filters"]["search_query"], "lab");
    assert_eq!(body["filters"]["accessible"], true);
    assert_eq!(body["filters"]["min_capacity"], Value::Null);
    assert!(body["rooms"].is_array());
    assert!(body["buildings"].is_array());
    assert!(body["features"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_inverted_capacity_range() {
    let client = Client::new();
    let body = get_json(&client, "/rooms?minCapacity=10&maxCapacity=5").await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

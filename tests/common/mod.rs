//! Shared test fixtures for the toy catalog integration tests.
//!
//! Provides `setup_sample_catalog()`, which builds a [`ToyCatalog`] over an
//! in-memory store seeded with a handful of listings, plus HTTP helpers for
//! driving the router with `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use serde_json::{json, Value};
use toys_kingdom::models::{ToyDocument, ToyId};
use toys_kingdom::server::{build_router, AppState};
use toys_kingdom::{InMemoryToyStore, ToyCatalog};

/// Sample listings in insertion order.
///
/// Prices deliberately mix numeric strings, decimals, raw numbers and
/// garbage so price ordering is exercised.
pub fn sample_toys() -> Vec<Value> {
    vec![
        json!({
            "toy_name": "Robo Rex",
            "seller_name": "Ada",
            "seller_email": "ada@toys.com",
            "sub_category": "Robots",
            "price": "25",
            "quantity": "4",
            "rating": "4.5",
            "review": "Loud and fun",
            "description": "A walking dinosaur robot.",
            "toy_img": "https://img.example.com/robo-rex.png"
        }),
        json!({
            "toy_name": "Zeta Racer",
            "seller_name": "Ada",
            "seller_email": "ada@toys.com",
            "sub_category": "Cars",
            "price": "10",
            "quantity": 12,
            "rating": 4,
            "review": "Fast",
            "description": "Pull-back sports car.",
            "toy_img": "https://img.example.com/zeta.png"
        }),
        json!({
            "toy_name": "Mini ROBOT Kit",
            "seller_name": "Grace",
            "seller_email": "grace@toys.com",
            "sub_category": "Robots",
            "price": 9.5,
            "quantity": "1",
            "rating": 5,
            "review": "Great starter kit",
            "description": "Build-your-own robot.",
            "toy_img": "https://img.example.com/mini.png"
        }),
        json!({
            "toy_name": "Teddy",
            "seller_name": "Ada",
            "seller_email": "ada@toys.com",
            "sub_category": "Plush",
            "price": "ask me",
            "quantity": "2",
            "rating": "3",
            "review": "Soft",
            "description": "Classic bear.",
            "toy_img": "https://img.example.com/teddy.png"
        }),
        json!({
            "toy_name": "Block Tower",
            "seller_name": "Ada",
            "seller_email": "ada@toys.com",
            "sub_category": "Blocks",
            "price": "12.75",
            "quantity": "7",
            "rating": "4",
            "review": "Sturdy",
            "description": "Stacking blocks.",
            "toy_img": "https://img.example.com/blocks.png"
        }),
    ]
}

pub fn as_document(value: Value) -> ToyDocument {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Create a catalog over a fresh in-memory store seeded with
/// [`sample_toys`]. Returns the catalog and the assigned ids in insertion
/// order.
pub async fn setup_sample_catalog() -> (ToyCatalog, Vec<ToyId>) {
    let catalog = ToyCatalog::new(Arc::new(InMemoryToyStore::new()));
    let mut ids = Vec::new();
    for toy in sample_toys() {
        let ack = catalog.toys().add(as_document(toy)).await.unwrap();
        ids.push(ack.inserted_id.as_str().unwrap().parse().unwrap());
    }
    (catalog, ids)
}

pub fn app(catalog: ToyCatalog) -> axum::Router {
    build_router(AppState::new(catalog))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn read_body(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn read_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&read_body(response).await).unwrap()
}

/// Names of the toys in a JSON array response, in order.
pub fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|t| t["toy_name"].as_str().unwrap_or_default().to_string())
        .collect()
}

//! HTTP-level tests driving the router with `tower::ServiceExt::oneshot`.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{empty_request, json_request, names, read_body, read_json};

// ---------------------------------------------------------------------------
// Liveness and CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_returns_liveness_text() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let response = common::app(catalog)
        .oneshot(empty_request("GET", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_body(response).await;
    assert_eq!(body, b"Toys kingdom server is running");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/alltoys")
        .header("origin", "https://shop.example.com")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = common::app(catalog).oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_route_matches_names() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let response = common::app(catalog)
        .oneshot(empty_request("GET", "/toySearch/ROBO"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(names(&body), vec!["Robo Rex", "Mini ROBOT Kit"]);
}

#[tokio::test]
async fn alltoys_is_capped_and_projected() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    for i in 0..25 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/add-toy",
                json!({"toy_name": format!("Car {i}"), "toy_img": "x", "review": "y", "description": "z"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(empty_request("GET", "/alltoys")).await.unwrap();
    let body = read_json(response).await;
    let toys = body.as_array().unwrap();
    assert_eq!(toys.len(), 20);
    for toy in toys {
        assert!(toy.get("toy_img").is_none());
        assert!(toy.get("review").is_none());
        assert!(toy.get("description").is_none());
    }
}

#[tokio::test]
async fn category_toys_returns_card_fields() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let response = common::app(catalog)
        .oneshot(empty_request("GET", "/category-toys"))
        .await
        .unwrap();
    let body = read_json(response).await;
    let toys = body.as_array().unwrap();
    assert_eq!(toys.len(), 5);
    assert!(toys.iter().all(|t| t.get("toy_img").is_some()));
    assert!(toys.iter().all(|t| t.get("seller_email").is_none()));
}

#[tokio::test]
async fn my_toys_sorts_seller_listing_by_price() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let response = common::app(catalog)
        .oneshot(empty_request("GET", "/my-toys?email=ada@toys.com"))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(
        names(&body),
        vec!["Zeta Racer", "Block Tower", "Robo Rex", "Teddy"]
    );
}

#[tokio::test]
async fn my_toys_cheaper_later_insert_comes_first() {
    let catalog = toys_kingdom::ToyCatalog::builder()
        .in_memory()
        .build()
        .await
        .unwrap();
    let app = common::app(catalog);
    for toy in [
        json!({"toy_name": "Robo", "seller_email": "a@x.com", "price": "25"}),
        json!({"toy_name": "Zeta", "seller_email": "a@x.com", "price": "10"}),
        json!({"toy_name": "Other", "seller_email": "b@x.com", "price": "1"}),
    ] {
        app.clone()
            .oneshot(json_request("POST", "/add-toy", toy))
            .await
            .unwrap();
    }
    let response = app
        .oneshot(empty_request("GET", "/my-toys?email=a@x.com"))
        .await
        .unwrap();
    assert_eq!(names(&read_json(response).await), vec!["Zeta", "Robo"]);
}

// ---------------------------------------------------------------------------
// Single toy lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_then_get_returns_submitted_fields() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    let submitted = json!({
        "toy_name": "Kite",
        "seller_name": "Lin",
        "seller_email": "lin@toys.com",
        "sub_category": "Outdoor",
        "price": "8",
        "quantity": 3,
        "rating": 4.5,
        "review": "Flies well",
        "description": "Diamond kite.",
        "toy_img": "https://img.example.com/kite.png"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/add-toy", submitted.clone()))
        .await
        .unwrap();
    let ack = read_json(response).await;
    assert_eq!(ack["acknowledged"], true);
    let id = ack["insertedId"].as_str().unwrap().to_string();

    let response = app
        .oneshot(empty_request("GET", &format!("/toy/{id}")))
        .await
        .unwrap();
    let mut toy = read_json(response).await;
    assert_eq!(toy["_id"], id.as_str());
    toy.as_object_mut().unwrap().remove("_id");
    assert_eq!(toy, submitted);
}

#[tokio::test]
async fn get_unknown_toy_is_null() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let response = common::app(catalog)
        .oneshot(empty_request("GET", "/toy/64b7f0c2a1b2c3d4e5f60718"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, Value::Null);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    for request in [
        empty_request("GET", "/toy/not-an-id"),
        empty_request("DELETE", "/my-toys/not-an-id"),
        json_request("PUT", "/my-toys/not-an-id", json!({"toy_name": "x"})),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("not-an-id"));
    }
}

#[tokio::test]
async fn put_updates_existing_toy() {
    let (catalog, ids) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    let uri = format!("/my-toys/{}", ids[0]);
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({"toy_name": "Robo Rex", "price": "19", "quantity": "4", "rating": "4.5",
                   "review": "Loud and fun", "description": "A walking dinosaur robot.",
                   "toy_img": "https://img.example.com/robo-rex.png", "sub_category": "Robots"}),
        ))
        .await
        .unwrap();
    let ack = read_json(response).await;
    assert_eq!(ack["matchedCount"], 1);
    assert_eq!(ack["modifiedCount"], 1);
    assert_eq!(ack["upsertedCount"], 0);
    assert_eq!(ack["upsertedId"], Value::Null);

    let response = app
        .oneshot(empty_request("GET", &format!("/toy/{}", ids[0])))
        .await
        .unwrap();
    let toy = read_json(response).await;
    assert_eq!(toy["price"], "19");
    assert_eq!(toy["seller_name"], "Ada");
}

#[tokio::test]
async fn put_unknown_id_creates_record_with_editable_fields() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    let id = "64b7f0c2a1b2c3d4e5f60718";
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/my-toys/{id}"),
            json!({"toy_name": "Phantom", "seller_email": "sneaky@toys.com"}),
        ))
        .await
        .unwrap();
    let ack = read_json(response).await;
    assert_eq!(ack["upsertedCount"], 1);
    assert_eq!(ack["upsertedId"], id);

    let response = app
        .oneshot(empty_request("GET", &format!("/toy/{id}")))
        .await
        .unwrap();
    let toy = read_json(response).await;
    let mut keys: Vec<&str> = toy.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "_id",
            "description",
            "price",
            "quantity",
            "rating",
            "review",
            "sub_category",
            "toy_img",
            "toy_name"
        ]
    );
}

#[tokio::test]
async fn delete_then_get_is_null() {
    let (catalog, ids) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/my-toys/{}", ids[3])))
        .await
        .unwrap();
    let ack = read_json(response).await;
    assert_eq!(ack, json!({"acknowledged": true, "deletedCount": 1}));

    let response = app
        .oneshot(empty_request("GET", &format!("/toy/{}", ids[3])))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, Value::Null);
}

#[tokio::test]
async fn add_rejects_non_object_body() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let response = common::app(catalog)
        .oneshot(json_request("POST", "/add-toy", json!(["not", "a", "toy"])))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn add_with_taken_id_conflicts_and_delete_clears_it() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    let id = "64b7f0c2a1b2c3d4e5f60718";
    let response = app
        .clone()
        .oneshot(json_request("POST", "/add-toy", json!({"_id": id, "toy_name": "A"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["insertedId"], id);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/add-toy", json!({"_id": id, "toy_name": "B"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(read_json(response).await["error"].as_str().unwrap().contains(id));

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/toy/{id}")))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["toy_name"], "A");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/my-toys/{id}")))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["deletedCount"], 1);

    let response = app
        .oneshot(empty_request("GET", &format!("/toy/{id}")))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, Value::Null);
}

#[tokio::test]
async fn add_with_hex_id_is_addressable_by_that_id() {
    let (catalog, _) = common::setup_sample_catalog().await;
    let app = common::app(catalog);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add-toy",
            json!({"_id": "64B7F0C2A1B2C3D4E5F60799", "toy_name": "Kite"}),
        ))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["insertedId"], "64b7f0c2a1b2c3d4e5f60799");

    let response = app
        .oneshot(empty_request("GET", "/toy/64b7f0c2a1b2c3d4e5f60799"))
        .await
        .unwrap();
    let toy = read_json(response).await;
    assert_eq!(toy["_id"], "64b7f0c2a1b2c3d4e5f60799");
    assert_eq!(toy["toy_name"], "Kite");
}

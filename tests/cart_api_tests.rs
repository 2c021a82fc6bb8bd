// tests/cart_api_tests.rs

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::init_tracing;
use telecart::config::AppConfig;
use telecart::services::CartService;
use telecart::state::AppState;
use telecart::store::MemoryCartStore;
use telecart::web::routes::configure_app_routes;

fn test_state() -> AppState {
  AppState {
    cart_service: Arc::new(CartService::new(Arc::new(MemoryCartStore::new()))),
    config: Arc::new(AppConfig {
      server_host: "127.0.0.1".to_string(),
      api_port: 3000,
      database_url: "memory://".to_string(),
    }),
  }
}

macro_rules! test_app {
  () => {
    test::init_service(
      App::new()
        .app_data(web::Data::new(test_state()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn health_probe_answers_ok() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!("OK"));
}

#[actix_web::test]
async fn index_describes_the_api_surface() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Telecom Cart Experience API");
  assert_eq!(body["endpoints"]["cart"], "/api/cart/:userId");
  assert_eq!(body["endpoints"]["getTotal"], "GET /api/cart/:userId/total");
}

#[actix_web::test]
async fn get_cart_creates_and_returns_camel_case_json() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/cart/user123").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["userId"], "user123");
  assert_eq!(body["items"], json!([]));
  assert!(body["createdAt"].is_string());
  assert!(body["updatedAt"].is_string());
}

#[actix_web::test]
async fn add_item_returns_201_with_the_canonical_plan_type() {
  init_tracing();
  let app = test_app!();

  let payload = json!({
    "productId": "prod-001",
    "productName": "Premium Data Plan",
    "quantity": 1,
    "price": 49.99,
    "planType": "postpaid", // lower-case input is accepted
    "dataAllowance": "50GB"
  });
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart/user123/items")
      .set_json(&payload)
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["items"].as_array().unwrap().len(), 1);
  let stored = &body["items"][0];
  assert_eq!(stored["productId"], "prod-001");
  assert_eq!(stored["planType"], "POSTPAID"); // normalized wire form
  assert_eq!(stored["dataAllowance"], "50GB");
  assert!(stored["id"].is_string());
}

#[actix_web::test]
async fn add_item_with_missing_fields_is_rejected_before_the_service_runs() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart/user123/items")
      .set_json(json!({ "productId": "prod-001" }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  let message = body["error"].as_str().unwrap();
  assert!(message.contains("productName"));
  assert!(message.contains("quantity"));
  assert!(message.contains("price"));

  // Nothing was added.
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/cart/user123").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["items"], json!([]));
}

#[actix_web::test]
async fn update_item_applies_partial_changes() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart/user123/items")
      .set_json(json!({
        "productId": "prod-001",
        "productName": "Premium Plan",
        "quantity": 1,
        "price": 49.99
      }))
      .to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  let item_id = body["items"][0]["id"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&format!("/api/cart/user123/items/{}", item_id))
      .set_json(json!({ "quantity": 3 }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["items"][0]["quantity"], 3);
  assert_eq!(body["items"][0]["price"], 49.99);
}

#[actix_web::test]
async fn updating_an_unknown_item_maps_to_404() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri("/api/cart/user123/items/5a1e306d-1e5e-4ac0-bd95-6c7c4b0f8c31")
      .set_json(json!({ "quantity": 2 }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Item not found in cart");
}

#[actix_web::test]
async fn malformed_item_ids_are_indistinguishable_from_missing_items() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri("/api/cart/user123/items/not-a-real-id")
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Item not found in cart");
}

#[actix_web::test]
async fn remove_item_returns_the_shrunken_cart() {
  init_tracing();
  let app = test_app!();

  for (product_id, name, quantity, price) in [("prod-001", "Premium Plan", 1, 49.99), ("prod-002", "Basic Plan", 2, 19.99)] {
    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/cart/user123/items")
        .set_json(json!({
          "productId": product_id,
          "productName": name,
          "quantity": quantity,
          "price": price
        }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/cart/user123").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  let first_item_id = body["items"][0]["id"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri(&format!("/api/cart/user123/items/{}", first_item_id))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["items"].as_array().unwrap().len(), 1);
  assert_eq!(body["items"][0]["productId"], "prod-002");
}

#[actix_web::test]
async fn clear_cart_keeps_the_cart_record() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart/user123/items")
      .set_json(json!({
        "productId": "prod-001",
        "productName": "Premium Plan",
        "quantity": 1,
        "price": 49.99
      }))
      .to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  let cart_id = body["id"].as_str().unwrap().to_string();

  let resp = test::call_service(&app, test::TestRequest::delete().uri("/api/cart/user123").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["id"], cart_id.as_str());
  assert_eq!(body["items"], json!([]));
}

#[actix_web::test]
async fn total_endpoint_reports_user_and_total() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart/user123/items")
      .set_json(json!({
        "productId": "prod-001",
        "productName": "Premium Plan",
        "quantity": 2,
        "price": 49.99
      }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/cart/user123/total").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "userId": "user123", "total": 99.98 }));
}

#[actix_web::test]
async fn foreign_item_mutations_map_to_404_for_the_other_user() {
  init_tracing();
  let app = test_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart/user-a/items")
      .set_json(json!({
        "productId": "prod-001",
        "productName": "Premium Plan",
        "quantity": 1,
        "price": 49.99
      }))
      .to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  let item_id = body["items"][0]["id"].as_str().unwrap().to_string();

  // User B holds A's item id; both mutation routes must 404.
  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&format!("/api/cart/user-b/items/{}", item_id))
      .set_json(json!({ "quantity": 99 }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri(&format!("/api/cart/user-b/items/{}", item_id))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Item not found in cart");
}

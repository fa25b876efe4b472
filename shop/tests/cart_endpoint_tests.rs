// tests/cart_endpoint_tests.rs
mod common;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shop_app::db::CartStore;
use shop_app::web::configure_app_routes;
use shop_app::AppState;
use std::str::FromStr;
use std::sync::Arc;

const CARTS: &str = "/api/v1/carts";

fn test_app(
  c: &Catalog,
) -> App<
  impl ServiceFactory<ServiceRequest, Config = (), Response = ServiceResponse, Error = actix_web::Error, InitError = ()>,
> {
  let store: Arc<dyn CartStore> = c.store.clone();
  let state = AppState::new(store);
  App::new().app_data(web::Data::new(state)).configure(configure_app_routes)
}

fn user_header(user_id: i64) -> (&'static str, String) {
  ("X-User-ID", user_id.to_string())
}

fn decimal_at(value: &Value) -> Decimal {
  Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

fn add_body(package_id: i64, quantity: i64, price: &str, shipping_option: &str) -> Value {
  json!({
    "quantity": quantity,
    "price": price,
    "package_id": package_id,
    "shipping_option": shipping_option,
  })
}

#[actix_rt::test]
async fn test_health_endpoint_is_public() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;
  let req = test::TestRequest::get().uri("/api/v1/health").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_rt::test]
async fn test_every_verb_requires_a_known_user() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let requests = [
    test::TestRequest::post().uri(CARTS).set_json(add_body(c.package.id, 1, "100", "STANDARD")),
    test::TestRequest::get().uri(CARTS),
    test::TestRequest::delete().uri(CARTS).set_json(json!({ "id": [1] })),
    test::TestRequest::patch().uri(CARTS).set_json(json!({ "id": 1, "quantity": 2 })),
  ];
  for req in requests {
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "INVALID_USER" }));
  }

  for bad_id in ["999999", "not-a-number"] {
    let req = test::TestRequest::get()
      .uri(CARTS)
      .insert_header(("X-User-ID", bad_id))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {bad_id}");
  }
  assert_eq!(c.store.cart_count(), 0);
}

#[actix_rt::test]
async fn test_post_creates_cart_line() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::post()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(add_body(c.package.id, 1, "100", "STANDARD"))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "result": "ADD_CART" }));
  assert_eq!(c.store.cart_count(), 1);
}

#[actix_rt::test]
async fn test_post_accepts_numeric_strings() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::post()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(json!({
      "quantity": "2",
      "price": 200,
      "package_id": c.package.id.to_string(),
      "shipping_option": "EXPRESS",
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_post_with_zero_quantity_is_deselected() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::post()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(add_body(c.package.id, 0, "0", "STANDARD"))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "message": "DESELECTED_QUANTITY" }));
  assert_eq!(c.store.cart_count(), 0);
}

#[actix_rt::test]
async fn test_post_with_missing_field_is_key_error() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::post()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(json!({ "quantity": 1, "price": "100", "package_id": c.package.id }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "message": "KEY_ERROR" }));
}

#[actix_rt::test]
async fn test_post_with_malformed_json_is_bad_request() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::post()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .insert_header(("content-type", "application/json"))
    .set_payload("{\"quantity\": 1,")
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["message"].is_string());
}

#[actix_rt::test]
async fn test_post_with_unknown_shipping_option_is_not_found() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::post()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(add_body(c.package.id, 1, "100", "DRONE"))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "message": "SHIPPING_OPTION_DOES_NOT_EXIST" }));
}

#[actix_rt::test]
async fn test_get_lists_lines_with_nested_total() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  for (package_id, price, option) in [(c.package.id, "100", "STANDARD"), (c.premium_package.id, "149.99", "EXPRESS")] {
    let req = test::TestRequest::post()
      .uri(CARTS)
      .insert_header(user_header(c.user.id))
      .set_json(add_body(package_id, 1, price, option))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
  }

  let req = test::TestRequest::get()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;

  let result = body["result"].as_array().expect("result is an array");
  assert_eq!(result.len(), 1);
  let listing = &result[0];
  assert_eq!(decimal_at(&listing["total_price"]["total_price"]), Decimal::new(49998, 2));

  let lines = listing["cart"].as_array().expect("cart is an array");
  assert_eq!(lines.len(), 2);
  assert_eq!(lines[0]["name"], json!(c.package.name));
  assert_eq!(lines[0]["image"], json!(c.package.thumbnail_image));
  assert_eq!(lines[0]["option"], json!("STANDARD"));
  assert_eq!(lines[0]["quantity"], json!(2));
  assert_eq!(decimal_at(&lines[0]["price"]), Decimal::new(200, 0));
  assert_eq!(lines[1]["option"], json!("EXPRESS"));
  assert!(lines[1]["id"].is_i64());
}

#[actix_rt::test]
async fn test_get_of_empty_cart_has_null_total() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::get()
    .uri(CARTS)
    .insert_header(user_header(c.other_user.id))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(
    body,
    json!({ "result": [{ "total_price": { "total_price": null }, "cart": [] }] })
  );
}

#[actix_rt::test]
async fn test_delete_removes_listed_rows() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;
  let keep = shop_app::services::cart_service::add_to_cart(
    c.store.as_ref(),
    &c.user,
    add_command(&c.package, 1, Decimal::new(100, 0), "STANDARD"),
  )
  .await
  .unwrap();
  let gone = shop_app::services::cart_service::add_to_cart(
    c.store.as_ref(),
    &c.user,
    add_command(&c.premium_package, 1, Decimal::new(100, 0), "STANDARD"),
  )
  .await
  .unwrap();

  let req = test::TestRequest::delete()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(json!({ "id": [gone.id, 777_777] }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "result": "DELETE_CART" }));
  assert!(c.store.find_cart(keep.id).await.unwrap().is_some());
  assert!(c.store.find_cart(gone.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_delete_with_malformed_ids_answers_unauthorized() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::delete()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(json!({ "id": ["abc"] }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::delete()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "message": "KEY_ERROR" }));
}

#[actix_rt::test]
async fn test_patch_reprices_line() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;
  let cart = shop_app::services::cart_service::add_to_cart(
    c.store.as_ref(),
    &c.user,
    add_command(&c.package, 1, Decimal::new(100, 0), "STANDARD"),
  )
  .await
  .unwrap();

  let req = test::TestRequest::patch()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(json!({ "id": cart.id, "quantity": 3 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "result": "QUANTITY_IN_CART" }));

  let req = test::TestRequest::get()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let line = &body["result"][0]["cart"][0];
  assert_eq!(line["quantity"], json!(3));
  assert_eq!(decimal_at(&line["price"]), Decimal::new(300, 0));
  assert_eq!(line["price"], json!("300.00"));
}

#[actix_rt::test]
async fn test_patch_with_zero_quantity_uses_messages_key() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;
  let cart = shop_app::services::cart_service::add_to_cart(
    c.store.as_ref(),
    &c.user,
    add_command(&c.package, 1, Decimal::new(100, 0), "STANDARD"),
  )
  .await
  .unwrap();

  let req = test::TestRequest::patch()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(json!({ "id": cart.id, "quantity": 0 }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "messages": "DESELECTED_QUANTITY" }));
  assert_eq!(c.store.find_cart(cart.id).await.unwrap().unwrap().quantity, 2);
}

#[actix_rt::test]
async fn test_patch_of_unknown_cart_is_not_found() {
  let c = catalog().await;
  let app = test::init_service(test_app(&c)).await;

  let req = test::TestRequest::patch()
    .uri(CARTS)
    .insert_header(user_header(c.user.id))
    .set_json(json!({ "id": 55_555, "quantity": 1 }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "message": "CART_DOES_NOT_EXIST" }));
}

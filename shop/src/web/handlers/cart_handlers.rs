// shop/src/web/handlers/cart_handlers.rs

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::cart_service;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;
use crate::web::payloads::{
  parse_body, AddToCartPayload, CartListing, DeleteCartItemsPayload, ResultBody, UpdateQuantityPayload,
};

/// The four verbs of the cart resource. Each renders some failures
/// differently, so errors carry the operation they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
  Add,
  List,
  Delete,
  UpdateQuantity,
}

impl CartOperation {
  pub fn as_str(self) -> &'static str {
    match self {
      CartOperation::Add => "add_to_cart",
      CartOperation::List => "list_cart",
      CartOperation::Delete => "delete_cart_items",
      CartOperation::UpdateQuantity => "update_quantity",
    }
  }

  /// Status for malformed or constraint-violating input. Only adding reports
  /// 400; the other verbs have always answered 401.
  fn validation_status(self) -> StatusCode {
    match self {
      CartOperation::Add => StatusCode::BAD_REQUEST,
      CartOperation::List | CartOperation::Delete | CartOperation::UpdateQuantity => StatusCode::UNAUTHORIZED,
    }
  }

  pub fn fail(self, source: AppError) -> CartEndpointError {
    CartEndpointError {
      operation: self,
      source,
    }
  }
}

impl fmt::Display for CartOperation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct CartEndpointError {
  pub operation: CartOperation,
  #[source]
  pub source: AppError,
}

impl ResponseError for CartEndpointError {
  fn status_code(&self) -> StatusCode {
    match &self.source {
      AppError::Validation(_) => self.operation.validation_status(),
      other => other.status_code(),
    }
  }

  fn error_response(&self) -> HttpResponse {
    // The quantity update has always answered with a `messages` key here.
    let message_key = match (&self.source, self.operation) {
      (AppError::DeselectedQuantity, CartOperation::UpdateQuantity) => "messages",
      _ => "message",
    };
    tracing::debug!(operation = %self.operation, "Rendering cart endpoint error.");
    self.source.respond(self.status_code(), message_key)
  }
}

/// POST: create the (user, package) line or increment it.
#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, body, auth_user),
  fields(user_id = auth_user.user.id)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  body: web::Bytes,
) -> Result<HttpResponse, CartEndpointError> {
  let operation = CartOperation::Add;
  let command = parse_body::<AddToCartPayload>(&body)
    .and_then(AddToCartPayload::into_command)
    .map_err(|e| operation.fail(e))?;

  let cart = cart_service::add_to_cart(app_state.store.as_ref(), &auth_user.user, command)
    .await
    .map_err(|e| operation.fail(e))?;

  info!(cart_id = cart.id, "Add to cart successful.");
  Ok(HttpResponse::Created().json(ResultBody { result: "ADD_CART" }))
}

/// GET: every line of the caller's cart plus the price total.
#[instrument(name = "handler::list_cart", skip(app_state, auth_user), fields(user_id = auth_user.user.id))]
pub async fn list_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, CartEndpointError> {
  let summary = cart_service::list_cart(app_state.store.as_ref(), &auth_user.user)
    .await
    .map_err(|e| CartOperation::List.fail(e))?;

  Ok(HttpResponse::Ok().json(ResultBody {
    result: vec![CartListing::from(summary)],
  }))
}

/// DELETE: remove the cart rows listed under `id`.
#[instrument(
  name = "handler::delete_cart_items",
  skip(app_state, body, auth_user),
  fields(user_id = auth_user.user.id)
)]
pub async fn delete_cart_items_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  body: web::Bytes,
) -> Result<HttpResponse, CartEndpointError> {
  let operation = CartOperation::Delete;
  let command = parse_body::<DeleteCartItemsPayload>(&body)
    .and_then(DeleteCartItemsPayload::into_command)
    .map_err(|e| operation.fail(e))?;

  let removed = cart_service::delete_cart_items(app_state.store.as_ref(), command)
    .await
    .map_err(|e| operation.fail(e))?;

  info!(removed, "Delete cart items successful.");
  Ok(HttpResponse::Ok().json(ResultBody { result: "DELETE_CART" }))
}

/// PATCH: set a line's quantity and reprice it from the package unit price.
#[instrument(
  name = "handler::update_quantity",
  skip(app_state, body, auth_user),
  fields(user_id = auth_user.user.id)
)]
pub async fn update_quantity_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  body: web::Bytes,
) -> Result<HttpResponse, CartEndpointError> {
  let operation = CartOperation::UpdateQuantity;
  let command = parse_body::<UpdateQuantityPayload>(&body)
    .and_then(UpdateQuantityPayload::into_command)
    .map_err(|e| operation.fail(e))?;

  let cart = cart_service::update_quantity(app_state.store.as_ref(), command)
    .await
    .map_err(|e| operation.fail(e))?;

  info!(cart_id = cart.id, quantity = cart.quantity, "Quantity update successful.");
  Ok(HttpResponse::Ok().json(ResultBody {
    result: "QUANTITY_IN_CART",
  }))
}

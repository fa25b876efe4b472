// shop/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// A quantity below one was submitted.
  #[error("Deselected quantity")]
  DeselectedQuantity,

  /// A required body field was absent.
  #[error("Missing required field")]
  KeyError,

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  /// Carries the wire code, e.g. `CART_DOES_NOT_EXIST`.
  #[error("Resource Not Found: {0}")]
  NotFound(&'static str),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// The value placed under the `message` key of an error body. Server-side
  /// failures get a fixed code so no internals leak to clients.
  pub fn message(&self) -> &str {
    match self {
      AppError::DeselectedQuantity => "DESELECTED_QUANTITY",
      AppError::KeyError => "KEY_ERROR",
      AppError::Validation(m) => m,
      AppError::Auth(_) => "INVALID_USER",
      AppError::NotFound(code) => code,
      AppError::Config(_) => "CONFIGURATION_ERROR",
      AppError::Sqlx(_) | AppError::Migrate(_) => "DATABASE_ERROR",
      AppError::Internal(_) => "INTERNAL_ERROR",
    }
  }

  pub(crate) fn respond(&self, status: StatusCode, message_key: &str) -> HttpResponse {
    if status.is_server_error() {
      tracing::error!(application_error = %self, status = status.as_u16(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with error");
    }
    let mut body = Map::new();
    body.insert(message_key.to_owned(), Value::from(self.message()));
    HttpResponse::build(status).json(Value::Object(body))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::DeselectedQuantity | AppError::KeyError | AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    self.respond(self.status_code(), "message")
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

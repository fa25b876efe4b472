// shop/src/web/auth.rs

//! Request authentication.
//!
//! The service sits behind a gateway that authenticates the caller and
//! forwards the account id in `X-User-ID`. The extractor resolves that id to a
//! stored user and hands it to the handler as a plain value.

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "X-User-ID";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user: User,
}

fn user_id_from_request(req: &HttpRequest) -> Result<i64, AppError> {
  let raw = req
    .headers()
    .get(USER_ID_HEADER)
    .ok_or_else(|| AppError::Auth(format!("Missing {} header", USER_ID_HEADER)))?;
  raw
    .to_str()
    .ok()
    .and_then(|value| value.trim().parse::<i64>().ok())
    .ok_or_else(|| AppError::Auth(format!("Malformed {} header", USER_ID_HEADER)))
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let user_id = user_id_from_request(req);

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("AppState is not registered with the app".to_string()))?;
      let user_id = user_id.map_err(|e| {
        warn!(error = %e, "AuthenticatedUser extractor: rejecting request.");
        e
      })?;

      match state.store.find_user(user_id).await? {
        Some(user) => Ok(AuthenticatedUser { user }),
        None => {
          warn!(user_id, "AuthenticatedUser extractor: unknown user.");
          Err(AppError::Auth(format!("User {} does not exist", user_id)))
        }
      }
    })
  }
}

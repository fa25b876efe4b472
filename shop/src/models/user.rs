// shop/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Row of the `users` table. Accounts are created by the user service; the cart
/// service only reads them to resolve the requesting user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub name: String,
  pub address: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send the stored password to a client
  pub password: String,
  pub phone_number: String,
}

/// Insert shape for a user, used when seeding demo data.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name: String,
  pub address: String,
  pub email: String,
  pub password: String,
  pub phone_number: String,
}

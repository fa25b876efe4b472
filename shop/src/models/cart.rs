// shop/src/models/cart.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// One cart line. At most one row exists per (user_id, package_id).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Cart {
  pub id: i64,
  pub user_id: i64,
  pub package_id: i64,
  pub quantity: i32,
  pub price: Decimal,
  pub shipping_option_id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Values used to seed a cart row when it does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
  pub quantity: i32,
  pub price: Decimal,
  pub shipping_option_id: i64,
}

/// Read model for listing a cart: the row joined with its package and
/// shipping option. Field names are the wire names.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CartLine {
  pub id: i64,
  pub image: String,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub option: String,
}

// shop/src/models/shipping_option.rs

use serde::Serialize;
use sqlx::FromRow;

/// A delivery method. Clients refer to it by its label, never by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ShippingOption {
  pub id: i64,
  pub shipping_option: String,
}

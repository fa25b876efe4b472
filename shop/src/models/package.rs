// shop/src/models/package.rs

use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Package {
  pub id: i64,
  pub name: String,
  pub thumbnail_image: String,
  /// Unit price.
  pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewPackage {
  pub name: String,
  pub thumbnail_image: String,
  pub price: Decimal,
}

// shop/src/db/mod.rs

//! Storage port for the cart service.
//!
//! Handlers and services only ever see `dyn CartStore`; the backend is picked
//! at startup from [`StorageBackend`].

pub mod memory;
pub mod postgres;
pub mod seed;

use crate::config::{AppConfig, StorageBackend};
use crate::errors::Result;
use crate::models::{Cart, CartLine, NewCart, NewPackage, NewUser, Package, ShippingOption, User};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

pub use memory::MemoryCartStore;
pub use postgres::PgCartStore;

#[async_trait]
pub trait CartStore: Send + Sync {
  async fn find_user(&self, user_id: i64) -> Result<Option<User>>;

  async fn find_package(&self, package_id: i64) -> Result<Option<Package>>;

  /// Looks a shipping option up by its label.
  async fn find_shipping_option(&self, label: &str) -> Result<Option<ShippingOption>>;

  async fn find_cart(&self, cart_id: i64) -> Result<Option<Cart>>;

  /// Returns the row for (user_id, package_id), inserting it from `defaults`
  /// first if absent. The flag is `true` when the row was inserted.
  async fn get_or_create_cart(&self, user_id: i64, package_id: i64, defaults: NewCart) -> Result<(Cart, bool)>;

  /// Persists quantity and price of an existing row and returns the stored row.
  async fn save_cart(&self, cart: &Cart) -> Result<Cart>;

  /// All rows of a user joined with package and shipping option, by id.
  async fn list_cart_lines(&self, user_id: i64) -> Result<Vec<CartLine>>;

  /// Sum of the user's row prices; `None` when the user has no rows.
  async fn sum_cart_prices(&self, user_id: i64) -> Result<Option<Decimal>>;

  /// Deletes every row whose id is listed, returning how many were removed.
  async fn delete_carts(&self, cart_ids: &[i64]) -> Result<u64>;

  async fn create_user(&self, user: NewUser) -> Result<User>;

  async fn create_package(&self, package: NewPackage) -> Result<Package>;

  async fn create_shipping_option(&self, label: &str) -> Result<ShippingOption>;
}

/// Opens the store selected by the configuration.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn CartStore>> {
  match &config.storage {
    StorageBackend::Memory => {
      tracing::info!("Using in-memory cart storage.");
      Ok(Arc::new(MemoryCartStore::new()))
    }
    StorageBackend::Postgres {
      database_url,
      max_connections,
    } => {
      let store = PgCartStore::connect(database_url, *max_connections).await?;
      if config.run_migrations {
        store.migrate().await?;
      }
      Ok(Arc::new(store))
    }
  }
}

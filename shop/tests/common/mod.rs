// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use shop_app::db::{CartStore, MemoryCartStore};
use shop_app::models::{NewPackage, NewUser, Package, ShippingOption, User};
use shop_app::services::cart_service::AddToCart;
use std::sync::Arc;
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A store holding two users, two packages and two shipping options.
pub struct Catalog {
  pub store: Arc<MemoryCartStore>,
  pub user: User,
  pub other_user: User,
  /// Unit price 100.
  pub package: Package,
  /// Unit price 149.99.
  pub premium_package: Package,
  pub standard: ShippingOption,
  pub express: ShippingOption,
}

fn new_user(name: &str, email: &str) -> NewUser {
  NewUser {
    name: name.to_string(),
    address: "12 Teheran-ro, Seoul".to_string(),
    email: email.to_string(),
    password: "hashed-elsewhere".to_string(),
    phone_number: "010-1234-5678".to_string(),
  }
}

pub async fn catalog() -> Catalog {
  setup_tracing();
  let store = Arc::new(MemoryCartStore::new());

  let user = store.create_user(new_user("Kim", "kim@example.com")).await.unwrap();
  let other_user = store.create_user(new_user("Lee", "lee@example.com")).await.unwrap();
  let package = store
    .create_package(NewPackage {
      name: "Jeju Island 3 nights".to_string(),
      thumbnail_image: "https://images.example.com/jeju.png".to_string(),
      price: Decimal::new(100, 0),
    })
    .await
    .unwrap();
  let premium_package = store
    .create_package(NewPackage {
      name: "Busan city tour".to_string(),
      thumbnail_image: "https://images.example.com/busan.png".to_string(),
      price: Decimal::new(14999, 2),
    })
    .await
    .unwrap();
  let standard = store.create_shipping_option("STANDARD").await.unwrap();
  let express = store.create_shipping_option("EXPRESS").await.unwrap();

  Catalog {
    store,
    user,
    other_user,
    package,
    premium_package,
    standard,
    express,
  }
}

pub fn add_command(package: &Package, quantity: i64, price: Decimal, shipping_option: &str) -> AddToCart {
  AddToCart {
    package_id: package.id,
    quantity,
    price,
    shipping_option: shipping_option.to_string(),
  }
}

// shop/src/db/seed.rs

//! Demo data for local runs (`SEED_DB=true`).

use crate::db::CartStore;
use crate::errors::Result;
use crate::models::{NewPackage, NewUser};
use rust_decimal::Decimal;
use tracing::info;

pub const DEMO_USER_EMAIL: &str = "demo@shop.local";
pub const DEMO_SHIPPING_OPTIONS: [&str; 2] = ["STANDARD", "EXPRESS"];

/// Inserts one user, the demo shipping options and two packages. Does
/// nothing when the first shipping option already exists, so it is safe to
/// run on every start.
pub async fn seed_demo_data(store: &dyn CartStore) -> Result<()> {
  if store.find_shipping_option(DEMO_SHIPPING_OPTIONS[0]).await?.is_some() {
    info!("Demo data already present, skipping seed.");
    return Ok(());
  }

  for label in DEMO_SHIPPING_OPTIONS {
    store.create_shipping_option(label).await?;
  }

  let user = store
    .create_user(NewUser {
      name: "Demo".to_string(),
      address: "1 Market Street".to_string(),
      email: DEMO_USER_EMAIL.to_string(),
      password: "not-a-real-password".to_string(),
      phone_number: "000-0000-0000".to_string(),
    })
    .await?;

  let packages = [
    ("Jeju Island 3 nights", "https://images.shop.local/jeju.png", Decimal::new(32_900_000, 2)),
    ("Busan city tour", "https://images.shop.local/busan.png", Decimal::new(8_900_000, 2)),
  ];
  for (name, thumbnail_image, price) in packages {
    store
      .create_package(NewPackage {
        name: name.to_string(),
        thumbnail_image: thumbnail_image.to_string(),
        price,
      })
      .await?;
  }

  info!(demo_user_id = user.id, "Demo data seeded.");
  Ok(())
}

// shop/src/db/memory.rs

use crate::db::CartStore;
use crate::errors::{AppError, Result};
use crate::models::{Cart, CartLine, NewCart, NewPackage, NewUser, Package, ShippingOption, User};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Tables {
  users: BTreeMap<i64, User>,
  packages: BTreeMap<i64, Package>,
  options: BTreeMap<i64, ShippingOption>,
  carts: BTreeMap<i64, Cart>,
  last_id: i64,
}

impl Tables {
  // One sequence shared by every table.
  fn next_id(&mut self) -> i64 {
    self.last_id += 1;
    self.last_id
  }
}

/// `CartStore` kept in process memory. Used for local runs and tests.
///
/// Every operation takes the lock once, so get-or-create cannot produce two
/// rows for the same (user, package) pair.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
  tables: RwLock<Tables>,
}

impl MemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of cart rows across all users.
  pub fn cart_count(&self) -> usize {
    self.tables.read().carts.len()
  }
}

#[async_trait]
impl CartStore for MemoryCartStore {
  async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
    Ok(self.tables.read().users.get(&user_id).cloned())
  }

  async fn find_package(&self, package_id: i64) -> Result<Option<Package>> {
    Ok(self.tables.read().packages.get(&package_id).cloned())
  }

  async fn find_shipping_option(&self, label: &str) -> Result<Option<ShippingOption>> {
    let tables = self.tables.read();
    Ok(tables.options.values().find(|o| o.shipping_option == label).cloned())
  }

  async fn find_cart(&self, cart_id: i64) -> Result<Option<Cart>> {
    Ok(self.tables.read().carts.get(&cart_id).cloned())
  }

  async fn get_or_create_cart(&self, user_id: i64, package_id: i64, defaults: NewCart) -> Result<(Cart, bool)> {
    let mut tables = self.tables.write();
    if let Some(existing) = tables
      .carts
      .values()
      .find(|c| c.user_id == user_id && c.package_id == package_id)
    {
      return Ok((existing.clone(), false));
    }

    if !tables.users.contains_key(&user_id)
      || !tables.packages.contains_key(&package_id)
      || !tables.options.contains_key(&defaults.shipping_option_id)
    {
      return Err(AppError::Validation("INVALID_CART".to_string()));
    }
    if defaults.quantity < 1 {
      return Err(AppError::Validation("INVALID_CART".to_string()));
    }

    let now = Utc::now();
    let cart = Cart {
      id: tables.next_id(),
      user_id,
      package_id,
      quantity: defaults.quantity,
      price: defaults.price,
      shipping_option_id: defaults.shipping_option_id,
      created_at: now,
      updated_at: now,
    };
    tables.carts.insert(cart.id, cart.clone());
    Ok((cart, true))
  }

  async fn save_cart(&self, cart: &Cart) -> Result<Cart> {
    if cart.quantity < 1 {
      return Err(AppError::Validation("INVALID_CART".to_string()));
    }
    let mut tables = self.tables.write();
    let stored = tables
      .carts
      .get_mut(&cart.id)
      .ok_or(AppError::NotFound("CART_DOES_NOT_EXIST"))?;
    stored.quantity = cart.quantity;
    stored.price = cart.price;
    stored.updated_at = Utc::now();
    Ok(stored.clone())
  }

  async fn list_cart_lines(&self, user_id: i64) -> Result<Vec<CartLine>> {
    let tables = self.tables.read();
    let mut lines = Vec::new();
    for cart in tables.carts.values().filter(|c| c.user_id == user_id) {
      // Inner-join semantics: rows whose package or option vanished are skipped.
      let (Some(package), Some(option)) = (
        tables.packages.get(&cart.package_id),
        tables.options.get(&cart.shipping_option_id),
      ) else {
        continue;
      };
      lines.push(CartLine {
        id: cart.id,
        image: package.thumbnail_image.clone(),
        name: package.name.clone(),
        price: cart.price,
        quantity: cart.quantity,
        option: option.shipping_option.clone(),
      });
    }
    Ok(lines)
  }

  async fn sum_cart_prices(&self, user_id: i64) -> Result<Option<Decimal>> {
    let tables = self.tables.read();
    let mut prices = tables.carts.values().filter(|c| c.user_id == user_id).map(|c| c.price);
    let Some(first) = prices.next() else {
      return Ok(None);
    };
    prices
      .try_fold(first, |total, price| total.checked_add(price))
      .map(Some)
      .ok_or_else(|| AppError::Validation("PRICE_OUT_OF_RANGE".to_string()))
  }

  async fn delete_carts(&self, cart_ids: &[i64]) -> Result<u64> {
    let mut tables = self.tables.write();
    let removed = cart_ids.iter().filter(|id| tables.carts.remove(*id).is_some()).count();
    Ok(removed as u64)
  }

  async fn create_user(&self, user: NewUser) -> Result<User> {
    let mut tables = self.tables.write();
    if tables.users.values().any(|u| u.email == user.email) {
      return Err(AppError::Validation("EMAIL_ALREADY_EXISTS".to_string()));
    }
    let now = Utc::now();
    let created = User {
      id: tables.next_id(),
      created_at: now,
      updated_at: now,
      name: user.name,
      address: user.address,
      email: user.email,
      password: user.password,
      phone_number: user.phone_number,
    };
    tables.users.insert(created.id, created.clone());
    Ok(created)
  }

  async fn create_package(&self, package: NewPackage) -> Result<Package> {
    let mut tables = self.tables.write();
    let created = Package {
      id: tables.next_id(),
      name: package.name,
      thumbnail_image: package.thumbnail_image,
      price: package.price,
    };
    tables.packages.insert(created.id, created.clone());
    Ok(created)
  }

  async fn create_shipping_option(&self, label: &str) -> Result<ShippingOption> {
    let mut tables = self.tables.write();
    if tables.options.values().any(|o| o.shipping_option == label) {
      return Err(AppError::Validation("SHIPPING_OPTION_ALREADY_EXISTS".to_string()));
    }
    let created = ShippingOption {
      id: tables.next_id(),
      shipping_option: label.to_string(),
    };
    tables.options.insert(created.id, created.clone());
    Ok(created)
  }
}

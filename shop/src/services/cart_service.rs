// shop/src/services/cart_service.rs

//! Cart operations: create-or-increment, list with total, bulk delete and
//! quantity update. Each function validates its command, talks to the store
//! and returns the resulting state.

use crate::db::CartStore;
use crate::errors::{AppError, Result};
use crate::models::{Cart, CartLine, NewCart, User};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct AddToCart {
  pub package_id: i64,
  pub quantity: i64,
  pub price: Decimal,
  /// Label of the shipping option, e.g. `"STANDARD"`.
  pub shipping_option: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCartItems {
  pub cart_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuantity {
  pub cart_id: i64,
  pub quantity: i64,
}

/// A user's cart as listed to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
  /// `None` when the cart is empty.
  pub total_price: Option<Decimal>,
  pub lines: Vec<CartLine>,
}

/// Prices are stored as `NUMERIC(12, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0); // 10^10

/// Rounds to cents the way PostgreSQL does and pins the scale, so every
/// backend stores and renders `"300.00"`. Values whose magnitude reaches
/// 10^10 do not fit the column.
fn stored_price(price: Decimal) -> Result<Decimal> {
  let mut price = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
  if price.abs() >= PRICE_LIMIT {
    return Err(AppError::Validation("PRICE_OUT_OF_RANGE".to_string()));
  }
  price.rescale(PRICE_SCALE);
  Ok(price)
}

fn selected_quantity(quantity: i64) -> Result<i32> {
  if quantity < 1 {
    return Err(AppError::DeselectedQuantity);
  }
  i32::try_from(quantity).map_err(|_| AppError::Validation("QUANTITY_OUT_OF_RANGE".to_string()))
}

/// Adds `command.quantity` units of a package to the user's cart.
///
/// The row for (user, package) is fetched or created with the submitted
/// values, and the submitted quantity and price are then added on top. A
/// brand-new row therefore holds twice the submitted amounts; existing rows
/// grow by exactly the submitted amounts. The shipping option of an existing
/// row is left unchanged.
#[instrument(
  name = "cart_service::add_to_cart",
  skip(store, user, command),
  fields(user_id = user.id, package_id = command.package_id, quantity = command.quantity),
  err(Display)
)]
pub async fn add_to_cart(store: &dyn CartStore, user: &User, command: AddToCart) -> Result<Cart> {
  let quantity = selected_quantity(command.quantity)?;
  let price = stored_price(command.price)?;

  let option = store
    .find_shipping_option(&command.shipping_option)
    .await?
    .ok_or_else(|| {
      warn!(label = %command.shipping_option, "Unknown shipping option.");
      AppError::NotFound("SHIPPING_OPTION_DOES_NOT_EXIST")
    })?;

  if store.find_package(command.package_id).await?.is_none() {
    warn!("Package does not exist.");
    return Err(AppError::NotFound("PACKAGE_DOES_NOT_EXIST"));
  }

  let (mut cart, created) = store
    .get_or_create_cart(
      user.id,
      command.package_id,
      NewCart {
        quantity,
        price,
        shipping_option_id: option.id,
      },
    )
    .await?;
  debug!(cart_id = cart.id, created, "Cart row resolved.");

  let grown = cart
    .quantity
    .checked_add(quantity)
    .ok_or_else(|| AppError::Validation("QUANTITY_OUT_OF_RANGE".to_string()))
    .and_then(|quantity| {
      let price = cart
        .price
        .checked_add(price)
        .ok_or_else(|| AppError::Validation("PRICE_OUT_OF_RANGE".to_string()))
        .and_then(stored_price)?;
      Ok((quantity, price))
    });
  let (quantity, price) = match grown {
    Ok(grown) => grown,
    Err(e) => {
      // A row inserted by this call must not outlive the failed add.
      if created {
        warn!(cart_id = cart.id, "Removing freshly inserted cart row after overflow.");
        store.delete_carts(&[cart.id]).await?;
      }
      return Err(e);
    }
  };
  cart.quantity = quantity;
  cart.price = price;

  let saved = store.save_cart(&cart).await?;
  info!(
    cart_id = saved.id,
    created,
    quantity = saved.quantity,
    price = %saved.price,
    "Cart line stored."
  );
  Ok(saved)
}

/// Lists every line of the user's cart together with the price total.
#[instrument(name = "cart_service::list_cart", skip(store, user), fields(user_id = user.id), err(Display))]
pub async fn list_cart(store: &dyn CartStore, user: &User) -> Result<CartSummary> {
  let lines = store.list_cart_lines(user.id).await?;
  let total_price = store.sum_cart_prices(user.id).await?;
  debug!(lines = lines.len(), "Cart listed.");
  Ok(CartSummary { total_price, lines })
}

/// Deletes the listed cart rows. Ids that match nothing are ignored. Rows are
/// matched by id only, whichever user owns them.
#[instrument(name = "cart_service::delete_cart_items", skip(store, command), fields(requested = command.cart_ids.len()), err(Display))]
pub async fn delete_cart_items(store: &dyn CartStore, command: DeleteCartItems) -> Result<u64> {
  let removed = store.delete_carts(&command.cart_ids).await?;
  info!(removed, "Cart rows deleted.");
  Ok(removed)
}

/// Overwrites a row's quantity and reprices it as quantity × unit price.
///
/// Both factors are integers: the package's unit price is truncated toward
/// zero before multiplying.
#[instrument(
  name = "cart_service::update_quantity",
  skip(store, command),
  fields(cart_id = command.cart_id, quantity = command.quantity),
  err(Display)
)]
pub async fn update_quantity(store: &dyn CartStore, command: UpdateQuantity) -> Result<Cart> {
  let quantity = selected_quantity(command.quantity)?;

  let mut cart = store
    .find_cart(command.cart_id)
    .await?
    .ok_or(AppError::NotFound("CART_DOES_NOT_EXIST"))?;
  let package = store
    .find_package(cart.package_id)
    .await?
    .ok_or(AppError::NotFound("PACKAGE_DOES_NOT_EXIST"))?;

  let unit_price = package
    .price
    .trunc()
    .to_i64()
    .ok_or_else(|| AppError::Validation("PRICE_OUT_OF_RANGE".to_string()))?;
  let total = i64::from(quantity)
    .checked_mul(unit_price)
    .ok_or_else(|| AppError::Validation("PRICE_OUT_OF_RANGE".to_string()))?;

  cart.quantity = quantity;
  cart.price = stored_price(Decimal::from(total))?;

  let saved = store.save_cart(&cart).await?;
  info!(cart_id = saved.id, price = %saved.price, "Cart quantity updated.");
  Ok(saved)
}

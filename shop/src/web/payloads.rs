// shop/src/web/payloads.rs

//! JSON request and response bodies of the cart resource.
//!
//! Request payloads keep every field optional so that an absent field is
//! reported as `KEY_ERROR` by `into_command`, not as a serde error.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::models::CartLine;
use crate::services::cart_service::{AddToCart, CartSummary, DeleteCartItems, UpdateQuantity};

/// Integer sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LenientInt {
  Number(i64),
  Text(String),
}

impl LenientInt {
  fn into_i64(self, field: &str) -> Result<i64> {
    match self {
      LenientInt::Number(value) => Ok(value),
      LenientInt::Text(text) => text
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("INVALID_{}", field.to_ascii_uppercase()))),
    }
  }
}

/// Parses a request body. An empty body reads as `{}`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
  let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"{}" } else { body };
  serde_json::from_slice(body).map_err(|e| AppError::Validation(e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartPayload {
  pub quantity: Option<LenientInt>,
  pub price: Option<Decimal>,
  pub package_id: Option<LenientInt>,
  pub shipping_option: Option<String>,
}

impl AddToCartPayload {
  pub fn into_command(self) -> Result<AddToCart> {
    let (Some(quantity), Some(price), Some(package_id), Some(shipping_option)) =
      (self.quantity, self.price, self.package_id, self.shipping_option)
    else {
      return Err(AppError::KeyError);
    };
    Ok(AddToCart {
      package_id: package_id.into_i64("package_id")?,
      quantity: quantity.into_i64("quantity")?,
      price,
      shipping_option,
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct DeleteCartItemsPayload {
  pub id: Option<Vec<LenientInt>>,
}

impl DeleteCartItemsPayload {
  pub fn into_command(self) -> Result<DeleteCartItems> {
    let ids = self.id.ok_or(AppError::KeyError)?;
    let cart_ids = ids
      .into_iter()
      .map(|id| id.into_i64("id"))
      .collect::<Result<Vec<_>>>()?;
    Ok(DeleteCartItems { cart_ids })
  }
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityPayload {
  pub id: Option<LenientInt>,
  pub quantity: Option<LenientInt>,
}

impl UpdateQuantityPayload {
  pub fn into_command(self) -> Result<UpdateQuantity> {
    let (Some(id), Some(quantity)) = (self.id, self.quantity) else {
      return Err(AppError::KeyError);
    };
    Ok(UpdateQuantity {
      cart_id: id.into_i64("id")?,
      quantity: quantity.into_i64("quantity")?,
    })
  }
}

/// `{"result": ...}` envelope used by every success response.
#[derive(Debug, Serialize)]
pub struct ResultBody<T> {
  pub result: T,
}

/// The aggregate is sent as an object holding its own key, e.g.
/// `{"total_price": "300.00"}`, which clients already depend on.
#[derive(Debug, Serialize)]
pub struct TotalPrice {
  pub total_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct CartListing {
  pub total_price: TotalPrice,
  pub cart: Vec<CartLine>,
}

impl From<CartSummary> for CartListing {
  fn from(summary: CartSummary) -> Self {
    Self {
      total_price: TotalPrice {
        total_price: summary.total_price,
      },
      cart: summary.lines,
    }
  }
}

// shop/src/db/postgres.rs

use crate::db::CartStore;
use crate::errors::{AppError, Result};
use crate::models::{Cart, CartLine, NewCart, NewPackage, NewUser, Package, ShippingOption, User};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info, instrument};

const USER_COLUMNS: &str = "id, created_at, updated_at, name, address, email, password, phone_number";
const CART_COLUMNS: &str = "id, user_id, package_id, quantity, price, shipping_option_id, created_at, updated_at";

/// `CartStore` backed by PostgreSQL through a `sqlx` pool, using runtime queries.
#[derive(Debug, Clone)]
pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await
      .map_err(|e| {
        error!(error = %e, "Failed to connect to the database.");
        AppError::Sqlx(e)
      })?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  async fn select_cart_for(&self, user_id: i64, package_id: i64) -> Result<Option<Cart>> {
    let sql = format!("SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1 AND package_id = $2");
    let cart = sqlx::query_as::<_, Cart>(&sql)
      .bind(user_id)
      .bind(package_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }
}

// SQLSTATE numeric_value_out_of_range
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Turns constraint violations into client-facing validation errors.
fn constraint_violation_as(code: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
  move |err| match &err {
    sqlx::Error::Database(db_err)
      if db_err.is_unique_violation() || db_err.is_check_violation() || db_err.is_foreign_key_violation() =>
    {
      AppError::Validation(code.to_string())
    }
    sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) => {
      AppError::Validation("PRICE_OUT_OF_RANGE".to_string())
    }
    _ => AppError::Sqlx(err),
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as::<_, User>(&sql)
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn find_package(&self, package_id: i64) -> Result<Option<Package>> {
    let package = sqlx::query_as::<_, Package>("SELECT id, name, thumbnail_image, price FROM packages WHERE id = $1")
      .bind(package_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(package)
  }

  async fn find_shipping_option(&self, label: &str) -> Result<Option<ShippingOption>> {
    let option = sqlx::query_as::<_, ShippingOption>("SELECT id, shipping_option FROM options WHERE shipping_option = $1")
      .bind(label)
      .fetch_optional(&self.pool)
      .await?;
    Ok(option)
  }

  async fn find_cart(&self, cart_id: i64) -> Result<Option<Cart>> {
    let sql = format!("SELECT {CART_COLUMNS} FROM carts WHERE id = $1");
    let cart = sqlx::query_as::<_, Cart>(&sql)
      .bind(cart_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  #[instrument(name = "pg::get_or_create_cart", skip(self, defaults))]
  async fn get_or_create_cart(&self, user_id: i64, package_id: i64, defaults: NewCart) -> Result<(Cart, bool)> {
    if let Some(existing) = self.select_cart_for(user_id, package_id).await? {
      return Ok((existing, false));
    }

    // A concurrent insert for the same pair makes this return no row; the
    // re-select below then picks up the winner.
    let sql = format!(
      "INSERT INTO carts (user_id, package_id, quantity, price, shipping_option_id) \
       VALUES ($1, $2, $3, $4, $5) \
       ON CONFLICT (user_id, package_id) DO NOTHING \
       RETURNING {CART_COLUMNS}"
    );
    let inserted = sqlx::query_as::<_, Cart>(&sql)
      .bind(user_id)
      .bind(package_id)
      .bind(defaults.quantity)
      .bind(defaults.price)
      .bind(defaults.shipping_option_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(constraint_violation_as("INVALID_CART"))?;

    match inserted {
      Some(cart) => Ok((cart, true)),
      None => {
        let cart = self
          .select_cart_for(user_id, package_id)
          .await?
          .ok_or(AppError::NotFound("CART_DOES_NOT_EXIST"))?;
        Ok((cart, false))
      }
    }
  }

  async fn save_cart(&self, cart: &Cart) -> Result<Cart> {
    let sql = format!(
      "UPDATE carts SET quantity = $2, price = $3, updated_at = NOW() WHERE id = $1 RETURNING {CART_COLUMNS}"
    );
    sqlx::query_as::<_, Cart>(&sql)
      .bind(cart.id)
      .bind(cart.quantity)
      .bind(cart.price)
      .fetch_optional(&self.pool)
      .await
      .map_err(constraint_violation_as("INVALID_CART"))?
      .ok_or(AppError::NotFound("CART_DOES_NOT_EXIST"))
  }

  async fn list_cart_lines(&self, user_id: i64) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
      "SELECT c.id, p.thumbnail_image AS image, p.name, c.price, c.quantity, o.shipping_option AS option \
       FROM carts c \
       JOIN packages p ON p.id = c.package_id \
       JOIN options o ON o.id = c.shipping_option_id \
       WHERE c.user_id = $1 \
       ORDER BY c.id ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  async fn sum_cart_prices(&self, user_id: i64) -> Result<Option<Decimal>> {
    let total: Option<Decimal> = sqlx::query_scalar("SELECT SUM(price) FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_one(&self.pool)
      .await?;
    Ok(total)
  }

  async fn delete_carts(&self, cart_ids: &[i64]) -> Result<u64> {
    if cart_ids.is_empty() {
      return Ok(0);
    }
    let result = sqlx::query("DELETE FROM carts WHERE id = ANY($1)")
      .bind(cart_ids)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  async fn create_user(&self, user: NewUser) -> Result<User> {
    let sql = format!(
      "INSERT INTO users (name, address, email, password, phone_number) \
       VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
      .bind(user.name)
      .bind(user.address)
      .bind(user.email)
      .bind(user.password)
      .bind(user.phone_number)
      .fetch_one(&self.pool)
      .await
      .map_err(constraint_violation_as("EMAIL_ALREADY_EXISTS"))
  }

  async fn create_package(&self, package: NewPackage) -> Result<Package> {
    let created = sqlx::query_as::<_, Package>(
      "INSERT INTO packages (name, thumbnail_image, price) VALUES ($1, $2, $3) \
       RETURNING id, name, thumbnail_image, price",
    )
    .bind(package.name)
    .bind(package.thumbnail_image)
    .bind(package.price)
    .fetch_one(&self.pool)
    .await?;
    Ok(created)
  }

  async fn create_shipping_option(&self, label: &str) -> Result<ShippingOption> {
    sqlx::query_as::<_, ShippingOption>(
      "INSERT INTO options (shipping_option) VALUES ($1) RETURNING id, shipping_option",
    )
    .bind(label)
    .fetch_one(&self.pool)
    .await
    .map_err(constraint_violation_as("SHIPPING_OPTION_ALREADY_EXISTS"))
  }
}

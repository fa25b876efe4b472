// shop/src/lib.rs

//! Shopping-cart service.
//!
//! Exposes one HTTP resource (`/api/v1/carts`) with four verbs:
//!  - POST adds a package to the caller's cart, incrementing an existing line.
//!  - GET lists the cart lines with the price total.
//!  - DELETE removes cart lines by id.
//!  - PATCH sets a line's quantity and reprices it.
//!
//! Storage sits behind the [`db::CartStore`] trait, with PostgreSQL and
//! in-memory implementations.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;

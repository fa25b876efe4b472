// shop/src/services/mod.rs

//! Business operations, independent of HTTP.

pub mod cart_service;

// shop/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart;
pub mod package;
pub mod shipping_option;
pub mod user;

// Re-export the model structs for convenient access
pub use cart::{Cart, CartLine, NewCart};
pub use package::{NewPackage, Package};
pub use shipping_option::ShippingOption;
pub use user::{NewUser, User};

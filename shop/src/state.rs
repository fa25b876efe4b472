// shop/src/state.rs
use crate::db::CartStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn CartStore>,
}

impl AppState {
  pub fn new(store: Arc<dyn CartStore>) -> Self {
    Self { store }
  }
}

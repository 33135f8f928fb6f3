//! In-process storage backed by `tokio::sync::RwLock`.
//!
//! Used when `database.backend = "memory"` and as the storage of use case
//! tests. All repositories built from one [`InMemoryStore`] see the same data.

pub mod dashboard_repository;
pub mod product_repository;
pub mod sale_repository;
pub mod stock_movement_repository;

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::inventory::{Product, ProductId, StockMovement};
use crate::domain::sales::Sale;

pub use dashboard_repository::InMemoryDashboardRepository;
pub use product_repository::InMemoryProductRepository;
pub use sale_repository::InMemorySaleRepository;
pub use stock_movement_repository::InMemoryStockMovementRepository;

#[derive(Default)]
pub struct InMemoryStore {
  products: RwLock<HashMap<ProductId, Product>>,
  movements: RwLock<Vec<StockMovement>>,
  sales: RwLock<Vec<Sale>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  #[cfg(test)]
  pub(crate) async fn sale_count(&self) -> usize {
    self.sales.read().await.len()
  }
}

pub mod memory;
pub mod postgres;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::inventory::{ProductRepository, StockMovementRepository};
use crate::domain::reporting::DashboardRepository;
use crate::domain::sales::SaleRepository;

use memory::{
  InMemoryDashboardRepository, InMemoryProductRepository, InMemorySaleRepository,
  InMemoryStockMovementRepository, InMemoryStore,
};
use postgres::{
  PostgresDashboardRepository, PostgresProductRepository, PostgresSaleRepository,
  PostgresStockMovementRepository,
};

/// One set of repositories sharing a single storage backend.
#[derive(Clone)]
pub struct Repositories {
  pub products: Arc<dyn ProductRepository>,
  pub movements: Arc<dyn StockMovementRepository>,
  pub sales: Arc<dyn SaleRepository>,
  pub dashboard: Arc<dyn DashboardRepository>,
}

impl Repositories {
  pub fn postgres(pool: PgPool) -> Self {
    Self {
      products: Arc::new(PostgresProductRepository::new(pool.clone())),
      movements: Arc::new(PostgresStockMovementRepository::new(pool.clone())),
      sales: Arc::new(PostgresSaleRepository::new(pool.clone())),
      dashboard: Arc::new(PostgresDashboardRepository::new(pool)),
    }
  }

  pub fn in_memory() -> Self {
    let store = Arc::new(InMemoryStore::new());
    Self {
      products: Arc::new(InMemoryProductRepository::new(store.clone())),
      movements: Arc::new(InMemoryStockMovementRepository::new(store.clone())),
      sales: Arc::new(InMemorySaleRepository::new(store.clone())),
      dashboard: Arc::new(InMemoryDashboardRepository::new(store)),
    }
  }
}

use async_trait::async_trait;
use std::sync::Arc;

use super::InMemoryStore;
use crate::domain::inventory::{ProductId, RepositoryError, StockMovement, StockMovementRepository};

pub struct InMemoryStockMovementRepository {
  store: Arc<InMemoryStore>,
}

impl InMemoryStockMovementRepository {
  pub fn new(store: Arc<InMemoryStore>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl StockMovementRepository for InMemoryStockMovementRepository {
  async fn save(&self, movement: &StockMovement) -> Result<(), RepositoryError> {
    let mut movements = self.store.movements.write().await;
    if movements.iter().any(|m| m.id() == movement.id()) {
      return Err(RepositoryError::DuplicateKey(movement.id().to_string()));
    }
    movements.push(movement.clone());
    Ok(())
  }

  async fn find_by_product_id(
    &self,
    product_id: &ProductId,
  ) -> Result<Vec<StockMovement>, RepositoryError> {
    let movements = self.store.movements.read().await;
    Ok(
      movements
        .iter()
        .filter(|m| m.product_id() == product_id)
        .cloned()
        .collect(),
    )
  }
}

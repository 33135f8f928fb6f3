use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::InMemoryStore;
use crate::domain::inventory::RepositoryError;
use crate::domain::sales::{Sale, SaleRepository};

pub struct InMemorySaleRepository {
  store: Arc<InMemoryStore>,
}

impl InMemorySaleRepository {
  pub fn new(store: Arc<InMemoryStore>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl SaleRepository for InMemorySaleRepository {
  async fn save(&self, sale: &Sale) -> Result<(), RepositoryError> {
    let mut sales = self.store.sales.write().await;
    if sales.iter().any(|s| s.id() == sale.id()) {
      return Err(RepositoryError::DuplicateKey(sale.id().to_string()));
    }
    sales.push(sale.clone());
    Ok(())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, RepositoryError> {
    let sales = self.store.sales.read().await;
    Ok(sales.iter().find(|s| s.id() == id).cloned())
  }
}

use async_trait::async_trait;
use uuid::Uuid;

use super::entities::Sale;
use crate::domain::inventory::errors::RepositoryError;

#[async_trait]
pub trait SaleRepository: Send + Sync {
  /// Persists the sale header together with its items.
  async fn save(&self, sale: &Sale) -> Result<(), RepositoryError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, RepositoryError>;
}

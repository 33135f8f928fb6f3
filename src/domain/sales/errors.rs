use thiserror::Error;
use uuid::Uuid;

use crate::domain::inventory::errors::{InventoryError, RepositoryError};
use crate::domain::inventory::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum SaleError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("A sale needs at least one item")]
  NoItems,

  #[error("Sale not found: {0}")]
  SaleNotFound(Uuid),

  #[error(transparent)]
  Inventory(#[from] InventoryError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

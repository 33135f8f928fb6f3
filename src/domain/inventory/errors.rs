use thiserror::Error;

use super::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum InventoryError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Product not found: {0}")]
  ProductNotFound(String),

  #[error("Product already exists: {0}")]
  ProductAlreadyExists(String),

  #[error(
    "Insufficient stock for {product_name}. Available: {available}, requested: {requested}"
  )]
  InsufficientStock {
    product_id: String,
    product_name: String,
    available: u32,
    requested: u32,
  },

  #[error("Stock of product {0} was changed by another operation, retry")]
  ConcurrentStockUpdate(String),

  #[error("Image service error: {0}")]
  Image(#[from] ImageServiceError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Transaction failed: {0}")]
  TransactionFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Stored record is invalid: {0}")]
  CorruptRecord(String),
}

impl RepositoryError {
  /// Prefixes the message with what the adapter was doing.
  pub fn context(self, action: &str) -> Self {
    match self {
      RepositoryError::ConnectionFailed(msg) => {
        RepositoryError::ConnectionFailed(format!("{}: {}", action, msg))
      }
      RepositoryError::QueryFailed(msg) => {
        RepositoryError::QueryFailed(format!("{}: {}", action, msg))
      }
      RepositoryError::TransactionFailed(msg) => {
        RepositoryError::TransactionFailed(format!("{}: {}", action, msg))
      }
      RepositoryError::DatabaseError(msg) => {
        RepositoryError::DatabaseError(format!("{}: {}", action, msg))
      }
      other => other,
    }
  }
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for InventoryError {
  fn from(error: sqlx::Error) -> Self {
    InventoryError::Repository(RepositoryError::from(error))
  }
}

/// Image upload/delete failures
#[derive(Debug, Error)]
pub enum ImageServiceError {
  #[error("Invalid image file: {0}")]
  InvalidFile(String),

  #[error("Failed to upload image: {0}")]
  UploadFailed(String),

  #[error("Failed to delete image: {0}")]
  DeleteFailed(String),

  #[error("Image service is not configured")]
  NotConfigured,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_context_prefixes_message() {
    let error =
      RepositoryError::QueryFailed("timeout".to_string()).context("Failed to save product");
    assert_eq!(
      error.to_string(),
      "Query execution failed: Failed to save product: timeout"
    );
  }

  #[test]
  fn test_context_keeps_not_found() {
    let error = RepositoryError::NotFound.context("Failed to load sale");
    assert!(matches!(error, RepositoryError::NotFound));
  }

  #[test]
  fn test_row_not_found_maps_to_not_found() {
    let error: RepositoryError = sqlx::Error::RowNotFound.into();
    assert!(matches!(error, RepositoryError::NotFound));
  }
}

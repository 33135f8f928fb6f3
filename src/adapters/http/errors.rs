use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde_json::json;
use std::fmt;

use crate::domain::inventory::{
  ImageServiceError, InventoryError, RepositoryError, ValueObjectError,
};
use crate::domain::sales::SaleError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Missing resource (404 Not Found)
  NotFound(String),

  /// Request conflicts with current state (409 Conflict)
  Conflict {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
  },

  /// Image CDN failed (502 Bad Gateway)
  ImageService(String),

  /// Image uploads are disabled (503 Service Unavailable)
  ImageServiceUnavailable,

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
      ApiError::ImageService(msg) => write!(f, "Image service error: {}", msg),
      ApiError::ImageServiceUnavailable => write!(f, "Image service is not configured"),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict { .. } => StatusCode::CONFLICT,
      ApiError::ImageService(_) => StatusCode::BAD_GATEWAY,
      ApiError::ImageServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message, details) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone(), None),
      ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
      ApiError::Conflict {
        code,
        message,
        details,
      } => (*code, message.clone(), details.clone()),
      ApiError::ImageService(msg) => {
        tracing::warn!("Image service error: {}", msg);
        ("image_service_error", msg.clone(), None)
      }
      ApiError::ImageServiceUnavailable => (
        "image_service_unavailable",
        "Image uploads are not configured".to_string(),
        None,
      ),
      ApiError::Internal(msg) => {
        // Don't expose internal error details in production
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
          None,
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<ValueObjectError> for ApiError {
  fn from(error: ValueObjectError) -> Self {
    ApiError::Validation(error.to_string())
  }
}

impl From<RepositoryError> for ApiError {
  fn from(error: RepositoryError) -> Self {
    match error {
      RepositoryError::NotFound => ApiError::NotFound("Record not found".to_string()),
      RepositoryError::DuplicateKey(msg) => ApiError::Conflict {
        code: "duplicate_key",
        message: msg,
        details: None,
      },
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl From<ImageServiceError> for ApiError {
  fn from(error: ImageServiceError) -> Self {
    match error {
      ImageServiceError::InvalidFile(msg) => ApiError::Validation(msg),
      ImageServiceError::NotConfigured => ApiError::ImageServiceUnavailable,
      other => ApiError::ImageService(other.to_string()),
    }
  }
}

/// Convert InventoryError to ApiError
impl From<InventoryError> for ApiError {
  fn from(error: InventoryError) -> Self {
    match error {
      InventoryError::Validation(err) => err.into(),
      InventoryError::ProductNotFound(id) => {
        ApiError::NotFound(format!("Product not found: {}", id))
      }
      InventoryError::ProductAlreadyExists(id) => ApiError::Conflict {
        code: "product_already_exists",
        message: format!("A product with id {} already exists", id),
        details: None,
      },
      InventoryError::InsufficientStock {
        ref product_id,
        available,
        requested,
        ..
      } => ApiError::Conflict {
        code: "insufficient_stock",
        details: Some(json!({
          "product_id": product_id,
          "available": available,
          "requested": requested,
        })),
        message: error.to_string(),
      },
      InventoryError::ConcurrentStockUpdate(_) => ApiError::Conflict {
        code: "concurrent_update",
        message: error.to_string(),
        details: None,
      },
      InventoryError::Image(err) => err.into(),
      InventoryError::Repository(err) => err.into(),
    }
  }
}

/// Convert SaleError to ApiError
impl From<SaleError> for ApiError {
  fn from(error: SaleError) -> Self {
    match error {
      SaleError::Validation(err) => err.into(),
      SaleError::NoItems => ApiError::Validation(error.to_string()),
      SaleError::SaleNotFound(id) => ApiError::NotFound(format!("Sale not found: {}", id)),
      SaleError::Inventory(err) => err.into(),
      SaleError::Repository(err) => err.into(),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    if messages.is_empty() {
      return ApiError::Validation(errors.to_string());
    }
    ApiError::Validation(messages.join(", "))
  }
}

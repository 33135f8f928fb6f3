use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::inventory::{
  CreateProductCommand, ListProductsCommand, MoneyDto, SearchProductsCommand,
  UpdateProductCommand, UpdateStockCommand,
};
use crate::application::sales::{CreateSaleCommand, CreateSaleItemDto};

/// Price as sent by clients. `currency` falls back to the configured default.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRequest {
  pub amount: Decimal,
  pub currency: Option<String>,
}

impl PriceRequest {
  pub fn into_money(self, default_currency: &str) -> MoneyDto {
    MoneyDto {
      amount: self.amount,
      currency: self
        .currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| default_currency.to_string()),
    }
  }
}

/// Request for creating a product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
  #[validate(length(min = 1, max = 64, message = "Product id must be between 1 and 64 characters"))]
  pub id: String,

  #[validate(length(min = 3, max = 255, message = "Name must be between 3 and 255 characters"))]
  pub name: String,

  pub price: PriceRequest,

  #[serde(default)]
  #[validate(range(
    min = 0,
    max = 2147483647,
    message = "Stock must be between 0 and 2147483647"
  ))]
  pub stock: i64,

  #[validate(length(max = 2000, message = "Description is too long"))]
  pub description: Option<String>,

  #[validate(length(max = 100, message = "Category is too long"))]
  pub category: Option<String>,

  #[validate(url(message = "Image URL must be a valid URL"))]
  pub image_url: Option<String>,
}

impl CreateProductRequest {
  pub fn into_command(self, default_currency: &str) -> CreateProductCommand {
    CreateProductCommand {
      id: self.id,
      name: self.name,
      price: self.price.into_money(default_currency),
      stock: self.stock,
      description: self.description,
      category: self.category,
      image_url: self.image_url,
      image: None,
    }
  }
}

/// Partial product update. Empty strings clear optional fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
  #[validate(length(min = 3, max = 255, message = "Name must be between 3 and 255 characters"))]
  pub name: Option<String>,

  pub price: Option<PriceRequest>,

  #[validate(length(max = 2000, message = "Description is too long"))]
  pub description: Option<String>,

  #[validate(length(max = 100, message = "Category is too long"))]
  pub category: Option<String>,

  pub image_url: Option<String>,
}

impl UpdateProductRequest {
  pub fn into_command(self, id: String, default_currency: &str) -> UpdateProductCommand {
    UpdateProductCommand {
      id,
      name: self.name,
      price: self.price.map(|p| p.into_money(default_currency)),
      description: self.description,
      category: self.category,
      image_url: self.image_url,
      image: None,
    }
  }
}

/// Stock movement request. `type` is IN, OUT or ADJUSTMENT; adjustments take
/// a signed quantity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StockChangeRequest {
  #[serde(rename = "type")]
  #[validate(length(min = 1, message = "Movement type is required"))]
  pub movement_type: String,

  pub quantity: i64,

  #[serde(default)]
  #[validate(length(max = 500, message = "Reason is too long"))]
  pub reason: String,

  pub user_id: Option<String>,
}

impl StockChangeRequest {
  pub fn into_command(self, product_id: String) -> UpdateStockCommand {
    UpdateStockCommand {
      product_id,
      movement_type: self.movement_type,
      quantity: self.quantity,
      reason: self.reason,
      user_id: self.user_id,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaleItemRequest {
  #[validate(length(min = 1, message = "Product id is required"))]
  pub product_id: String,

  #[validate(range(min = 1, message = "Quantity must be greater than zero"))]
  pub quantity: i64,
}

/// Request for recording a sale
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSaleRequest {
  #[validate(length(max = 255, message = "Customer name is too long"))]
  pub customer_name: Option<String>,

  #[validate(length(min = 1, message = "A sale needs at least one item"), nested)]
  pub items: Vec<SaleItemRequest>,
}

impl From<CreateSaleRequest> for CreateSaleCommand {
  fn from(request: CreateSaleRequest) -> Self {
    CreateSaleCommand {
      customer_name: request.customer_name,
      items: request
        .items
        .into_iter()
        .map(|item| CreateSaleItemDto {
          product_id: item.product_id,
          quantity: item.quantity,
        })
        .collect(),
    }
  }
}

/// Query string of `GET /products`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsQuery {
  pub category: Option<String>,
  #[serde(default)]
  pub out_of_stock: bool,
}

impl From<ListProductsQuery> for ListProductsCommand {
  fn from(query: ListProductsQuery) -> Self {
    ListProductsCommand {
      category: query.category,
      out_of_stock_only: query.out_of_stock,
    }
  }
}

/// Query string of `GET /products/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
  #[serde(default)]
  pub q: String,
  #[serde(default)]
  pub name_only: bool,
}

impl From<SearchQuery> for SearchProductsCommand {
  fn from(query: SearchQuery) -> Self {
    SearchProductsCommand {
      query: query.q,
      name_only: query.name_only,
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

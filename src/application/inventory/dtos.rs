use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::inventory::{Money, Product, StockMovement, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyDto {
  pub amount: Decimal,
  pub currency: String,
}

impl MoneyDto {
  pub fn to_money(&self) -> Result<Money, ValueObjectError> {
    Money::new(self.amount, &self.currency)
  }
}

impl From<&Money> for MoneyDto {
  fn from(money: &Money) -> Self {
    Self {
      amount: money.amount(),
      currency: money.currency().to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductResponse {
  pub id: String,
  pub name: String,
  pub price: MoneyDto,
  pub stock: u32,
  pub description: Option<String>,
  pub category: Option<String>,
  pub image_url: Option<String>,
  pub is_out_of_stock: bool,
  pub has_low_stock: bool,
  pub inventory_value: MoneyDto,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id().to_string(),
      name: product.name().to_string(),
      price: product.price().into(),
      stock: product.stock(),
      description: product.description().map(str::to_string),
      category: product.category().map(str::to_string),
      image_url: product.image_url().map(str::to_string),
      is_out_of_stock: product.is_out_of_stock(),
      has_low_stock: product.has_low_stock(),
      inventory_value: (&product.inventory_value()).into(),
      created_at: product.created_at(),
      updated_at: product.updated_at(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockMovementDto {
  pub id: Uuid,
  pub product_id: String,
  pub quantity: u32,
  #[serde(rename = "type")]
  pub movement_type: String,
  pub reason: String,
  pub date: DateTime<Utc>,
  pub user_id: Option<String>,
}

impl From<&StockMovement> for StockMovementDto {
  fn from(movement: &StockMovement) -> Self {
    Self {
      id: movement.id(),
      product_id: movement.product_id().to_string(),
      quantity: movement.quantity(),
      movement_type: movement.movement_type().as_str().to_string(),
      reason: movement.reason().to_string(),
      date: movement.date(),
      user_id: movement.user_id().map(str::to_string),
    }
  }
}

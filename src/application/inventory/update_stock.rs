use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use super::dtos::{ProductResponse, StockMovementDto};
use crate::domain::inventory::{
  InventoryError, InventoryService, ProductId, StockChange, StockChangeRequest, StockMovementType,
};

/// `quantity` is a positive count for IN and OUT, and a signed delta for
/// ADJUSTMENT.
#[derive(Debug, Deserialize)]
pub struct UpdateStockCommand {
  #[serde(default)]
  pub product_id: String,
  #[serde(rename = "type")]
  pub movement_type: String,
  pub quantity: i64,
  #[serde(default)]
  pub reason: String,
  pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateStockResponse {
  pub product: ProductResponse,
  pub movement: StockMovementDto,
}

pub struct UpdateStockUseCase {
  inventory_service: Arc<InventoryService>,
}

impl UpdateStockUseCase {
  pub fn new(inventory_service: Arc<InventoryService>) -> Self {
    Self { inventory_service }
  }

  pub async fn execute(
    &self,
    command: UpdateStockCommand,
  ) -> Result<UpdateStockResponse, InventoryError> {
    let product_id = ProductId::new(&command.product_id)?;
    let movement_type = StockMovementType::from_str(&command.movement_type)?;
    let change = StockChange::from_parts(movement_type, command.quantity)?;

    let (product, movement) = self
      .inventory_service
      .apply_stock_change(StockChangeRequest {
        product_id,
        change,
        reason: command.reason,
        user_id: command.user_id,
      })
      .await?;

    Ok(UpdateStockResponse {
      product: ProductResponse::from(&product),
      movement: StockMovementDto::from(&movement),
    })
  }
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::dtos::StockMovementDto;
use crate::domain::inventory::{InventoryError, InventoryService, ProductId};

#[derive(Debug, Deserialize)]
pub struct GetStockMovementsCommand {
  pub product_id: String,
}

#[derive(Debug, Serialize)]
pub struct StockMovementsResponse {
  pub product_id: String,
  pub movements: Vec<StockMovementDto>,
}

pub struct GetStockMovementsUseCase {
  inventory_service: Arc<InventoryService>,
}

impl GetStockMovementsUseCase {
  pub fn new(inventory_service: Arc<InventoryService>) -> Self {
    Self { inventory_service }
  }

  pub async fn execute(
    &self,
    command: GetStockMovementsCommand,
  ) -> Result<StockMovementsResponse, InventoryError> {
    let product_id = ProductId::new(&command.product_id)?;
    let movements = self.inventory_service.stock_history(&product_id).await?;

    Ok(StockMovementsResponse {
      product_id: product_id.into_inner(),
      movements: movements.iter().map(StockMovementDto::from).collect(),
    })
  }
}

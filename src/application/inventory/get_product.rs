use serde::Deserialize;
use std::sync::Arc;

use super::dtos::ProductResponse;
use crate::domain::inventory::{InventoryError, InventoryService, ProductId};

#[derive(Debug, Deserialize)]
pub struct GetProductCommand {
  pub id: String,
}

pub struct GetProductUseCase {
  inventory_service: Arc<InventoryService>,
}

impl GetProductUseCase {
  pub fn new(inventory_service: Arc<InventoryService>) -> Self {
    Self { inventory_service }
  }

  pub async fn execute(
    &self,
    command: GetProductCommand,
  ) -> Result<Option<ProductResponse>, InventoryError> {
    let id = ProductId::new(&command.id)?;
    let product = self.inventory_service.find_product(&id).await?;
    Ok(product.as_ref().map(ProductResponse::from))
  }
}

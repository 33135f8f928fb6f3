use serde::Serialize;
use std::sync::Arc;

use super::dtos::ProductResponse;
use crate::domain::inventory::{InventoryError, InventoryService};

#[derive(Debug, Serialize)]
pub struct LowStockProductsResponse {
  pub threshold: u32,
  pub products: Vec<ProductResponse>,
}

pub struct GetLowStockProductsUseCase {
  inventory_service: Arc<InventoryService>,
  threshold: u32,
}

impl GetLowStockProductsUseCase {
  pub fn new(inventory_service: Arc<InventoryService>, threshold: u32) -> Self {
    Self {
      inventory_service,
      threshold,
    }
  }

  pub async fn execute(&self) -> Result<LowStockProductsResponse, InventoryError> {
    let products = self
      .inventory_service
      .low_stock_products(self.threshold)
      .await?;
    Ok(LowStockProductsResponse {
      threshold: self.threshold,
      products: products.iter().map(ProductResponse::from).collect(),
    })
  }
}

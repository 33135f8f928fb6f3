use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::dtos::ProductResponse;
use crate::domain::inventory::{InventoryError, InventoryService, Product, ProductFilter};

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsCommand {
  pub category: Option<String>,
  /// Wins over `category` when both are set.
  #[serde(default)]
  pub out_of_stock_only: bool,
}

#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
  pub products: Vec<ProductResponse>,
}

impl ListProductsResponse {
  pub(crate) fn from_products(products: &[Product]) -> Self {
    Self {
      products: products.iter().map(ProductResponse::from).collect(),
    }
  }
}

pub struct ListProductsUseCase {
  inventory_service: Arc<InventoryService>,
}

impl ListProductsUseCase {
  pub fn new(inventory_service: Arc<InventoryService>) -> Self {
    Self { inventory_service }
  }

  pub async fn execute(
    &self,
    command: ListProductsCommand,
  ) -> Result<ListProductsResponse, InventoryError> {
    let category = command
      .category
      .map(|c| c.trim().to_string())
      .filter(|c| !c.is_empty());

    let filter = match (command.out_of_stock_only, category) {
      (true, _) => ProductFilter::OutOfStock,
      (false, Some(category)) => ProductFilter::Category(category),
      (false, None) => ProductFilter::All,
    };

    let products = self.inventory_service.list_products(&filter).await?;
    Ok(ListProductsResponse::from_products(&products))
  }
}

use serde::Deserialize;
use std::sync::Arc;

use super::list_products::ListProductsResponse;
use crate::domain::inventory::{InventoryError, InventoryService};

/// Shorter queries return nothing.
pub const MIN_QUERY_LENGTH: usize = 2;

#[derive(Debug, Deserialize)]
pub struct SearchProductsCommand {
  pub query: String,
  #[serde(default)]
  pub name_only: bool,
}

pub struct SearchProductsUseCase {
  inventory_service: Arc<InventoryService>,
}

impl SearchProductsUseCase {
  pub fn new(inventory_service: Arc<InventoryService>) -> Self {
    Self { inventory_service }
  }

  pub async fn execute(
    &self,
    command: SearchProductsCommand,
  ) -> Result<ListProductsResponse, InventoryError> {
    let query = command.query.trim();
    if query.chars().count() < MIN_QUERY_LENGTH {
      return Ok(ListProductsResponse { products: vec![] });
    }

    let products = self
      .inventory_service
      .search_products(query, command.name_only)
      .await?;
    Ok(ListProductsResponse::from_products(&products))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::test_support::TestContext;
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_short_query_returns_nothing() {
    let ctx = TestContext::new();
    ctx.seed_product("p1", dec!(1), 1).await;
    let use_case = SearchProductsUseCase::new(ctx.inventory.clone());

    let response = use_case
      .execute(SearchProductsCommand {
        query: "  P ".to_string(),
        name_only: false,
      })
      .await
      .unwrap();

    assert!(response.products.is_empty());
  }

  #[tokio::test]
  async fn test_matches_trimmed_query() {
    let ctx = TestContext::new();
    ctx.seed_product("p1", dec!(1), 1).await;
    ctx.seed_product("p2", dec!(1), 1).await;
    let use_case = SearchProductsUseCase::new(ctx.inventory.clone());

    let response = use_case
      .execute(SearchProductsCommand {
        query: " product P2 ".to_string(),
        name_only: true,
      })
      .await
      .unwrap();

    assert_eq!(response.products.len(), 1);
    assert_eq!(response.products[0].id, "p2");
  }
}

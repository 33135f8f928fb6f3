use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::inventory::MoneyDto;
use crate::domain::inventory::RepositoryError;
use crate::domain::reporting::{DashboardQuery, DashboardRepository};

#[derive(Debug, Serialize)]
pub struct RecentSaleDto {
  pub id: Uuid,
  pub date: DateTime<Utc>,
  pub customer_name: Option<String>,
  pub item_count: usize,
  pub total: MoneyDto,
}

#[derive(Debug, Serialize)]
pub struct TopSellingProductDto {
  pub name: String,
  pub total_sold: u64,
}

#[derive(Debug, Serialize)]
pub struct LowStockProductDto {
  pub id: String,
  pub name: String,
  pub stock: u32,
  pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryStatsResponse {
  pub total_inventory_value: Decimal,
  pub total_products: u64,
  pub low_stock_count: u64,
  pub recent_sales: Vec<RecentSaleDto>,
  pub top_selling_products: Vec<TopSellingProductDto>,
  pub low_stock_products: Vec<LowStockProductDto>,
}

pub struct GetInventoryStatsUseCase {
  dashboard_repo: Arc<dyn DashboardRepository>,
  query: DashboardQuery,
}

impl GetInventoryStatsUseCase {
  pub fn new(dashboard_repo: Arc<dyn DashboardRepository>, query: DashboardQuery) -> Self {
    Self {
      dashboard_repo,
      query,
    }
  }

  pub async fn execute(&self) -> Result<InventoryStatsResponse, RepositoryError> {
    let stats = self
      .dashboard_repo
      .get_stats(&self.query)
      .await
      .map_err(|e| e.context("Failed to load dashboard"))?;

    Ok(InventoryStatsResponse {
      total_inventory_value: stats.total_inventory_value,
      total_products: stats.total_products,
      low_stock_count: stats.low_stock_count,
      recent_sales: stats
        .recent_sales
        .iter()
        .map(|sale| RecentSaleDto {
          id: sale.id(),
          date: sale.date(),
          customer_name: sale.customer_name().map(str::to_string),
          item_count: sale.items().len(),
          total: sale.total().into(),
        })
        .collect(),
      top_selling_products: stats
        .top_selling_products
        .into_iter()
        .map(|p| TopSellingProductDto {
          name: p.name,
          total_sold: p.total_sold,
        })
        .collect(),
      low_stock_products: stats
        .low_stock_products
        .into_iter()
        .map(|p| LowStockProductDto {
          id: p.id,
          name: p.name,
          stock: p.stock,
          category: p.category,
        })
        .collect(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::test_support::TestContext;
  use crate::domain::inventory::ProductId;
  use crate::domain::sales::SaleLine;
  use crate::infrastructure::persistence::memory::InMemoryDashboardRepository;
  use rust_decimal_macros::dec;

  async fn sell(ctx: &TestContext, product_id: &str, quantity: u32) {
    ctx
      .sale_service
      .create_sale(
        None,
        vec![SaleLine {
          product_id: ProductId::new(product_id).unwrap(),
          quantity,
        }],
      )
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn test_aggregates_catalog_and_sales() {
    let ctx = TestContext::new();
    ctx.seed_product("p1", dec!(10), 20).await;
    ctx.seed_product("p2", dec!(5), 12).await;
    ctx.seed_product("p3", dec!(2.50), 0).await;
    sell(&ctx, "p1", 4).await;
    sell(&ctx, "p2", 6).await;
    sell(&ctx, "p1", 3).await;

    let use_case = GetInventoryStatsUseCase::new(
      Arc::new(InMemoryDashboardRepository::new(ctx.store.clone())),
      DashboardQuery {
        recent_sales_limit: 2,
        ..DashboardQuery::default()
      },
    );

    let stats = use_case.execute().await.unwrap();

    // p1: 13 x 10, p2: 6 x 5, p3: 0
    assert_eq!(stats.total_inventory_value, dec!(160));
    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.low_stock_count, 2);
    let low: Vec<&str> = stats.low_stock_products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(low, vec!["p3", "p2"]);

    assert_eq!(stats.recent_sales.len(), 2);
    assert!(stats.recent_sales[0].date >= stats.recent_sales[1].date);

    assert_eq!(stats.top_selling_products[0].name, "Product p1");
    assert_eq!(stats.top_selling_products[0].total_sold, 7);
    assert_eq!(stats.top_selling_products[1].total_sold, 6);
  }

  #[tokio::test]
  async fn test_empty_store() {
    let ctx = TestContext::new();
    let use_case = GetInventoryStatsUseCase::new(
      Arc::new(InMemoryDashboardRepository::new(ctx.store.clone())),
      DashboardQuery::default(),
    );

    let stats = use_case.execute().await.unwrap();

    assert_eq!(stats.total_inventory_value, Decimal::ZERO);
    assert!(stats.recent_sales.is_empty());
    assert!(stats.top_selling_products.is_empty());
  }
}

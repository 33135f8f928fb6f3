use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::sale_repository::{SaleRow, assemble_sales};
use crate::domain::inventory::RepositoryError;
use crate::domain::reporting::{
  DashboardQuery, DashboardRepository, DashboardStats, LowStockProduct, TopSellingProduct,
};

/// Dashboard aggregates computed in SQL
pub struct PostgresDashboardRepository {
  pool: PgPool,
}

impl PostgresDashboardRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct InventoryTotalsRow {
  total_inventory_value: Decimal,
  total_products: i64,
  low_stock_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct LowStockRow {
  id: String,
  name: String,
  stock: i32,
  category: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct TopSellingRow {
  name: String,
  total_sold: i64,
}

#[async_trait]
impl DashboardRepository for PostgresDashboardRepository {
  async fn get_stats(&self, query: &DashboardQuery) -> Result<DashboardStats, RepositoryError> {
    let threshold = i64::from(query.low_stock_threshold);

    let totals = sqlx::query_as::<_, InventoryTotalsRow>(
      r#"
            SELECT
                COALESCE(SUM(price_amount * stock), 0) AS total_inventory_value,
                COUNT(*) AS total_products,
                COUNT(*) FILTER (WHERE stock < $1) AS low_stock_count
            FROM products
            "#,
    )
    .bind(threshold)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| RepositoryError::from(e).context("Failed to load inventory totals"))?;

    let low_stock_rows = sqlx::query_as::<_, LowStockRow>(
      r#"
            SELECT id, name, stock, category
            FROM products
            WHERE stock < $1
            ORDER BY stock, name
            LIMIT $2
            "#,
    )
    .bind(threshold)
    .bind(i64::from(query.low_stock_limit))
    .fetch_all(&self.pool)
    .await?;

    let recent_rows = sqlx::query_as::<_, SaleRow>(
      r#"
            SELECT id, customer_name, created_at
            FROM sales
            ORDER BY created_at DESC
            LIMIT $1
            "#,
    )
    .bind(i64::from(query.recent_sales_limit))
    .fetch_all(&self.pool)
    .await?;
    let recent_sales = assemble_sales(&self.pool, recent_rows).await?;

    let top_rows = sqlx::query_as::<_, TopSellingRow>(
      r#"
            SELECT product_name AS name, SUM(quantity)::BIGINT AS total_sold
            FROM sale_items
            GROUP BY product_name
            ORDER BY total_sold DESC, name
            LIMIT $1
            "#,
    )
    .bind(i64::from(query.top_selling_limit))
    .fetch_all(&self.pool)
    .await?;

    Ok(DashboardStats {
      total_inventory_value: totals.total_inventory_value,
      total_products: totals.total_products.max(0) as u64,
      low_stock_count: totals.low_stock_count.max(0) as u64,
      recent_sales,
      top_selling_products: top_rows
        .into_iter()
        .map(|row| TopSellingProduct {
          name: row.name,
          total_sold: row.total_sold.max(0) as u64,
        })
        .collect(),
      low_stock_products: low_stock_rows
        .into_iter()
        .map(|row| LowStockProduct {
          id: row.id,
          name: row.name,
          stock: row.stock.max(0) as u32,
          category: row.category,
        })
        .collect(),
    })
  }
}

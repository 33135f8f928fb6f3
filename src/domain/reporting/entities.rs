use rust_decimal::Decimal;

use crate::domain::inventory::entities::LOW_STOCK_THRESHOLD;
use crate::domain::sales::entities::Sale;

/// Limits for the dashboard aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardQuery {
  pub recent_sales_limit: u32,
  pub top_selling_limit: u32,
  pub low_stock_limit: u32,
  /// Products with stock below this value, out of stock included, are listed
  /// and counted as low.
  pub low_stock_threshold: u32,
}

impl Default for DashboardQuery {
  fn default() -> Self {
    Self {
      recent_sales_limit: 5,
      top_selling_limit: 5,
      low_stock_limit: 10,
      low_stock_threshold: LOW_STOCK_THRESHOLD,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopSellingProduct {
  pub name: String,
  pub total_sold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockProduct {
  pub id: String,
  pub name: String,
  pub stock: u32,
  pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
  /// Sum of price x stock across the catalog. Mixed currencies are summed as
  /// plain amounts.
  pub total_inventory_value: Decimal,
  pub total_products: u64,
  pub low_stock_count: u64,
  pub recent_sales: Vec<Sale>,
  pub top_selling_products: Vec<TopSellingProduct>,
  pub low_stock_products: Vec<LowStockProduct>,
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::InMemoryStore;
use crate::domain::inventory::RepositoryError;
use crate::domain::reporting::{
  DashboardQuery, DashboardRepository, DashboardStats, LowStockProduct, TopSellingProduct,
};

pub struct InMemoryDashboardRepository {
  store: Arc<InMemoryStore>,
}

impl InMemoryDashboardRepository {
  pub fn new(store: Arc<InMemoryStore>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl DashboardRepository for InMemoryDashboardRepository {
  async fn get_stats(&self, query: &DashboardQuery) -> Result<DashboardStats, RepositoryError> {
    let products = self.store.products.read().await;
    let sales = self.store.sales.read().await;

    let total_inventory_value = products
      .values()
      .try_fold(Decimal::ZERO, |total, p| {
        total.checked_add(p.inventory_value().amount())
      })
      .ok_or_else(|| RepositoryError::QueryFailed("Inventory value overflowed".to_string()))?;

    let mut low: Vec<_> = products
      .values()
      .filter(|p| p.stock() < query.low_stock_threshold)
      .collect();
    low.sort_by(|a, b| a.stock().cmp(&b.stock()).then_with(|| a.name().cmp(b.name())));
    let low_stock_count = low.len() as u64;
    let low_stock_products = low
      .into_iter()
      .take(query.low_stock_limit as usize)
      .map(|p| LowStockProduct {
        id: p.id().to_string(),
        name: p.name().to_string(),
        stock: p.stock(),
        category: p.category().map(str::to_string),
      })
      .collect();

    let mut recent_sales = sales.clone();
    recent_sales.sort_by(|a, b| b.date().cmp(&a.date()));
    recent_sales.truncate(query.recent_sales_limit as usize);

    let mut sold: HashMap<&str, u64> = HashMap::new();
    for item in sales.iter().flat_map(|s| s.items()) {
      *sold.entry(item.product_name()).or_default() += u64::from(item.quantity());
    }
    let mut top_selling_products: Vec<TopSellingProduct> = sold
      .into_iter()
      .map(|(name, total_sold)| TopSellingProduct {
        name: name.to_string(),
        total_sold,
      })
      .collect();
    top_selling_products.sort_by(|a, b| {
      b.total_sold
        .cmp(&a.total_sold)
        .then_with(|| a.name.cmp(&b.name))
    });
    top_selling_products.truncate(query.top_selling_limit as usize);

    Ok(DashboardStats {
      total_inventory_value,
      total_products: products.len() as u64,
      low_stock_count,
      recent_sales,
      top_selling_products,
      low_stock_products,
    })
  }
}

use async_trait::async_trait;
use std::sync::Arc;

use super::InMemoryStore;
use crate::domain::inventory::{Product, ProductId, ProductRepository, RepositoryError};

pub struct InMemoryProductRepository {
  store: Arc<InMemoryStore>,
}

impl InMemoryProductRepository {
  pub fn new(store: Arc<InMemoryStore>) -> Self {
    Self { store }
  }

  async fn select<F>(&self, predicate: F) -> Vec<Product>
  where
    F: Fn(&Product) -> bool,
  {
    let products = self.store.products.read().await;
    let mut matching: Vec<Product> = products.values().filter(|&p| predicate(p)).cloned().collect();
    matching.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
    matching
  }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
  async fn save(&self, product: &Product) -> Result<(), RepositoryError> {
    let mut products = self.store.products.write().await;
    let mut record = product.clone();
    if let Some(existing) = products.get(product.id()) {
      record.overwrite_stock(existing.stock(), product.updated_at());
    }
    products.insert(product.id().clone(), record);
    Ok(())
  }

  async fn update_stock(
    &self,
    product: &Product,
    expected_stock: u32,
  ) -> Result<bool, RepositoryError> {
    let mut products = self.store.products.write().await;
    match products.get_mut(product.id()) {
      Some(stored) if stored.stock() == expected_stock => {
        stored.overwrite_stock(product.stock(), product.updated_at());
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
    Ok(self.store.products.read().await.get(id).cloned())
  }

  async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
    let mut products = self.select(|_| true).await;
    products.sort_by(|a, b| {
      b.created_at()
        .cmp(&a.created_at())
        .then_with(|| a.id().cmp(b.id()))
    });
    Ok(products)
  }

  async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
    Ok(self.select(|p| p.category() == Some(category)).await)
  }

  async fn find_low_stock(&self, threshold: u32) -> Result<Vec<Product>, RepositoryError> {
    let mut products = self
      .select(|p| p.stock() > 0 && p.stock() < threshold)
      .await;
    // stable sort keeps name order within equal stock
    products.sort_by_key(|p| p.stock());
    Ok(products)
  }

  async fn find_out_of_stock(&self) -> Result<Vec<Product>, RepositoryError> {
    Ok(self.select(|p| p.is_out_of_stock()).await)
  }

  async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
    let needle = query.to_lowercase();
    Ok(
      self
        .select(|p| {
          contains_ignore_case(p.name(), &needle)
            || p
              .description()
              .is_some_and(|d| contains_ignore_case(d, &needle))
        })
        .await,
    )
  }

  async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
    let needle = name.to_lowercase();
    Ok(self.select(|p| contains_ignore_case(p.name(), &needle)).await)
  }

  async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
    Ok(self.store.products.write().await.remove(id).is_some())
  }

  async fn exists(&self, id: &ProductId) -> Result<bool, RepositoryError> {
    Ok(self.store.products.read().await.contains_key(id))
  }
}

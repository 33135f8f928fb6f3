use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::inventory::{
  Money, Product, ProductId, ProductName, ProductRepository, RepositoryError,
};

/// PostgreSQL implementation of the ProductRepository trait
pub struct PostgresProductRepository {
  pool: PgPool,
}

impl PostgresProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn fetch(&self, sql: &str, binds: &[&str]) -> Result<Vec<Product>, RepositoryError> {
    let mut query = sqlx::query_as::<_, ProductRow>(sql);
    for value in binds {
      query = query.bind(*value);
    }
    let rows = query.fetch_all(&self.pool).await?;
    rows.into_iter().map(Product::try_from).collect()
  }
}

/// Database row structure for products table
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
  id: String,
  name: String,
  price_amount: Decimal,
  price_currency: String,
  stock: i32,
  description: Option<String>,
  category: Option<String>,
  image_url: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = RepositoryError;

  fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
    let corrupt = |e: &dyn std::fmt::Display| {
      RepositoryError::CorruptRecord(format!("product {}: {}", row.id, e))
    };
    let id = ProductId::new(&row.id).map_err(|e| corrupt(&e))?;
    let name = ProductName::new(&row.name).map_err(|e| corrupt(&e))?;
    let price = Money::new(row.price_amount, &row.price_currency).map_err(|e| corrupt(&e))?;
    let stock = u32::try_from(row.stock).map_err(|e| corrupt(&e))?;

    Product::from_db(
      id,
      name,
      price,
      stock,
      row.description,
      row.category,
      row.image_url,
      row.created_at,
      row.updated_at,
    )
    .map_err(|e| corrupt(&e))
  }
}

const PRODUCT_COLUMNS: &str = "id, name, price_amount, price_currency, stock, description, \
                               category, image_url, created_at, updated_at";

fn stock_param(stock: u32) -> Result<i32, RepositoryError> {
  i32::try_from(stock)
    .map_err(|_| RepositoryError::QueryFailed(format!("Stock value out of range: {}", stock)))
}

/// `%query%` with LIKE wildcards in the query taken literally.
fn contains_pattern(query: &str) -> String {
  let escaped = query
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  format!("%{}%", escaped)
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
  async fn save(&self, product: &Product) -> Result<(), RepositoryError> {
    sqlx::query(
      r#"
            INSERT INTO products (
                id, name, price_amount, price_currency, stock,
                description, category, image_url, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                price_amount = EXCLUDED.price_amount,
                price_currency = EXCLUDED.price_currency,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at
            "#,
    )
    .bind(product.id().value())
    .bind(product.name())
    .bind(product.price().amount())
    .bind(product.price().currency().as_str())
    .bind(stock_param(product.stock())?)
    .bind(product.description())
    .bind(product.category())
    .bind(product.image_url())
    .bind(product.created_at())
    .bind(product.updated_at())
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn update_stock(
    &self,
    product: &Product,
    expected_stock: u32,
  ) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
      r#"
            UPDATE products
            SET stock = $2, updated_at = $3
            WHERE id = $1 AND stock = $4
            "#,
    )
    .bind(product.id().value())
    .bind(stock_param(product.stock())?)
    .bind(product.updated_at())
    .bind(stock_param(expected_stock)?)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected() == 1)
  }

  async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
      "SELECT {} FROM products WHERE id = $1",
      PRODUCT_COLUMNS
    ))
    .bind(id.value())
    .fetch_optional(&self.pool)
    .await?;

    row.map(Product::try_from).transpose()
  }

  async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
    self
      .fetch(
        &format!(
          "SELECT {} FROM products ORDER BY created_at DESC",
          PRODUCT_COLUMNS
        ),
        &[],
      )
      .await
  }

  async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
    self
      .fetch(
        &format!(
          "SELECT {} FROM products WHERE category = $1 ORDER BY name",
          PRODUCT_COLUMNS
        ),
        &[category],
      )
      .await
  }

  async fn find_low_stock(&self, threshold: u32) -> Result<Vec<Product>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
      "SELECT {} FROM products WHERE stock > 0 AND stock < $1 ORDER BY stock, name",
      PRODUCT_COLUMNS
    ))
    .bind(i64::from(threshold))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Product::try_from).collect()
  }

  async fn find_out_of_stock(&self) -> Result<Vec<Product>, RepositoryError> {
    self
      .fetch(
        &format!(
          "SELECT {} FROM products WHERE stock = 0 ORDER BY name",
          PRODUCT_COLUMNS
        ),
        &[],
      )
      .await
  }

  async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
    let pattern = contains_pattern(query);
    self
      .fetch(
        &format!(
          "SELECT {} FROM products WHERE name ILIKE $1 OR description ILIKE $1 ORDER BY name",
          PRODUCT_COLUMNS
        ),
        &[&pattern],
      )
      .await
  }

  async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
    let pattern = contains_pattern(name);
    self
      .fetch(
        &format!(
          "SELECT {} FROM products WHERE name ILIKE $1 ORDER BY name",
          PRODUCT_COLUMNS
        ),
        &[&pattern],
      )
      .await
  }

  async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id.value())
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }

  async fn exists(&self, id: &ProductId) -> Result<bool, RepositoryError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
      .bind(id.value())
      .fetch_one(&self.pool)
      .await?;

    Ok(exists)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::inventory::{MAX_PRICE, MAX_STOCK, NewProduct};
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;
  use rust_decimal_macros::dec;

  fn product(id: &str, name: &str, stock: i64) -> Product {
    Product::create(NewProduct {
      id: id.to_string(),
      name: name.to_string(),
      price: Money::new(dec!(25.50), "MXN").unwrap(),
      stock,
      description: Some("Hand made".to_string()),
      category: Some("mugs".to_string()),
      image_url: None,
    })
    .unwrap()
  }

  #[test]
  fn test_contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("mug"), "%mug%");
    assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_save_and_find_product() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool);

    let mug = product("mug-1", "Blue Mug", 4);
    repo.save(&mug).await.unwrap();

    let found = repo.find_by_id(mug.id()).await.unwrap().unwrap();
    assert_eq!(found.name(), "Blue Mug");
    assert_eq!(found.price().amount(), dec!(25.50));
    assert_eq!(found.stock(), 4);
    assert!(repo.exists(mug.id()).await.unwrap());
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_round_trips_largest_price_and_stock() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool);

    let bar = Product::create(NewProduct {
      id: "bar-1".to_string(),
      name: "Gold Bar".to_string(),
      price: Money::new(MAX_PRICE, "MXN").unwrap(),
      stock: i64::from(MAX_STOCK),
      description: None,
      category: None,
      image_url: None,
    })
    .unwrap();
    repo.save(&bar).await.unwrap();

    let found = repo.find_by_id(bar.id()).await.unwrap().unwrap();
    assert_eq!(found.price().amount(), MAX_PRICE);
    assert_eq!(found.stock(), MAX_STOCK);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_save_keeps_stored_stock() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool);

    let mug = product("mug-1", "Blue Mug", 4);
    repo.save(&mug).await.unwrap();

    let mut edited = product("mug-1", "Red Mug", 99);
    edited.update_category(Some("kitchen"));
    repo.save(&edited).await.unwrap();

    let found = repo.find_by_id(mug.id()).await.unwrap().unwrap();
    assert_eq!(found.name(), "Red Mug");
    assert_eq!(found.category(), Some("kitchen"));
    assert_eq!(found.stock(), 4);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_update_stock_compares_expected_value() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool);

    let mut mug = product("mug-1", "Blue Mug", 4);
    repo.save(&mug).await.unwrap();

    mug.decrease_stock(1).unwrap();
    assert!(repo.update_stock(&mug, 4).await.unwrap());
    // a second writer that read 4 loses
    assert!(!repo.update_stock(&mug, 4).await.unwrap());

    let found = repo.find_by_id(mug.id()).await.unwrap().unwrap();
    assert_eq!(found.stock(), 3);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_stock_queries_and_search() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool);

    repo.save(&product("p1", "Blue Mug", 0)).await.unwrap();
    repo.save(&product("p2", "Green Mug", 3)).await.unwrap();
    repo.save(&product("p3", "Teapot 100%", 50)).await.unwrap();

    let low = repo.find_low_stock(10).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id().value(), "p2");

    let out = repo.find_out_of_stock().await.unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id().value(), "p1");

    assert_eq!(repo.search("mug").await.unwrap().len(), 2);
    assert_eq!(repo.search("hand").await.unwrap().len(), 3);
    assert_eq!(repo.search_by_name("hand").await.unwrap().len(), 0);
    assert_eq!(repo.search_by_name("100%").await.unwrap().len(), 1);
    assert_eq!(repo.find_by_category("mugs").await.unwrap().len(), 3);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_delete_product() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool);

    let mug = product("mug-1", "Blue Mug", 4);
    repo.save(&mug).await.unwrap();

    assert!(repo.delete(mug.id()).await.unwrap());
    assert!(!repo.delete(mug.id()).await.unwrap());
    assert!(repo.find_by_id(mug.id()).await.unwrap().is_none());
  }
}

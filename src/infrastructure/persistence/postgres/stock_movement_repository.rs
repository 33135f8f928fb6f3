use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::inventory::{
  ProductId, RepositoryError, StockMovement, StockMovementRepository, StockMovementType,
};

/// PostgreSQL implementation of the StockMovementRepository trait
pub struct PostgresStockMovementRepository {
  pool: PgPool,
}

impl PostgresStockMovementRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct StockMovementRow {
  id: Uuid,
  product_id: String,
  quantity: i32,
  #[sqlx(rename = "type")]
  movement_type: String,
  reason: String,
  user_id: Option<String>,
  created_at: DateTime<Utc>,
}

impl TryFrom<StockMovementRow> for StockMovement {
  type Error = RepositoryError;

  fn try_from(row: StockMovementRow) -> Result<Self, Self::Error> {
    let corrupt = |e: &dyn std::fmt::Display| {
      RepositoryError::CorruptRecord(format!("movement {}: {}", row.id, e))
    };
    let product_id = ProductId::new(&row.product_id).map_err(|e| corrupt(&e))?;
    let quantity = u32::try_from(row.quantity).map_err(|e| corrupt(&e))?;
    let movement_type = row
      .movement_type
      .parse::<StockMovementType>()
      .map_err(|e| corrupt(&e))?;

    StockMovement::from_db(
      row.id,
      product_id,
      quantity,
      movement_type,
      row.reason,
      row.created_at,
      row.user_id,
    )
    .map_err(|e| corrupt(&e))
  }
}

#[async_trait]
impl StockMovementRepository for PostgresStockMovementRepository {
  async fn save(&self, movement: &StockMovement) -> Result<(), RepositoryError> {
    let quantity = i32::try_from(movement.quantity()).map_err(|_| {
      RepositoryError::QueryFailed(format!("Quantity out of range: {}", movement.quantity()))
    })?;

    sqlx::query(
      r#"
            INSERT INTO stock_movements
                (id, product_id, quantity, type, reason, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
    )
    .bind(movement.id())
    .bind(movement.product_id().value())
    .bind(quantity)
    .bind(movement.movement_type().as_str())
    .bind(movement.reason())
    .bind(movement.user_id())
    .bind(movement.date())
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn find_by_product_id(
    &self,
    product_id: &ProductId,
  ) -> Result<Vec<StockMovement>, RepositoryError> {
    let rows = sqlx::query_as::<_, StockMovementRow>(
      r#"
            SELECT id, product_id, quantity, type, reason, user_id, created_at
            FROM stock_movements
            WHERE product_id = $1
            ORDER BY created_at DESC
            "#,
    )
    .bind(product_id.value())
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(StockMovement::try_from).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_save_and_list_movements() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresStockMovementRepository::new(pool);
    let product_id = ProductId::new("mug-1").unwrap();

    let restock = StockMovement::new(
      product_id.clone(),
      10,
      StockMovementType::In,
      "Supplier delivery",
      Utc::now(),
      Some("clerk-7"),
    )
    .unwrap();
    let sold = StockMovement::new(
      product_id.clone(),
      2,
      StockMovementType::Out,
      "",
      Utc::now(),
      None,
    )
    .unwrap();
    repo.save(&restock).await.unwrap();
    repo.save(&sold).await.unwrap();

    let movements = repo.find_by_product_id(&product_id).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert!(movements.iter().any(|m| m.user_id() == Some("clerk-7")));
    assert!(movements
      .iter()
      .any(|m| m.movement_type() == StockMovementType::Out && m.quantity() == 2));

    let other = ProductId::new("other").unwrap();
    assert!(repo.find_by_product_id(&other).await.unwrap().is_empty());
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_duplicate_movement_is_rejected() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresStockMovementRepository::new(pool);

    let movement = StockMovement::new(
      ProductId::new("mug-1").unwrap(),
      1,
      StockMovementType::Adjustment,
      "Count",
      Utc::now(),
      None,
    )
    .unwrap();
    repo.save(&movement).await.unwrap();

    let result = repo.save(&movement).await;
    assert!(matches!(result, Err(RepositoryError::DuplicateKey(_))));
  }
}

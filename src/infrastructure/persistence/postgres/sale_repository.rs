use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::inventory::{Money, ProductId, RepositoryError};
use crate::domain::sales::{Sale, SaleItem, SaleRepository};

/// PostgreSQL implementation of the SaleRepository trait
///
/// A sale is stored as one `sales` row plus one `sale_items` row per line,
/// written in a single transaction.
pub struct PostgresSaleRepository {
  pool: PgPool,
}

impl PostgresSaleRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SaleRow {
  id: Uuid,
  customer_name: Option<String>,
  created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
  id: Uuid,
  sale_id: Uuid,
  product_id: String,
  product_name: String,
  quantity: i32,
  unit_price: Decimal,
  currency: String,
}

impl TryFrom<SaleItemRow> for SaleItem {
  type Error = RepositoryError;

  fn try_from(row: SaleItemRow) -> Result<Self, Self::Error> {
    let corrupt = |e: &dyn std::fmt::Display| {
      RepositoryError::CorruptRecord(format!("sale item {}: {}", row.id, e))
    };
    let product_id = ProductId::new(&row.product_id).map_err(|e| corrupt(&e))?;
    let quantity = u32::try_from(row.quantity).map_err(|e| corrupt(&e))?;
    let unit_price = Money::new(row.unit_price, &row.currency).map_err(|e| corrupt(&e))?;

    SaleItem::new(row.id, product_id, &row.product_name, quantity, unit_price)
      .map_err(|e| corrupt(&e))
  }
}

/// Loads the lines of `rows` and assembles the sales, keeping the row order.
pub(super) async fn assemble_sales(
  pool: &PgPool,
  rows: Vec<SaleRow>,
) -> Result<Vec<Sale>, RepositoryError> {
  if rows.is_empty() {
    return Ok(Vec::new());
  }

  let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
  let item_rows = sqlx::query_as::<_, SaleItemRow>(
    r#"
        SELECT id, sale_id, product_id, product_name, quantity, unit_price, currency
        FROM sale_items
        WHERE sale_id = ANY($1)
        ORDER BY sale_id, position
        "#,
  )
  .bind(&ids)
  .fetch_all(pool)
  .await?;

  let mut items_by_sale: HashMap<Uuid, Vec<SaleItem>> = HashMap::new();
  for row in item_rows {
    let sale_id = row.sale_id;
    items_by_sale
      .entry(sale_id)
      .or_default()
      .push(SaleItem::try_from(row)?);
  }

  rows
    .into_iter()
    .map(|row| {
      let items = items_by_sale.remove(&row.id).unwrap_or_default();
      Sale::new(row.id, row.created_at, items, row.customer_name.as_deref())
        .map_err(|e| RepositoryError::CorruptRecord(format!("sale {}: {}", row.id, e)))
    })
    .collect()
}

fn quantity_param(quantity: u32) -> Result<i32, RepositoryError> {
  i32::try_from(quantity)
    .map_err(|_| RepositoryError::QueryFailed(format!("Quantity out of range: {}", quantity)))
}

#[async_trait]
impl SaleRepository for PostgresSaleRepository {
  async fn save(&self, sale: &Sale) -> Result<(), RepositoryError> {
    let mut tx = self
      .pool
      .begin()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(e.to_string()))?;

    sqlx::query(
      r#"
            INSERT INTO sales (id, customer_name, total_amount, currency, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
    )
    .bind(sale.id())
    .bind(sale.customer_name())
    .bind(sale.total().amount())
    .bind(sale.currency().as_str())
    .bind(sale.date())
    .execute(&mut *tx)
    .await?;

    for (position, item) in sale.items().iter().enumerate() {
      sqlx::query(
        r#"
                INSERT INTO sale_items (
                    id, sale_id, position, product_id, product_name,
                    quantity, unit_price, currency, subtotal
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
      )
      .bind(item.id())
      .bind(sale.id())
      .bind(position as i32)
      .bind(item.product_id().value())
      .bind(item.product_name())
      .bind(quantity_param(item.quantity())?)
      .bind(item.unit_price().amount())
      .bind(item.unit_price().currency().as_str())
      .bind(item.subtotal().amount())
      .execute(&mut *tx)
      .await?;
    }

    tx.commit()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(e.to_string()))?;

    Ok(())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, RepositoryError> {
    let row = sqlx::query_as::<_, SaleRow>(
      "SELECT id, customer_name, created_at FROM sales WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    let Some(row) = row else {
      return Ok(None);
    };
    Ok(assemble_sales(&self.pool, vec![row]).await?.pop())
  }
}

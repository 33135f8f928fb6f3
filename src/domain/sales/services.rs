use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Sale, SaleItem};
use super::errors::SaleError;
use super::ports::SaleRepository;
use crate::domain::inventory::entities::StockMovement;
use crate::domain::inventory::errors::InventoryError;
use crate::domain::inventory::services::InventoryService;
use crate::domain::inventory::value_objects::{ProductId, StockMovementType, ValueObjectError};

/// One requested line of a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
  pub product_id: ProductId,
  pub quantity: u32,
}

pub struct SaleService {
  sale_repo: Arc<dyn SaleRepository>,
  inventory: Arc<InventoryService>,
}

impl SaleService {
  pub fn new(sale_repo: Arc<dyn SaleRepository>, inventory: Arc<InventoryService>) -> Self {
    Self {
      sale_repo,
      inventory,
    }
  }

  /// Sells every line in order, then records the sale.
  ///
  /// Lines are applied one at a time: the product's stock and its OUT movement
  /// are written before the next line is looked at. A failure on a later line
  /// does not restore earlier lines; it is logged with the number of lines
  /// already applied and returned to the caller.
  pub async fn create_sale(
    &self,
    customer_name: Option<&str>,
    lines: Vec<SaleLine>,
  ) -> Result<Sale, SaleError> {
    if lines.is_empty() {
      return Err(SaleError::NoItems);
    }
    if lines.iter().any(|line| line.quantity == 0) {
      return Err(SaleError::Validation(ValueObjectError::InvalidQuantity(
        "Quantity must be greater than zero".to_string(),
      )));
    }

    let sale_id = Uuid::new_v4();
    let date = Utc::now();
    let reason = format!("Sale #{}", &sale_id.simple().to_string()[..8]);

    let mut items: Vec<SaleItem> = Vec::with_capacity(lines.len());
    for line in &lines {
      match self.sell_line(line, &items, &reason, date).await {
        Ok(item) => items.push(item),
        Err(error) => {
          if !items.is_empty() {
            tracing::warn!(
              sale_id = %sale_id,
              applied_items = items.len(),
              failed_product = %line.product_id,
              error = %error,
              "Sale aborted after earlier items were already taken from stock"
            );
          }
          return Err(error);
        }
      }
    }

    let sale = Sale::new(sale_id, date, items, customer_name)?;
    if let Err(error) = self.sale_repo.save(&sale).await {
      tracing::warn!(
        sale_id = %sale_id,
        applied_items = sale.items().len(),
        error = %error,
        "Stock was taken but the sale record could not be saved"
      );
      return Err(error.context("Failed to save sale").into());
    }

    tracing::info!(sale_id = %sale_id, total = %sale.total(), "Sale recorded");
    Ok(sale)
  }

  pub async fn get_sale(&self, id: Uuid) -> Result<Sale, SaleError> {
    self
      .sale_repo
      .find_by_id(id)
      .await?
      .ok_or(SaleError::SaleNotFound(id))
  }

  async fn sell_line(
    &self,
    line: &SaleLine,
    previous: &[SaleItem],
    reason: &str,
    date: DateTime<Utc>,
  ) -> Result<SaleItem, SaleError> {
    let mut product = self.inventory.get_product(&line.product_id).await?;

    if !product.has_enough_stock(line.quantity) {
      return Err(
        InventoryError::InsufficientStock {
          product_id: product.id().to_string(),
          product_name: product.name().to_string(),
          available: product.stock(),
          requested: line.quantity,
        }
        .into(),
      );
    }
    if let Some(first) = previous.first() {
      let expected = first.unit_price().currency();
      if product.price().currency() != expected {
        return Err(SaleError::Validation(ValueObjectError::CurrencyMismatch {
          expected: expected.to_string(),
          actual: product.price().currency().to_string(),
        }));
      }
    }

    let expected_stock = product.stock();
    product.decrease_stock(line.quantity)?;

    let movement = StockMovement::new(
      product.id().clone(),
      line.quantity,
      StockMovementType::Out,
      reason,
      date,
      None,
    )?;
    let item = SaleItem::new(
      Uuid::new_v4(),
      product.id().clone(),
      product.name(),
      line.quantity,
      product.price().clone(),
    )?;

    self.inventory.persist_stock(&product, expected_stock).await?;
    self.inventory.record_movement(&movement).await?;

    Ok(item)
  }
}

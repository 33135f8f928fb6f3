use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::inventory::MoneyDto;
use crate::domain::inventory::{ProductId, ValueObjectError};
use crate::domain::sales::{SaleError, SaleLine, SaleService};

#[derive(Debug, Deserialize)]
pub struct CreateSaleItemDto {
  pub product_id: String,
  pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleCommand {
  pub customer_name: Option<String>,
  pub items: Vec<CreateSaleItemDto>,
}

#[derive(Debug, Serialize)]
pub struct CreateSaleResponse {
  pub sale_id: Uuid,
  pub date: DateTime<Utc>,
  pub total: MoneyDto,
  pub item_count: usize,
}

pub struct CreateSaleUseCase {
  sale_service: Arc<SaleService>,
}

impl CreateSaleUseCase {
  pub fn new(sale_service: Arc<SaleService>) -> Self {
    Self { sale_service }
  }

  pub async fn execute(&self, command: CreateSaleCommand) -> Result<CreateSaleResponse, SaleError> {
    let lines = command
      .items
      .into_iter()
      .map(|item| {
        let product_id = ProductId::new(&item.product_id)?;
        let quantity = u32::try_from(item.quantity)
          .ok()
          .filter(|q| *q > 0)
          .ok_or_else(|| {
            ValueObjectError::InvalidQuantity(format!(
              "Quantity for {} must be a positive number, got {}",
              product_id, item.quantity
            ))
          })?;
        Ok(SaleLine {
          product_id,
          quantity,
        })
      })
      .collect::<Result<Vec<_>, ValueObjectError>>()?;

    let sale = self
      .sale_service
      .create_sale(command.customer_name.as_deref(), lines)
      .await?;

    Ok(CreateSaleResponse {
      sale_id: sale.id(),
      date: sale.date(),
      total: sale.total().into(),
      item_count: sale.items().len(),
    })
  }
}

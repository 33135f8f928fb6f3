use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::inventory::MoneyDto;
use crate::domain::sales::{SaleError, SaleService};

#[derive(Debug, Deserialize)]
pub struct GetSaleReceiptCommand {
  pub sale_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ReceiptLineDto {
  pub product_id: String,
  pub product_name: String,
  pub quantity: u32,
  pub unit_price: Decimal,
  pub subtotal: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
  pub sale_id: Uuid,
  pub date: DateTime<Utc>,
  pub customer_name: Option<String>,
  pub items: Vec<ReceiptLineDto>,
  pub total: MoneyDto,
  pub tax_rate: Decimal,
  /// `total` x `tax_rate`.
  pub tax: MoneyDto,
  pub currency: String,
}

pub struct GetSaleReceiptUseCase {
  sale_service: Arc<SaleService>,
  tax_rate: Decimal,
}

impl GetSaleReceiptUseCase {
  pub fn new(sale_service: Arc<SaleService>, tax_rate: Decimal) -> Self {
    Self {
      sale_service,
      tax_rate,
    }
  }

  pub async fn execute(
    &self,
    command: GetSaleReceiptCommand,
  ) -> Result<ReceiptResponse, SaleError> {
    let sale = self.sale_service.get_sale(command.sale_id).await?;
    let tax = sale.calculate_tax(self.tax_rate)?;

    let items = sale
      .items()
      .iter()
      .map(|item| ReceiptLineDto {
        product_id: item.product_id().to_string(),
        product_name: item.product_name().to_string(),
        quantity: item.quantity(),
        unit_price: item.unit_price().amount(),
        subtotal: item.subtotal().amount(),
      })
      .collect();

    Ok(ReceiptResponse {
      sale_id: sale.id(),
      date: sale.date(),
      customer_name: sale.customer_name().map(str::to_string),
      items,
      total: sale.total().into(),
      tax_rate: self.tax_rate,
      tax: (&tax).into(),
      currency: sale.currency().to_string(),
    })
  }
}

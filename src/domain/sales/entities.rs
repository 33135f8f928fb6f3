use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::inventory::value_objects::{
  Currency, Money, ProductId, ValueObjectError, normalize_optional,
};

/// Line of a sale. Name and price are snapshots taken when the sale was made.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleItem {
  id: Uuid,
  product_id: ProductId,
  product_name: String,
  quantity: u32,
  unit_price: Money,
  subtotal: Money,
}

impl SaleItem {
  pub fn new(
    id: Uuid,
    product_id: ProductId,
    product_name: &str,
    quantity: u32,
    unit_price: Money,
  ) -> Result<Self, ValueObjectError> {
    if quantity == 0 {
      return Err(ValueObjectError::InvalidQuantity(
        "Sale item quantity must be greater than zero".to_string(),
      ));
    }
    let subtotal = unit_price.times(quantity)?;
    Ok(Self {
      id,
      product_id,
      product_name: product_name.trim().to_string(),
      quantity,
      unit_price,
      subtotal,
    })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn product_id(&self) -> &ProductId {
    &self.product_id
  }

  pub fn product_name(&self) -> &str {
    &self.product_name
  }

  pub fn quantity(&self) -> u32 {
    self.quantity
  }

  pub fn unit_price(&self) -> &Money {
    &self.unit_price
  }

  pub fn subtotal(&self) -> &Money {
    &self.subtotal
  }

  fn with_added_quantity(&self, extra: u32) -> Result<Self, ValueObjectError> {
    let quantity = self.quantity.checked_add(extra).ok_or_else(|| {
      ValueObjectError::InvalidQuantity(format!("Quantity cannot exceed {}", u32::MAX))
    })?;
    Self::new(
      self.id,
      self.product_id.clone(),
      &self.product_name,
      quantity,
      self.unit_price.clone(),
    )
  }
}

/// Sale aggregate. Owns its lines and keeps `total` in sync with them.
///
/// All lines share one currency; the total of an empty sale is zero in the
/// default currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
  id: Uuid,
  date: DateTime<Utc>,
  items: Vec<SaleItem>,
  customer_name: Option<String>,
  total: Money,
}

impl Sale {
  pub fn new(
    id: Uuid,
    date: DateTime<Utc>,
    items: Vec<SaleItem>,
    customer_name: Option<&str>,
  ) -> Result<Self, ValueObjectError> {
    if let Some(first) = items.first() {
      for item in &items[1..] {
        ensure_currency(first.unit_price.currency(), item)?;
      }
    }
    let total = compute_total(&items)?;
    Ok(Self {
      id,
      date,
      items,
      customer_name: normalize_optional(customer_name),
      total,
    })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn date(&self) -> DateTime<Utc> {
    self.date
  }

  pub fn items(&self) -> &[SaleItem] {
    &self.items
  }

  pub fn customer_name(&self) -> Option<&str> {
    self.customer_name.as_deref()
  }

  pub fn total(&self) -> &Money {
    &self.total
  }

  pub fn currency(&self) -> &Currency {
    self.total.currency()
  }

  /// Adds a line, merging into an existing line for the same product. A merged
  /// line keeps its original id and unit price.
  pub fn add_item(&mut self, item: SaleItem) -> Result<(), ValueObjectError> {
    if let Some(first) = self.items.first() {
      ensure_currency(first.unit_price.currency(), &item)?;
    }

    let mut items = self.items.clone();
    match items
      .iter()
      .position(|existing| existing.product_id == item.product_id)
    {
      Some(index) => {
        let merged = items[index].with_added_quantity(item.quantity)?;
        items[index] = merged;
      }
      None => items.push(item),
    }
    self.total = compute_total(&items)?;
    self.items = items;
    Ok(())
  }

  pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), ValueObjectError> {
    let items: Vec<SaleItem> = self
      .items
      .iter()
      .filter(|item| &item.product_id != product_id)
      .cloned()
      .collect();
    self.total = compute_total(&items)?;
    self.items = items;
    Ok(())
  }

  pub fn calculate_tax(&self, rate: Decimal) -> Result<Money, ValueObjectError> {
    self.total.multiply(rate)
  }
}

fn ensure_currency(expected: &Currency, item: &SaleItem) -> Result<(), ValueObjectError> {
  if item.unit_price.currency() != expected {
    return Err(ValueObjectError::CurrencyMismatch {
      expected: expected.to_string(),
      actual: item.unit_price.currency().to_string(),
    });
  }
  Ok(())
}

fn compute_total(items: &[SaleItem]) -> Result<Money, ValueObjectError> {
  let currency = items
    .first()
    .map(|first| first.unit_price.currency().clone())
    .unwrap_or_default();
  Money::sum(currency, items.iter().map(|item| &item.subtotal))
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::errors::InventoryError;
use super::value_objects::{
  Money, ProductId, ProductName, StockMovementType, ValueObjectError, normalize_optional,
};

/// Stock strictly between zero and this value counts as low.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Largest price a product can carry; prices are stored as `NUMERIC(12,2)`.
pub const MAX_PRICE: Decimal = dec!(9999999999.99);
/// Digits allowed after the decimal point of a price.
pub const PRICE_SCALE: u32 = 2;
/// Stock is stored as a 32-bit signed integer.
pub const MAX_STOCK: u32 = i32::MAX as u32;

/// Input for [`Product::create`].
#[derive(Debug, Clone)]
pub struct NewProduct {
  pub id: String,
  pub name: String,
  pub price: Money,
  pub stock: i64,
  pub description: Option<String>,
  pub category: Option<String>,
  pub image_url: Option<String>,
}

/// Product entity
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
  id: ProductId,
  name: ProductName,
  price: Money,
  stock: u32,
  description: Option<String>,
  category: Option<String>,
  image_url: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl Product {
  pub fn create(data: NewProduct) -> Result<Self, InventoryError> {
    let id = ProductId::new(&data.id)?;
    let name = ProductName::new(&data.name)?;
    Self::ensure_valid_price(&data.price)?;
    let stock = u32::try_from(data.stock)
      .ok()
      .filter(|stock| *stock <= MAX_STOCK)
      .ok_or_else(|| {
        ValueObjectError::InvalidStock(format!("Stock must be between 0 and {}", MAX_STOCK))
      })?;

    let now = Utc::now();
    Ok(Self {
      id,
      name,
      price: data.price,
      stock,
      description: normalize_optional(data.description.as_deref()),
      category: normalize_optional(data.category.as_deref()),
      image_url: normalize_optional(data.image_url.as_deref()),
      created_at: now,
      updated_at: now,
    })
  }

  /// Reconstructs a product from storage without re-stamping timestamps.
  /// Stored values are held to the same bounds as new ones.
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: ProductId,
    name: ProductName,
    price: Money,
    stock: u32,
    description: Option<String>,
    category: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Result<Self, ValueObjectError> {
    Self::ensure_valid_price(&price)?;
    if stock > MAX_STOCK {
      return Err(ValueObjectError::InvalidStock(format!(
        "Stock must be between 0 and {}",
        MAX_STOCK
      )));
    }
    Ok(Self {
      id,
      name,
      price,
      stock,
      description,
      category,
      image_url,
      created_at,
      updated_at,
    })
  }

  pub fn id(&self) -> &ProductId {
    &self.id
  }

  pub fn name(&self) -> &str {
    self.name.value()
  }

  pub fn price(&self) -> &Money {
    &self.price
  }

  pub fn stock(&self) -> u32 {
    self.stock
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn category(&self) -> Option<&str> {
    self.category.as_deref()
  }

  pub fn image_url(&self) -> Option<&str> {
    self.image_url.as_deref()
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn updated_at(&self) -> DateTime<Utc> {
    self.updated_at
  }

  pub fn update_name(&mut self, name: &str) -> Result<(), InventoryError> {
    self.name = ProductName::new(name)?;
    self.touch();
    Ok(())
  }

  pub fn update_price(&mut self, price: Money) -> Result<(), InventoryError> {
    Self::ensure_valid_price(&price)?;
    self.price = price;
    self.touch();
    Ok(())
  }

  pub fn update_description(&mut self, description: Option<&str>) {
    self.description = normalize_optional(description);
    self.touch();
  }

  pub fn update_category(&mut self, category: Option<&str>) {
    self.category = normalize_optional(category);
    self.touch();
  }

  pub fn update_image_url(&mut self, image_url: Option<&str>) {
    self.image_url = normalize_optional(image_url);
    self.touch();
  }

  pub fn increase_stock(&mut self, quantity: u32) -> Result<(), InventoryError> {
    Self::ensure_positive_quantity(quantity)?;
    self.stock = self
      .stock
      .checked_add(quantity)
      .filter(|stock| *stock <= MAX_STOCK)
      .ok_or_else(|| {
        ValueObjectError::InvalidQuantity(format!("Stock cannot exceed {}", MAX_STOCK))
      })?;
    self.touch();
    Ok(())
  }

  pub fn decrease_stock(&mut self, quantity: u32) -> Result<(), InventoryError> {
    Self::ensure_positive_quantity(quantity)?;
    if !self.has_enough_stock(quantity) {
      return Err(InventoryError::InsufficientStock {
        product_id: self.id.to_string(),
        product_name: self.name.to_string(),
        available: self.stock,
        requested: quantity,
      });
    }
    self.stock -= quantity;
    self.touch();
    Ok(())
  }

  pub fn has_enough_stock(&self, quantity: u32) -> bool {
    self.stock >= quantity
  }

  pub fn is_out_of_stock(&self) -> bool {
    self.stock == 0
  }

  pub fn has_low_stock(&self) -> bool {
    self.stock > 0 && self.stock < LOW_STOCK_THRESHOLD
  }

  /// Price times stock. Both are bounded by `MAX_PRICE` and `MAX_STOCK`, so
  /// the product is far below `Decimal::MAX`.
  pub fn inventory_value(&self) -> Money {
    let amount = self.price.amount().saturating_mul(Decimal::from(self.stock));
    Money::non_negative(amount, self.price.currency().clone())
  }

  /// Replaces the stock value as read back from storage.
  pub(crate) fn overwrite_stock(&mut self, stock: u32, updated_at: DateTime<Utc>) {
    self.stock = stock;
    self.updated_at = updated_at;
  }

  fn touch(&mut self) {
    self.updated_at = Utc::now();
  }

  fn ensure_valid_price(price: &Money) -> Result<(), ValueObjectError> {
    let amount = price.amount();
    if amount <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidPrice(
        "Price must be greater than zero".to_string(),
      ));
    }
    if amount > MAX_PRICE {
      return Err(ValueObjectError::InvalidPrice(format!(
        "Price cannot exceed {}",
        MAX_PRICE
      )));
    }
    if amount.normalize().scale() > PRICE_SCALE {
      return Err(ValueObjectError::InvalidPrice(format!(
        "Price cannot have more than {} decimal places",
        PRICE_SCALE
      )));
    }
    Ok(())
  }

  fn ensure_positive_quantity(quantity: u32) -> Result<(), ValueObjectError> {
    if quantity == 0 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be greater than zero".to_string(),
      ));
    }
    Ok(())
  }
}

/// Append-only audit record of one stock change. `quantity` is a magnitude,
/// the direction comes from `movement_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct StockMovement {
  id: Uuid,
  product_id: ProductId,
  quantity: u32,
  movement_type: StockMovementType,
  reason: String,
  date: DateTime<Utc>,
  user_id: Option<String>,
}

impl StockMovement {
  pub fn new(
    product_id: ProductId,
    quantity: u32,
    movement_type: StockMovementType,
    reason: &str,
    date: DateTime<Utc>,
    user_id: Option<&str>,
  ) -> Result<Self, ValueObjectError> {
    Self::from_db(
      Uuid::new_v4(),
      product_id,
      quantity,
      movement_type,
      reason.trim().to_string(),
      date,
      normalize_optional(user_id),
    )
  }

  pub fn from_db(
    id: Uuid,
    product_id: ProductId,
    quantity: u32,
    movement_type: StockMovementType,
    reason: String,
    date: DateTime<Utc>,
    user_id: Option<String>,
  ) -> Result<Self, ValueObjectError> {
    if quantity == 0 {
      return Err(ValueObjectError::InvalidQuantity(
        "Movement quantity must be greater than zero".to_string(),
      ));
    }
    Ok(Self {
      id,
      product_id,
      quantity,
      movement_type,
      reason,
      date,
      user_id,
    })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn product_id(&self) -> &ProductId {
    &self.product_id
  }

  pub fn quantity(&self) -> u32 {
    self.quantity
  }

  pub fn movement_type(&self) -> StockMovementType {
    self.movement_type
  }

  pub fn reason(&self) -> &str {
    &self.reason
  }

  pub fn date(&self) -> DateTime<Utc> {
    self.date
  }

  pub fn user_id(&self) -> Option<&str> {
    self.user_id.as_deref()
  }
}

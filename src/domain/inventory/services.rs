use chrono::Utc;
use std::sync::Arc;

use super::entities::{Product, StockMovement};
use super::errors::InventoryError;
use super::ports::{ProductRepository, StockMovementRepository};
use super::value_objects::{Money, ProductId, StockMovementType, ValueObjectError};

/// A typed stock change. `Adjust` carries a signed delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
  Increase(u32),
  Decrease(u32),
  Adjust(i64),
}

impl StockChange {
  /// Builds a change from the wire shape `{type, quantity}`.
  pub fn from_parts(
    movement_type: StockMovementType,
    quantity: i64,
  ) -> Result<Self, ValueObjectError> {
    match movement_type {
      StockMovementType::In => Ok(StockChange::Increase(positive_quantity(quantity)?)),
      StockMovementType::Out => Ok(StockChange::Decrease(positive_quantity(quantity)?)),
      StockMovementType::Adjustment => {
        if quantity == 0 {
          return Err(ValueObjectError::InvalidQuantity(
            "Adjustment cannot be zero".to_string(),
          ));
        }
        // magnitude has to fit the stock column
        magnitude(quantity)?;
        Ok(StockChange::Adjust(quantity))
      }
    }
  }

  pub fn movement_type(&self) -> StockMovementType {
    match self {
      StockChange::Increase(_) => StockMovementType::In,
      StockChange::Decrease(_) => StockMovementType::Out,
      StockChange::Adjust(_) => StockMovementType::Adjustment,
    }
  }

  fn apply(&self, product: &mut Product) -> Result<u32, InventoryError> {
    match *self {
      StockChange::Increase(quantity) => {
        product.increase_stock(quantity)?;
        Ok(quantity)
      }
      StockChange::Decrease(quantity) => {
        product.decrease_stock(quantity)?;
        Ok(quantity)
      }
      StockChange::Adjust(delta) => {
        let quantity = magnitude(delta)?;
        if delta > 0 {
          product.increase_stock(quantity)?;
        } else {
          product.decrease_stock(quantity)?;
        }
        Ok(quantity)
      }
    }
  }
}

fn positive_quantity(quantity: i64) -> Result<u32, ValueObjectError> {
  if quantity <= 0 {
    return Err(ValueObjectError::InvalidQuantity(
      "Quantity must be greater than zero".to_string(),
    ));
  }
  magnitude(quantity)
}

fn magnitude(delta: i64) -> Result<u32, ValueObjectError> {
  u32::try_from(delta.unsigned_abs())
    .map_err(|_| ValueObjectError::InvalidQuantity(format!("Quantity is too large: {}", delta)))
}

#[derive(Debug, Clone)]
pub struct StockChangeRequest {
  pub product_id: ProductId,
  pub change: StockChange,
  pub reason: String,
  pub user_id: Option<String>,
}

/// Catalog edits. `None` leaves a field untouched; `Some(None)` clears an
/// optional text field.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub price: Option<Money>,
  pub description: Option<Option<String>>,
  pub category: Option<Option<String>>,
  pub image_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub enum ProductFilter {
  #[default]
  All,
  Category(String),
  OutOfStock,
}

pub struct InventoryService {
  product_repo: Arc<dyn ProductRepository>,
  movement_repo: Arc<dyn StockMovementRepository>,
}

impl InventoryService {
  pub fn new(
    product_repo: Arc<dyn ProductRepository>,
    movement_repo: Arc<dyn StockMovementRepository>,
  ) -> Self {
    Self {
      product_repo,
      movement_repo,
    }
  }

  pub async fn ensure_product_absent(&self, id: &ProductId) -> Result<(), InventoryError> {
    if self.product_repo.exists(id).await? {
      return Err(InventoryError::ProductAlreadyExists(id.to_string()));
    }
    Ok(())
  }

  pub async fn register_product(&self, product: Product) -> Result<Product, InventoryError> {
    self
      .product_repo
      .save(&product)
      .await
      .map_err(|e| e.context("Failed to save product"))?;
    Ok(product)
  }

  pub async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, InventoryError> {
    Ok(self.product_repo.find_by_id(id).await?)
  }

  pub async fn get_product(&self, id: &ProductId) -> Result<Product, InventoryError> {
    self
      .product_repo
      .find_by_id(id)
      .await?
      .ok_or_else(|| InventoryError::ProductNotFound(id.to_string()))
  }

  pub async fn list_products(
    &self,
    filter: &ProductFilter,
  ) -> Result<Vec<Product>, InventoryError> {
    let products = match filter {
      ProductFilter::All => self.product_repo.find_all().await?,
      ProductFilter::Category(category) => self.product_repo.find_by_category(category).await?,
      ProductFilter::OutOfStock => self.product_repo.find_out_of_stock().await?,
    };
    Ok(products)
  }

  pub async fn search_products(
    &self,
    query: &str,
    name_only: bool,
  ) -> Result<Vec<Product>, InventoryError> {
    let products = if name_only {
      self.product_repo.search_by_name(query).await?
    } else {
      self.product_repo.search(query).await?
    };
    Ok(products)
  }

  pub async fn low_stock_products(&self, threshold: u32) -> Result<Vec<Product>, InventoryError> {
    Ok(self.product_repo.find_low_stock(threshold).await?)
  }

  pub async fn update_product(
    &self,
    id: &ProductId,
    changes: ProductChanges,
  ) -> Result<Product, InventoryError> {
    let mut product = self.get_product(id).await?;

    if let Some(name) = changes.name {
      product.update_name(&name)?;
    }
    if let Some(price) = changes.price {
      product.update_price(price)?;
    }
    if let Some(description) = changes.description {
      product.update_description(description.as_deref());
    }
    if let Some(category) = changes.category {
      product.update_category(category.as_deref());
    }
    if let Some(image_url) = changes.image_url {
      product.update_image_url(image_url.as_deref());
    }

    self
      .product_repo
      .save(&product)
      .await
      .map_err(|e| e.context("Failed to update product"))?;
    Ok(product)
  }

  pub async fn delete_product(&self, id: &ProductId) -> Result<(), InventoryError> {
    let deleted = self
      .product_repo
      .delete(id)
      .await
      .map_err(|e| e.context("Failed to delete product"))?;
    if !deleted {
      return Err(InventoryError::ProductNotFound(id.to_string()));
    }
    Ok(())
  }

  /// Applies a stock change and appends the matching movement.
  pub async fn apply_stock_change(
    &self,
    request: StockChangeRequest,
  ) -> Result<(Product, StockMovement), InventoryError> {
    let mut product = self.get_product(&request.product_id).await?;
    let expected_stock = product.stock();

    let quantity = request.change.apply(&mut product)?;
    let movement = StockMovement::new(
      product.id().clone(),
      quantity,
      request.change.movement_type(),
      &request.reason,
      Utc::now(),
      request.user_id.as_deref(),
    )?;

    self.persist_stock(&product, expected_stock).await?;
    self.record_movement(&movement).await?;

    Ok((product, movement))
  }

  /// Compare-and-swap write of the product's stock.
  pub async fn persist_stock(
    &self,
    product: &Product,
    expected_stock: u32,
  ) -> Result<(), InventoryError> {
    let written = self
      .product_repo
      .update_stock(product, expected_stock)
      .await
      .map_err(|e| e.context("Failed to update stock"))?;
    if !written {
      return Err(InventoryError::ConcurrentStockUpdate(product.id().to_string()));
    }
    Ok(())
  }

  pub async fn record_movement(&self, movement: &StockMovement) -> Result<(), InventoryError> {
    self
      .movement_repo
      .save(movement)
      .await
      .map_err(|e| e.context("Failed to save stock movement"))?;
    Ok(())
  }

  /// Movements of one product, newest first.
  pub async fn stock_history(
    &self,
    product_id: &ProductId,
  ) -> Result<Vec<StockMovement>, InventoryError> {
    let mut movements = self.movement_repo.find_by_product_id(product_id).await?;
    movements.sort_by(|a, b| b.date().cmp(&a.date()));
    Ok(movements)
  }
}

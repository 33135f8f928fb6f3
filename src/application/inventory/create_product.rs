use serde::Deserialize;
use std::sync::Arc;

use super::dtos::{MoneyDto, ProductResponse};
use crate::domain::inventory::{
  ImageFile, ImageService, InventoryError, InventoryService, NewProduct, Product, ProductId,
  UploadImageOptions,
};

#[derive(Debug, Deserialize)]
pub struct CreateProductCommand {
  pub id: String,
  pub name: String,
  pub price: MoneyDto,
  pub stock: i64,
  pub description: Option<String>,
  pub category: Option<String>,
  pub image_url: Option<String>,
  /// Uploaded picture; takes precedence over `image_url`.
  #[serde(skip)]
  pub image: Option<ImageFile>,
}

pub struct CreateProductUseCase {
  inventory_service: Arc<InventoryService>,
  image_service: Arc<dyn ImageService>,
}

impl CreateProductUseCase {
  pub fn new(
    inventory_service: Arc<InventoryService>,
    image_service: Arc<dyn ImageService>,
  ) -> Self {
    Self {
      inventory_service,
      image_service,
    }
  }

  pub async fn execute(
    &self,
    command: CreateProductCommand,
  ) -> Result<ProductResponse, InventoryError> {
    let id = ProductId::new(&command.id)?;
    let price = command.price.to_money()?;
    self.inventory_service.ensure_product_absent(&id).await?;

    let image_url = match command.image {
      Some(file) => {
        let uploaded = self
          .image_service
          .upload(file, &UploadImageOptions::for_product(&id))
          .await?;
        Some(uploaded.secure_url)
      }
      None => command.image_url,
    };

    let product = Product::create(NewProduct {
      id: id.into_inner(),
      name: command.name,
      price,
      stock: command.stock,
      description: command.description,
      category: command.category,
      image_url,
    })?;
    let product = self.inventory_service.register_product(product).await?;

    Ok(ProductResponse::from(&product))
  }
}

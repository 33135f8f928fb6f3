use serde::Deserialize;
use std::sync::Arc;

use super::dtos::{MoneyDto, ProductResponse};
use crate::domain::inventory::{
  ImageFile, ImageService, InventoryError, InventoryService, ProductChanges, ProductId,
  UploadImageOptions,
};

/// Partial update. Absent fields are left as they are; an empty string clears
/// an optional text field. Stock is changed through stock movements only.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductCommand {
  #[serde(default)]
  pub id: String,
  pub name: Option<String>,
  pub price: Option<MoneyDto>,
  pub description: Option<String>,
  pub category: Option<String>,
  pub image_url: Option<String>,
  #[serde(skip)]
  pub image: Option<ImageFile>,
}

pub struct UpdateProductUseCase {
  inventory_service: Arc<InventoryService>,
  image_service: Arc<dyn ImageService>,
}

impl UpdateProductUseCase {
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
    command: UpdateProductCommand,
  ) -> Result<ProductResponse, InventoryError> {
    let id = ProductId::new(&command.id)?;
    let price = command.price.map(|p| p.to_money()).transpose()?;

    // fail before uploading anything for an unknown product
    self.inventory_service.get_product(&id).await?;

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

    let changes = ProductChanges {
      name: command.name,
      price,
      description: command.description.map(Some),
      category: command.category.map(Some),
      image_url: image_url.map(Some),
    };
    let product = self.inventory_service.update_product(&id, changes).await?;

    Ok(ProductResponse::from(&product))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::test_support::{RecordingImageService, TestContext, png};
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_updates_selected_fields_only() {
    let ctx = TestContext::new();
    let original = ctx.seed_product("p1", dec!(100), 7).await;
    let use_case = UpdateProductUseCase::new(
      ctx.inventory.clone(),
      Arc::new(RecordingImageService::default()),
    );

    let response = use_case
      .execute(UpdateProductCommand {
        id: "p1".to_string(),
        price: Some(MoneyDto {
          amount: dec!(120),
          currency: "MXN".to_string(),
        }),
        category: Some("Drinks".to_string()),
        ..Default::default()
      })
      .await
      .unwrap();

    assert_eq!(response.name, original.name());
    assert_eq!(response.price.amount, dec!(120));
    assert_eq!(response.category.as_deref(), Some("Drinks"));
    assert_eq!(response.stock, 7);
    assert!(response.updated_at >= original.updated_at());
  }

  #[tokio::test]
  async fn test_empty_string_clears_field() {
    let ctx = TestContext::new();
    ctx.seed_product("p1", dec!(100), 7).await;
    let use_case = UpdateProductUseCase::new(
      ctx.inventory.clone(),
      Arc::new(RecordingImageService::default()),
    );

    use_case
      .execute(UpdateProductCommand {
        id: "p1".to_string(),
        category: Some("Drinks".to_string()),
        ..Default::default()
      })
      .await
      .unwrap();
    let response = use_case
      .execute(UpdateProductCommand {
        id: "p1".to_string(),
        category: Some(String::new()),
        ..Default::default()
      })
      .await
      .unwrap();

    assert_eq!(response.category, None);
  }

  #[tokio::test]
  async fn test_rejects_invalid_changes() {
    let ctx = TestContext::new();
    ctx.seed_product("p1", dec!(100), 7).await;
    let use_case = UpdateProductUseCase::new(
      ctx.inventory.clone(),
      Arc::new(RecordingImageService::default()),
    );

    let result = use_case
      .execute(UpdateProductCommand {
        id: "p1".to_string(),
        name: Some("ab".to_string()),
        ..Default::default()
      })
      .await;

    assert!(matches!(result, Err(InventoryError::Validation(_))));
  }

  #[tokio::test]
  async fn test_unknown_product_uploads_nothing() {
    let ctx = TestContext::new();
    let images = Arc::new(RecordingImageService::default());
    let use_case = UpdateProductUseCase::new(ctx.inventory.clone(), images.clone());

    let result = use_case
      .execute(UpdateProductCommand {
        id: "missing".to_string(),
        image: Some(png()),
        ..Default::default()
      })
      .await;

    assert!(matches!(result, Err(InventoryError::ProductNotFound(_))));
    assert!(images.uploads.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_replaces_image() {
    let ctx = TestContext::new();
    ctx.seed_product("p1", dec!(100), 7).await;
    let use_case = UpdateProductUseCase::new(
      ctx.inventory.clone(),
      Arc::new(RecordingImageService::default()),
    );

    let response = use_case
      .execute(UpdateProductCommand {
        id: "p1".to_string(),
        image: Some(png()),
        ..Default::default()
      })
      .await
      .unwrap();

    assert_eq!(
      response.image_url.as_deref(),
      Some("https://cdn.test/products/product-p1")
    );
  }
}

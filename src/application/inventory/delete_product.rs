use serde::Deserialize;
use std::sync::Arc;

use crate::domain::inventory::{
  ImageService, InventoryError, InventoryService, ProductId, UploadImageOptions,
};

#[derive(Debug, Deserialize)]
pub struct DeleteProductCommand {
  pub id: String,
}

pub struct DeleteProductUseCase {
  inventory_service: Arc<InventoryService>,
  image_service: Arc<dyn ImageService>,
}

impl DeleteProductUseCase {
  pub fn new(
    inventory_service: Arc<InventoryService>,
    image_service: Arc<dyn ImageService>,
  ) -> Self {
    Self {
      inventory_service,
      image_service,
    }
  }

  /// Removes the product and its picture. Stock movements and past sales are kept.
  pub async fn execute(&self, command: DeleteProductCommand) -> Result<(), InventoryError> {
    let id = ProductId::new(&command.id)?;
    let product = self.inventory_service.get_product(&id).await?;

    if product.image_url().is_some() {
      let public_id = UploadImageOptions::for_product(&id)
        .qualified_public_id()
        .unwrap_or_else(|| id.to_string());
      self.image_service.delete(&public_id).await?;
    }

    self.inventory_service.delete_product(&id).await
  }
}

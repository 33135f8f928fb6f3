use async_trait::async_trait;

use crate::domain::inventory::{
  ImageFile, ImageService, ImageServiceError, UploadImageOptions, UploadedImage,
};

/// No-operation image adapter
/// Used when no image CDN is configured
pub struct NoOpImageService;

impl NoOpImageService {
  pub fn new() -> Self {
    Self
  }
}

impl Default for NoOpImageService {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ImageService for NoOpImageService {
  async fn upload(
    &self,
    file: ImageFile,
    _options: &UploadImageOptions,
  ) -> Result<UploadedImage, ImageServiceError> {
    tracing::debug!(
      "NoOpImageService: Rejecting upload of {} (no image service configured)",
      file.file_name
    );
    Err(ImageServiceError::NotConfigured)
  }

  async fn delete(&self, public_id: &str) -> Result<(), ImageServiceError> {
    tracing::debug!(
      "NoOpImageService: Skipping delete of {} (no image service configured)",
      public_id
    );
    Ok(())
  }

  fn get_url(&self, public_id: &str, _options: &UploadImageOptions) -> String {
    public_id.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_noop_never_stores_images() {
    let service = NoOpImageService::new();
    let file = ImageFile {
      file_name: "photo.png".to_string(),
      content_type: "image/png".to_string(),
      bytes: vec![1, 2, 3],
    };

    let upload = service.upload(file, &UploadImageOptions::default()).await;
    assert!(matches!(upload, Err(ImageServiceError::NotConfigured)));
    assert!(service.delete("products/product-p1").await.is_ok());
    assert_eq!(
      service.get_url("products/product-p1", &UploadImageOptions::default()),
      "products/product-p1"
    );
  }
}

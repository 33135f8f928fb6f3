use async_trait::async_trait;

use super::entities::{Product, StockMovement};
use super::errors::{ImageServiceError, RepositoryError};
use super::value_objects::ProductId;

/// Largest image accepted by [`ImageFile::validate`].
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[async_trait]
pub trait ProductRepository: Send + Sync {
  /// Inserts a new product or updates the catalog fields of an existing one.
  /// Stock of an existing row is left alone; use [`ProductRepository::update_stock`].
  async fn save(&self, product: &Product) -> Result<(), RepositoryError>;

  /// Writes `product.stock()` only if the stored stock still equals
  /// `expected_stock`. Returns `false` when another writer got there first.
  async fn update_stock(
    &self,
    product: &Product,
    expected_stock: u32,
  ) -> Result<bool, RepositoryError>;

  async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

  /// Newest first.
  async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

  async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError>;

  /// Products with `0 < stock < threshold`, lowest stock first.
  async fn find_low_stock(&self, threshold: u32) -> Result<Vec<Product>, RepositoryError>;

  async fn find_out_of_stock(&self) -> Result<Vec<Product>, RepositoryError>;

  /// Case-insensitive match on name or description.
  async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError>;

  async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError>;

  async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError>;

  async fn exists(&self, id: &ProductId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait StockMovementRepository: Send + Sync {
  async fn save(&self, movement: &StockMovement) -> Result<(), RepositoryError>;

  /// No ordering guarantee.
  async fn find_by_product_id(
    &self,
    product_id: &ProductId,
  ) -> Result<Vec<StockMovement>, RepositoryError>;
}

/// Raw upload as received from a client.
#[derive(Debug, Clone)]
pub struct ImageFile {
  pub file_name: String,
  pub content_type: String,
  pub bytes: Vec<u8>,
}

impl ImageFile {
  pub fn validate(&self) -> Result<(), ImageServiceError> {
    if !self.content_type.starts_with("image/") {
      return Err(ImageServiceError::InvalidFile(format!(
        "Expected an image, got {}",
        self.content_type
      )));
    }
    if self.bytes.is_empty() {
      return Err(ImageServiceError::InvalidFile("File is empty".to_string()));
    }
    if self.bytes.len() > MAX_IMAGE_BYTES {
      return Err(ImageServiceError::InvalidFile(format!(
        "File exceeds {} MB",
        MAX_IMAGE_BYTES / (1024 * 1024)
      )));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageQuality {
  #[default]
  Auto,
  Level(u8),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadImageOptions {
  pub folder: Option<String>,
  pub public_id: Option<String>,
  pub max_width: Option<u32>,
  pub max_height: Option<u32>,
  pub quality: ImageQuality,
}

impl UploadImageOptions {
  /// Options used for catalog pictures.
  pub fn for_product(product_id: &ProductId) -> Self {
    Self {
      folder: Some("products".to_string()),
      public_id: Some(format!("product-{}", product_id)),
      max_width: Some(1200),
      max_height: Some(1200),
      quality: ImageQuality::Auto,
    }
  }

  /// Full public id as the CDN stores it (`folder/public_id`).
  pub fn qualified_public_id(&self) -> Option<String> {
    let public_id = self.public_id.as_deref()?;
    Some(match self.folder.as_deref() {
      Some(folder) => format!("{}/{}", folder, public_id),
      None => public_id.to_string(),
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
  pub url: String,
  pub secure_url: String,
  pub public_id: String,
  pub width: u32,
  pub height: u32,
  pub format: String,
  pub bytes: u64,
}

#[async_trait]
pub trait ImageService: Send + Sync {
  async fn upload(
    &self,
    file: ImageFile,
    options: &UploadImageOptions,
  ) -> Result<UploadedImage, ImageServiceError>;

  async fn delete(&self, public_id: &str) -> Result<(), ImageServiceError>;

  fn get_url(&self, public_id: &str, options: &UploadImageOptions) -> String;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn file(content_type: &str, size: usize) -> ImageFile {
    ImageFile {
      file_name: "photo.png".to_string(),
      content_type: content_type.to_string(),
      bytes: vec![0u8; size],
    }
  }

  #[test]
  fn test_image_file_validation() {
    assert!(file("image/png", 128).validate().is_ok());
    assert!(file("application/pdf", 128).validate().is_err());
    assert!(file("image/png", 0).validate().is_err());
    assert!(file("image/jpeg", MAX_IMAGE_BYTES + 1).validate().is_err());
  }

  #[test]
  fn test_product_upload_options() {
    let options = UploadImageOptions::for_product(&ProductId::new("p1").unwrap());
    assert_eq!(options.public_id.as_deref(), Some("product-p1"));
    assert_eq!(
      options.qualified_public_id().as_deref(),
      Some("products/product-p1")
    );
    assert_eq!(options.max_width, Some(1200));
  }
}

use std::sync::Arc;

use super::{CloudinaryImageService, NoOpImageService};
use crate::domain::inventory::ImageService;
use crate::infrastructure::config::CloudinaryConfig;

/// Picks the image adapter for the loaded configuration.
///
/// Falls back to [`NoOpImageService`] when Cloudinary is not configured or the
/// client cannot be built.
pub fn build_image_service(config: Option<&CloudinaryConfig>) -> Arc<dyn ImageService> {
  let Some(config) = config else {
    tracing::debug!("No [cloudinary] section, using NoOpImageService");
    return Arc::new(NoOpImageService::new());
  };

  if config.cloud_name.trim().is_empty() || config.upload_preset.trim().is_empty() {
    tracing::warn!(
      "Cloudinary selected but cloud_name or upload_preset is empty. Using NoOpImageService."
    );
    return Arc::new(NoOpImageService::new());
  }

  match CloudinaryImageService::new(config) {
    Ok(service) => {
      if config.api_key.is_none() || config.api_secret.is_none() {
        tracing::warn!("Cloudinary API key/secret missing: product images will not be deleted");
      }
      tracing::info!("Using Cloudinary image service (cloud: {})", config.cloud_name);
      Arc::new(service)
    }
    Err(e) => {
      tracing::warn!(
        "Failed to create Cloudinary client: {}. Using NoOpImageService.",
        e
      );
      Arc::new(NoOpImageService::new())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::inventory::UploadImageOptions;

  #[test]
  fn test_missing_config_uses_noop() {
    let service = build_image_service(None);
    assert_eq!(
      service.get_url("products/product-p1", &UploadImageOptions::default()),
      "products/product-p1"
    );
  }

  #[test]
  fn test_cloudinary_config_builds_cloudinary() {
    let config = CloudinaryConfig {
      cloud_name: "demo".to_string(),
      upload_preset: "unsigned".to_string(),
      api_key: None,
      api_secret: None,
      timeout_seconds: 5,
      api_base_url: "https://api.cloudinary.com".to_string(),
      delivery_base_url: "https://res.cloudinary.com".to_string(),
    };
    let service = build_image_service(Some(&config));
    assert!(
      service
        .get_url("x", &UploadImageOptions::default())
        .starts_with("https://res.cloudinary.com/demo/")
    );
  }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::domain::inventory::{
  ImageFile, ImageQuality, ImageService, ImageServiceError, UploadImageOptions, UploadedImage,
};
use crate::infrastructure::config::CloudinaryConfig;

/// Cloudinary adapter talking to the REST API with `reqwest`.
///
/// Uploads are unsigned and go through the configured upload preset. Deleting
/// needs the API key and secret, since `destroy` only accepts signed requests;
/// without them deletes are skipped and the image stays on the CDN.
pub struct CloudinaryImageService {
  client: Client,
  cloud_name: String,
  upload_preset: String,
  credentials: Option<(String, String)>,
  api_base_url: String,
  delivery_base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
  url: String,
  secure_url: String,
  public_id: String,
  #[serde(default)]
  width: u32,
  #[serde(default)]
  height: u32,
  #[serde(default)]
  format: String,
  #[serde(default)]
  bytes: u64,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
  result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
  message: String,
}

impl CloudinaryImageService {
  pub fn new(config: &CloudinaryConfig) -> Result<Self, ImageServiceError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_seconds))
      .build()
      .map_err(|e| ImageServiceError::UploadFailed(format!("Failed to build HTTP client: {}", e)))?;

    let credentials = match (&config.api_key, &config.api_secret) {
      (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
        Some((key.clone(), secret.clone()))
      }
      _ => None,
    };

    Ok(Self {
      client,
      cloud_name: config.cloud_name.clone(),
      upload_preset: config.upload_preset.clone(),
      credentials,
      api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
      delivery_base_url: config.delivery_base_url.trim_end_matches('/').to_string(),
    })
  }

  fn endpoint(&self, action: &str) -> String {
    format!(
      "{}/v1_1/{}/image/{}",
      self.api_base_url, self.cloud_name, action
    )
  }
}

/// SHA-256 signature of `params` as Cloudinary expects it: parameters sorted
/// by name, joined as `k=v` with `&`, followed by the API secret.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
  let mut sorted: Vec<&(&str, String)> = params.iter().collect();
  sorted.sort_by(|a, b| a.0.cmp(b.0));
  let to_sign = sorted
    .iter()
    .map(|(key, value)| format!("{}={}", key, value))
    .collect::<Vec<_>>()
    .join("&");

  let mut hasher = Sha256::new();
  hasher.update(to_sign.as_bytes());
  hasher.update(api_secret.as_bytes());
  hex::encode(hasher.finalize())
}

fn transformation(options: &UploadImageOptions) -> String {
  let mut parts = Vec::new();
  if let Some(width) = options.max_width {
    parts.push(format!("w_{}", width));
  }
  if let Some(height) = options.max_height {
    parts.push(format!("h_{}", height));
  }
  if options.max_width.is_some() || options.max_height.is_some() {
    parts.push("c_limit".to_string());
  }
  parts.push(match options.quality {
    ImageQuality::Auto => "q_auto".to_string(),
    ImageQuality::Level(level) => format!("q_{}", level),
  });
  parts.push("f_auto".to_string());
  parts.join(",")
}

async fn error_message(response: reqwest::Response) -> String {
  let status = response.status();
  let body = response.text().await.unwrap_or_default();
  match serde_json::from_str::<ErrorBody>(&body) {
    Ok(parsed) => format!("{} ({})", parsed.error.message, status),
    Err(_) => format!("status {}: {}", status, body),
  }
}

#[async_trait]
impl ImageService for CloudinaryImageService {
  async fn upload(
    &self,
    file: ImageFile,
    options: &UploadImageOptions,
  ) -> Result<UploadedImage, ImageServiceError> {
    file.validate()?;

    let file_part = reqwest::multipart::Part::bytes(file.bytes)
      .file_name(file.file_name.clone())
      .mime_str(&file.content_type)
      .map_err(|e| ImageServiceError::InvalidFile(format!("MIME type error: {}", e)))?;

    let mut form = reqwest::multipart::Form::new()
      .part("file", file_part)
      .text("upload_preset", self.upload_preset.clone());
    if let Some(folder) = &options.folder {
      form = form.text("folder", folder.clone());
    }
    if let Some(public_id) = &options.public_id {
      form = form.text("public_id", public_id.clone());
    }

    let response = self
      .client
      .post(self.endpoint("upload"))
      .multipart(form)
      .send()
      .await
      .map_err(|e| ImageServiceError::UploadFailed(format!("Upload request failed: {}", e)))?;

    if !response.status().is_success() {
      return Err(ImageServiceError::UploadFailed(error_message(response).await));
    }

    let uploaded: UploadResponse = response.json().await.map_err(|e| {
      ImageServiceError::UploadFailed(format!("Failed to parse upload response: {}", e))
    })?;

    tracing::info!(
      public_id = %uploaded.public_id,
      bytes = uploaded.bytes,
      "Uploaded image to Cloudinary"
    );

    Ok(UploadedImage {
      url: uploaded.url,
      secure_url: uploaded.secure_url,
      public_id: uploaded.public_id,
      width: uploaded.width,
      height: uploaded.height,
      format: uploaded.format,
      bytes: uploaded.bytes,
    })
  }

  async fn delete(&self, public_id: &str) -> Result<(), ImageServiceError> {
    let Some((api_key, api_secret)) = self.credentials.as_ref() else {
      tracing::warn!(
        public_id = %public_id,
        "Cloudinary API key/secret not configured, leaving image in place"
      );
      return Ok(());
    };

    let mut params = vec![
      ("public_id", public_id.to_string()),
      ("timestamp", chrono::Utc::now().timestamp().to_string()),
      ("invalidate", "true".to_string()),
    ];
    let signature = sign(&params, api_secret);
    params.push(("api_key", api_key.clone()));
    params.push(("signature", signature));
    params.push(("signature_algorithm", "sha256".to_string()));

    let response = self
      .client
      .post(self.endpoint("destroy"))
      .form(&params)
      .send()
      .await
      .map_err(|e| ImageServiceError::DeleteFailed(format!("Destroy request failed: {}", e)))?;

    if !response.status().is_success() {
      return Err(ImageServiceError::DeleteFailed(error_message(response).await));
    }

    let body: DestroyResponse = response.json().await.map_err(|e| {
      ImageServiceError::DeleteFailed(format!("Failed to parse destroy response: {}", e))
    })?;

    match body.result.as_str() {
      "ok" => {
        tracing::info!(public_id = %public_id, "Deleted image from Cloudinary");
        Ok(())
      }
      "not found" => {
        tracing::debug!(public_id = %public_id, "Image already absent from Cloudinary");
        Ok(())
      }
      other => Err(ImageServiceError::DeleteFailed(format!(
        "Unexpected destroy result: {}",
        other
      ))),
    }
  }

  fn get_url(&self, public_id: &str, options: &UploadImageOptions) -> String {
    format!(
      "{}/{}/image/upload/{}/{}",
      self.delivery_base_url,
      self.cloud_name,
      transformation(options),
      public_id
    )
  }
}

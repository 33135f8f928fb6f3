use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use std::sync::Arc;
use validator::Validate;

use crate::{
  adapters::http::{
    dtos::{CreateProductRequest, ListProductsQuery, SearchQuery, UpdateProductRequest},
    errors::ApiError,
    routes::ApiSettings,
  },
  application::inventory::*,
  domain::inventory::{ImageFile, MAX_IMAGE_BYTES},
};

/// Multipart field carrying the picture
const IMAGE_FIELD: &str = "image";

/// List products
/// GET /api/v1/products
pub async fn list_products_handler(
  query: web::Query<ListProductsQuery>,
  use_case: web::Data<Arc<ListProductsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute(query.into_inner().into()).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Create product
/// POST /api/v1/products
pub async fn create_product_handler(
  request: web::Json<CreateProductRequest>,
  use_case: web::Data<Arc<CreateProductUseCase>>,
  settings: web::Data<ApiSettings>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = request.into_inner().into_command(&settings.default_currency);
  let product = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(product))
}

/// Search products
/// GET /api/v1/products/search?q=mug
pub async fn search_products_handler(
  query: web::Query<SearchQuery>,
  use_case: web::Data<Arc<SearchProductsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute(query.into_inner().into()).await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Products running low
/// GET /api/v1/products/low-stock
pub async fn low_stock_products_handler(
  use_case: web::Data<Arc<GetLowStockProductsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}

/// Get product
/// GET /api/v1/products/{id}
pub async fn get_product_handler(
  id: web::Path<String>,
  use_case: web::Data<Arc<GetProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let id = id.into_inner();
  let product = use_case
    .execute(GetProductCommand { id: id.clone() })
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;

  Ok(HttpResponse::Ok().json(product))
}

/// Edit product
/// PATCH /api/v1/products/{id}
pub async fn update_product_handler(
  id: web::Path<String>,
  request: web::Json<UpdateProductRequest>,
  use_case: web::Data<Arc<UpdateProductUseCase>>,
  settings: web::Data<ApiSettings>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = request
    .into_inner()
    .into_command(id.into_inner(), &settings.default_currency);
  let product = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(product))
}

/// Delete product
/// DELETE /api/v1/products/{id}
pub async fn delete_product_handler(
  id: web::Path<String>,
  use_case: web::Data<Arc<DeleteProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteProductCommand { id: id.into_inner() })
    .await?;

  Ok(HttpResponse::NoContent().finish())
}

/// Replace product picture
/// PUT /api/v1/products/{id}/image
pub async fn upload_product_image_handler(
  id: web::Path<String>,
  payload: Multipart,
  use_case: web::Data<Arc<UpdateProductUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let file = read_image_field(payload).await?;

  let command = UpdateProductCommand {
    id: id.into_inner(),
    image: Some(file),
    ..UpdateProductCommand::default()
  };
  let product = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(product))
}

/// Reads the `image` field, refusing bodies over [`MAX_IMAGE_BYTES`] early.
async fn read_image_field(mut payload: Multipart) -> Result<ImageFile, ApiError> {
  while let Some(field) = payload.next().await {
    let mut field =
      field.map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?;

    if field.name() != Some(IMAGE_FIELD) {
      // drain fields we don't use
      while let Some(chunk) = field.next().await {
        chunk.map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?;
      }
      continue;
    }

    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .unwrap_or("upload")
      .to_string();
    let content_type = field
      .content_type()
      .map(|mime| mime.essence_str().to_string())
      .unwrap_or_else(|| "application/octet-stream".to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
      let chunk =
        chunk.map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?;
      if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::Validation(format!(
          "Image exceeds {} MB",
          MAX_IMAGE_BYTES / (1024 * 1024)
        )));
      }
      bytes.extend_from_slice(&chunk);
    }

    return Ok(ImageFile {
      file_name,
      content_type,
      bytes,
    });
  }

  Err(ApiError::Validation(format!(
    "Multipart field '{}' is required",
    IMAGE_FIELD
  )))
}

#[cfg(test)]
mod tests {
  use crate::adapters::http::handlers::test_app::{seed_product, test_app};
  use actix_web::{http::StatusCode, test};
  use serde_json::{Value, json};

  #[actix_web::test]
  async fn test_create_and_get_product() {
    let (app, _) = test_app!();

    let req = test::TestRequest::post()
      .uri("/api/v1/products")
      .set_json(json!({
        "id": "mug-1",
        "name": "Blue Mug",
        "price": {"amount": "120.50"},
        "stock": 4,
        "category": "kitchen"
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], "mug-1");
    assert_eq!(body["price"]["currency"], "MXN");
    assert_eq!(body["has_low_stock"], true);

    let req = test::TestRequest::get()
      .uri("/api/v1/products/mug-1")
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Blue Mug");
    assert_eq!(body["stock"], 4);
  }

  #[actix_web::test]
  async fn test_create_rejects_invalid_body() {
    let (app, _) = test_app!();

    let req = test::TestRequest::post()
      .uri("/api/v1/products")
      .set_json(json!({
        "id": "mug-1",
        "name": "ab",
        "price": {"amount": "10"},
        "stock": 1
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");

    let req = test::TestRequest::post()
      .uri("/api/v1/products")
      .set_json(json!({
        "id": "mug-1",
        "name": "Blue Mug",
        "price": {"amount": "0"},
        "stock": 1
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn test_create_rejects_out_of_range_price_and_stock() {
    let (app, _) = test_app!();

    for (price, stock) in [
      ("100000000000000000000", 1_000_000_000_i64),
      ("10000000000", 1),
      ("19.999", 1),
      ("10", 3_000_000_000),
    ] {
      let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(json!({
          "id": "mug-1",
          "name": "Blue Mug",
          "price": {"amount": price},
          "stock": stock
        }))
        .to_request();
      let resp = test::call_service(&app, req).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} x {}", price, stock);
    }

    let req = test::TestRequest::get().uri("/api/v1/products").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["products"].as_array().map(Vec::len), Some(0));

    let req = test::TestRequest::post()
      .uri("/api/v1/products")
      .set_json(json!({
        "id": "safe-1",
        "name": "Gold Bar",
        "price": {"amount": "9999999999.99"},
        "stock": 2_147_483_647_i64
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["inventory_value"]["amount"], "21474836469978525163.53");
  }

  #[actix_web::test]
  async fn test_duplicate_product_conflicts() {
    let (app, repos) = test_app!();
    seed_product(&repos, "mug-1", 5).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/products")
      .set_json(json!({
        "id": "mug-1",
        "name": "Blue Mug",
        "price": {"amount": "10", "currency": "MXN"},
        "stock": 1
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "product_already_exists");
  }

  #[actix_web::test]
  async fn test_unknown_product_is_404() {
    let (app, _) = test_app!();

    for req in [
      test::TestRequest::get().uri("/api/v1/products/nope"),
      test::TestRequest::delete().uri("/api/v1/products/nope"),
    ] {
      let resp = test::call_service(&app, req.to_request()).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
  }

  #[actix_web::test]
  async fn test_update_and_delete_product() {
    let (app, repos) = test_app!();
    seed_product(&repos, "mug-1", 5).await;

    let req = test::TestRequest::patch()
      .uri("/api/v1/products/mug-1")
      .set_json(json!({"name": "Green Mug", "category": ""}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Green Mug");
    assert_eq!(body["category"], Value::Null);
    assert_eq!(body["stock"], 5);

    let req = test::TestRequest::delete()
      .uri("/api/v1/products/mug-1")
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  }

  #[actix_web::test]
  async fn test_search_and_low_stock_routes() {
    let (app, repos) = test_app!();
    seed_product(&repos, "mug-1", 3).await;
    seed_product(&repos, "plate-1", 40).await;

    let req = test::TestRequest::get()
      .uri("/api/v1/products/search?q=plate")
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
      .uri("/api/v1/products/low-stock")
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["threshold"], 10);
    assert_eq!(body["products"][0]["id"], "mug-1");
  }

  #[actix_web::test]
  async fn test_image_upload_without_cdn_is_unavailable() {
    let (app, repos) = test_app!();
    seed_product(&repos, "mug-1", 3).await;

    let boundary = "XBOUNDARY";
    let body = format!(
      "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"mug.png\"\r\n\
       Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
      b = boundary
    );
    let req = test::TestRequest::put()
      .uri("/api/v1/products/mug-1/image")
      .insert_header((
        "content-type",
        format!("multipart/form-data; boundary={}", boundary),
      ))
      .set_payload(body)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
  }

  #[actix_web::test]
  async fn test_image_upload_requires_image_field() {
    let (app, repos) = test_app!();
    seed_product(&repos, "mug-1", 3).await;

    let boundary = "XBOUNDARY";
    let body = format!(
      "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
      b = boundary
    );
    let req = test::TestRequest::put()
      .uri("/api/v1/products/mug-1/image")
      .insert_header((
        "content-type",
        format!("multipart/form-data; boundary={}", boundary),
      ))
      .set_payload(body)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}

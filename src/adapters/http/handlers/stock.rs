use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::{
  adapters::http::{dtos::StockChangeRequest, errors::ApiError},
  application::inventory::{GetStockMovementsCommand, GetStockMovementsUseCase, UpdateStockUseCase},
};

/// Record a stock movement
/// POST /api/v1/products/{id}/stock
pub async fn update_stock_handler(
  id: web::Path<String>,
  request: web::Json<StockChangeRequest>,
  use_case: web::Data<Arc<UpdateStockUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = request.into_inner().into_command(id.into_inner());
  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(response))
}

/// Stock history
/// GET /api/v1/products/{id}/movements
pub async fn stock_movements_handler(
  id: web::Path<String>,
  use_case: web::Data<Arc<GetStockMovementsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case
    .execute(GetStockMovementsCommand {
      product_id: id.into_inner(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
  use crate::adapters::http::handlers::test_app::{
    conflicting_repositories, seed_product, stock_of, test_app,
  };
  use actix_web::{http::StatusCode, test};
  use serde_json::{Value, json};

  #[actix_web::test]
  async fn test_stock_movements_round_trip() {
    let (app, repos) = test_app!();
    seed_product(&repos, "mug-1", 5).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/products/mug-1/stock")
      .set_json(json!({"type": "IN", "quantity": 10, "reason": "Delivery"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["product"]["stock"], 15);
    assert_eq!(body["movement"]["type"], "IN");
    std::thread::sleep(std::time::Duration::from_millis(2));

    let req = test::TestRequest::post()
      .uri("/api/v1/products/mug-1/stock")
      .set_json(json!({"type": "adjustment", "quantity": -3}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stock_of(&repos, "mug-1").await, 12);

    let req = test::TestRequest::get()
      .uri("/api/v1/products/mug-1/movements")
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let movements = body["movements"].as_array().unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["type"], "ADJUSTMENT");
    assert_eq!(movements[0]["quantity"], 3);
  }

  #[actix_web::test]
  async fn test_stock_errors() {
    let (app, repos) = test_app!();
    seed_product(&repos, "mug-1", 2).await;

    let cases = [
      (json!({"type": "OUT", "quantity": 5}), StatusCode::CONFLICT),
      (json!({"type": "OUT", "quantity": 0}), StatusCode::BAD_REQUEST),
      (json!({"type": "LOST", "quantity": 1}), StatusCode::BAD_REQUEST),
    ];
    for (payload, status) in cases {
      let req = test::TestRequest::post()
        .uri("/api/v1/products/mug-1/stock")
        .set_json(payload)
        .to_request();
      let resp = test::call_service(&app, req).await;
      assert_eq!(resp.status(), status);
    }
    assert_eq!(stock_of(&repos, "mug-1").await, 2);

    let req = test::TestRequest::post()
      .uri("/api/v1/products/ghost/stock")
      .set_json(json!({"type": "IN", "quantity": 1}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_lost_stock_race_is_a_conflict() {
    let (app, repos) = test_app!(conflicting_repositories());
    seed_product(&repos, "mug-1", 5).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/products/mug-1/stock")
      .set_json(json!({"type": "OUT", "quantity": 2}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "concurrent_update");
    assert_eq!(stock_of(&repos, "mug-1").await, 5);

    let req = test::TestRequest::get()
      .uri("/api/v1/products/mug-1/movements")
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["movements"].as_array().unwrap().is_empty());
  }
}

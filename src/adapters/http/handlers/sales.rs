use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
  adapters::http::{dtos::CreateSaleRequest, errors::ApiError},
  application::sales::{CreateSaleUseCase, GetSaleReceiptCommand, GetSaleReceiptUseCase},
};

/// Record a sale
/// POST /api/v1/sales
pub async fn create_sale_handler(
  request: web::Json<CreateSaleRequest>,
  use_case: web::Data<Arc<CreateSaleUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let response = use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Created().json(response))
}

/// Sale receipt
/// GET /api/v1/sales/{id}/receipt
pub async fn sale_receipt_handler(
  sale_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetSaleReceiptUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case
    .execute(GetSaleReceiptCommand {
      sale_id: sale_id.into_inner(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

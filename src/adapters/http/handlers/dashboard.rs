use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::{adapters::http::errors::ApiError, application::reporting::GetInventoryStatsUseCase};

/// Inventory statistics
/// GET /api/v1/dashboard
pub async fn dashboard_handler(
  use_case: web::Data<Arc<GetInventoryStatsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let stats = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(stats))
}

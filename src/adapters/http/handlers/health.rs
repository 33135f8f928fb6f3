use actix_web::HttpResponse;
use serde_json::json;

/// Liveness check
/// GET /health
pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::ErrorResponse;
pub use errors::ApiError;
pub use handlers::health::health_check;
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{ApiRouteDependencies, ApiSettings, configure_api_routes};

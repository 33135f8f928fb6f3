use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::application::test_support::ConflictingProductRepository;
use crate::domain::inventory::{Money, NewProduct, Product, ProductId};
use crate::infrastructure::persistence::Repositories;

/// Builds the full API over in-memory storage and a no-op image service.
/// Expands to `(service, Repositories)`; pass a `Repositories` to swap storage.
macro_rules! test_app {
  () => {
    test_app!($crate::infrastructure::persistence::Repositories::in_memory())
  };
  ($repos:expr) => {{
    let repos = $repos;
    let deps = $crate::adapters::http::routes::ApiRouteDependencies::build(
      &repos,
      std::sync::Arc::new($crate::infrastructure::media::NoOpImageService::new()),
      $crate::adapters::http::routes::ApiSettings::default(),
    );
    let app = actix_web::test::init_service(
      actix_web::App::new()
        .wrap($crate::adapters::http::middleware::RequestIdMiddleware::new())
        .route(
          "/health",
          actix_web::web::get().to($crate::adapters::http::handlers::health::health_check),
        )
        .service(
          actix_web::web::scope("/api/v1")
            .configure(move |cfg| $crate::adapters::http::routes::configure_api_routes(cfg, deps)),
        ),
    )
    .await;
    (app, repos)
  }};
}

pub(crate) use test_app;

/// Stores "Product {id}" priced at MXN 10.
pub(crate) async fn seed_product(repos: &Repositories, id: &str, stock: i64) -> Product {
  let product = Product::create(NewProduct {
    id: id.to_string(),
    name: format!("Product {}", id),
    price: Money::new(dec!(10), "MXN").unwrap(),
    stock,
    description: None,
    category: Some("kitchen".to_string()),
    image_url: None,
  })
  .unwrap();
  repos.products.save(&product).await.unwrap();
  product
}

pub(crate) async fn stock_of(repos: &Repositories, id: &str) -> u32 {
  repos
    .products
    .find_by_id(&ProductId::new(id).unwrap())
    .await
    .unwrap()
    .unwrap()
    .stock()
}

/// In-memory repositories whose stock writes always lose the compare-and-swap.
pub(crate) fn conflicting_repositories() -> Repositories {
  let mut repos = Repositories::in_memory();
  repos.products = Arc::new(ConflictingProductRepository::new(repos.products.clone()));
  repos
}

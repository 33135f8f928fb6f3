use actix_web::web;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::application::inventory::{
  CreateProductUseCase, DeleteProductUseCase, GetLowStockProductsUseCase, GetProductUseCase,
  GetStockMovementsUseCase, ListProductsUseCase, SearchProductsUseCase, UpdateProductUseCase,
  UpdateStockUseCase,
};
use crate::application::reporting::GetInventoryStatsUseCase;
use crate::application::sales::{CreateSaleUseCase, GetSaleReceiptUseCase};
use crate::domain::inventory::{Currency, ImageService, InventoryService, LOW_STOCK_THRESHOLD};
use crate::domain::reporting::DashboardQuery;
use crate::domain::sales::SaleService;
use crate::infrastructure::config::Config;
use crate::infrastructure::persistence::Repositories;

use super::errors::ApiError;
use super::handlers::{dashboard, products, sales, stock};

/// Request limits for JSON bodies
const JSON_LIMIT_BYTES: usize = 256 * 1024;

/// Tunables the HTTP layer needs from the loaded configuration.
#[derive(Debug, Clone)]
pub struct ApiSettings {
  pub default_currency: String,
  pub low_stock_threshold: u32,
  pub tax_rate: Decimal,
  pub dashboard: DashboardQuery,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      default_currency: Currency::DEFAULT_CODE.to_string(),
      low_stock_threshold: LOW_STOCK_THRESHOLD,
      tax_rate: Decimal::new(16, 2),
      dashboard: DashboardQuery::default(),
    }
  }
}

impl From<&Config> for ApiSettings {
  fn from(config: &Config) -> Self {
    Self {
      default_currency: config.inventory.default_currency.clone(),
      low_stock_threshold: config.inventory.low_stock_threshold,
      tax_rate: config.sales.tax_rate,
      dashboard: config.dashboard.query(config.inventory.low_stock_threshold),
    }
  }
}

/// Use cases served by the JSON API, wired once and shared by every worker.
#[derive(Clone)]
pub struct ApiRouteDependencies {
  pub settings: ApiSettings,
  pub create_product: Arc<CreateProductUseCase>,
  pub update_product: Arc<UpdateProductUseCase>,
  pub delete_product: Arc<DeleteProductUseCase>,
  pub get_product: Arc<GetProductUseCase>,
  pub list_products: Arc<ListProductsUseCase>,
  pub search_products: Arc<SearchProductsUseCase>,
  pub low_stock_products: Arc<GetLowStockProductsUseCase>,
  pub update_stock: Arc<UpdateStockUseCase>,
  pub stock_movements: Arc<GetStockMovementsUseCase>,
  pub create_sale: Arc<CreateSaleUseCase>,
  pub sale_receipt: Arc<GetSaleReceiptUseCase>,
  pub inventory_stats: Arc<GetInventoryStatsUseCase>,
}

impl ApiRouteDependencies {
  pub fn build(
    repositories: &Repositories,
    image_service: Arc<dyn ImageService>,
    settings: ApiSettings,
  ) -> Self {
    let inventory = Arc::new(InventoryService::new(
      repositories.products.clone(),
      repositories.movements.clone(),
    ));
    let sale_service = Arc::new(SaleService::new(
      repositories.sales.clone(),
      inventory.clone(),
    ));

    Self {
      create_product: Arc::new(CreateProductUseCase::new(
        inventory.clone(),
        image_service.clone(),
      )),
      update_product: Arc::new(UpdateProductUseCase::new(
        inventory.clone(),
        image_service.clone(),
      )),
      delete_product: Arc::new(DeleteProductUseCase::new(inventory.clone(), image_service)),
      get_product: Arc::new(GetProductUseCase::new(inventory.clone())),
      list_products: Arc::new(ListProductsUseCase::new(inventory.clone())),
      search_products: Arc::new(SearchProductsUseCase::new(inventory.clone())),
      low_stock_products: Arc::new(GetLowStockProductsUseCase::new(
        inventory.clone(),
        settings.low_stock_threshold,
      )),
      update_stock: Arc::new(UpdateStockUseCase::new(inventory.clone())),
      stock_movements: Arc::new(GetStockMovementsUseCase::new(inventory)),
      create_sale: Arc::new(CreateSaleUseCase::new(sale_service.clone())),
      sale_receipt: Arc::new(GetSaleReceiptUseCase::new(sale_service, settings.tax_rate)),
      inventory_stats: Arc::new(GetInventoryStatsUseCase::new(
        repositories.dashboard.clone(),
        settings.dashboard,
      )),
      settings,
    }
  }
}

/// Configure the JSON API
///
/// Mount under a scope such as `/api/v1`.
///
/// # Routes
///
/// - GET /products - List products (`?category=`, `?out_of_stock=true`)
/// - POST /products - Create a product
/// - GET /products/search - Search by name or description (`?q=`, `?name_only=true`)
/// - GET /products/low-stock - Products under the low stock threshold
/// - GET|PATCH|DELETE /products/{id} - Read, edit or delete a product
/// - PUT /products/{id}/image - Replace the product picture (multipart field `image`)
/// - POST /products/{id}/stock - Record a stock movement
/// - GET /products/{id}/movements - Stock history, newest first
/// - POST /sales - Record a sale
/// - GET /sales/{id}/receipt - Sale receipt with tax
/// - GET /dashboard - Inventory statistics
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, deps: ApiRouteDependencies) {
  cfg
    .app_data(
      web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
      web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
      web::PathConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(web::Data::new(deps.settings))
    .app_data(web::Data::new(deps.create_product))
    .app_data(web::Data::new(deps.update_product))
    .app_data(web::Data::new(deps.delete_product))
    .app_data(web::Data::new(deps.get_product))
    .app_data(web::Data::new(deps.list_products))
    .app_data(web::Data::new(deps.search_products))
    .app_data(web::Data::new(deps.low_stock_products))
    .app_data(web::Data::new(deps.update_stock))
    .app_data(web::Data::new(deps.stock_movements))
    .app_data(web::Data::new(deps.create_sale))
    .app_data(web::Data::new(deps.sale_receipt))
    .app_data(web::Data::new(deps.inventory_stats));

  cfg.service(
    web::scope("/products")
      .route("", web::get().to(products::list_products_handler))
      .route("", web::post().to(products::create_product_handler))
      // literal segments before `{id}`
      .route("/search", web::get().to(products::search_products_handler))
      .route("/low-stock", web::get().to(products::low_stock_products_handler))
      .route("/{id}", web::get().to(products::get_product_handler))
      .route("/{id}", web::patch().to(products::update_product_handler))
      .route("/{id}", web::delete().to(products::delete_product_handler))
      .route("/{id}/image", web::put().to(products::upload_product_image_handler))
      .route("/{id}/stock", web::post().to(stock::update_stock_handler))
      .route("/{id}/movements", web::get().to(stock::stock_movements_handler)),
  );

  cfg.service(
    web::scope("/sales")
      .route("", web::post().to(sales::create_sale_handler))
      .route("/{id}/receipt", web::get().to(sales::sale_receipt_handler)),
  );

  cfg.route("/dashboard", web::get().to(dashboard::dashboard_handler));
}

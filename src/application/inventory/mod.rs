pub mod create_product;
pub mod delete_product;
pub mod dtos;
pub mod get_low_stock_products;
pub mod get_product;
pub mod get_stock_movements;
pub mod list_products;
pub mod search_products;
pub mod update_product;
pub mod update_stock;

pub use create_product::{CreateProductCommand, CreateProductUseCase};
pub use delete_product::{DeleteProductCommand, DeleteProductUseCase};
pub use dtos::{MoneyDto, ProductResponse, StockMovementDto};
pub use get_low_stock_products::{GetLowStockProductsUseCase, LowStockProductsResponse};
pub use get_product::{GetProductCommand, GetProductUseCase};
pub use get_stock_movements::{
  GetStockMovementsCommand, GetStockMovementsUseCase, StockMovementsResponse,
};
pub use list_products::{ListProductsCommand, ListProductsResponse, ListProductsUseCase};
pub use search_products::{SearchProductsCommand, SearchProductsUseCase};
pub use update_product::{UpdateProductCommand, UpdateProductUseCase};
pub use update_stock::{UpdateStockCommand, UpdateStockResponse, UpdateStockUseCase};

pub mod get_inventory_stats;

pub use get_inventory_stats::{
  GetInventoryStatsUseCase, InventoryStatsResponse, LowStockProductDto, RecentSaleDto,
  TopSellingProductDto,
};

pub mod entities;
pub mod ports;

pub use entities::{DashboardQuery, DashboardStats, LowStockProduct, TopSellingProduct};
pub use ports::DashboardRepository;

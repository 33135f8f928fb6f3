pub mod inventory;
pub mod reporting;
pub mod sales;

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use entities::{Sale, SaleItem};
pub use errors::SaleError;
pub use ports::SaleRepository;
pub use services::{SaleLine, SaleService};

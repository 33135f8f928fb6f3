pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{
  LOW_STOCK_THRESHOLD, MAX_PRICE, MAX_STOCK, NewProduct, PRICE_SCALE, Product, StockMovement,
};
pub use errors::{ImageServiceError, InventoryError, RepositoryError};
pub use ports::{
  ImageFile, ImageQuality, ImageService, MAX_IMAGE_BYTES, ProductRepository,
  StockMovementRepository, UploadImageOptions, UploadedImage,
};
pub use services::{
  InventoryService, ProductChanges, ProductFilter, StockChange, StockChangeRequest,
};
pub use value_objects::{
  Currency, Money, ProductId, ProductName, StockMovementType, ValueObjectError,
};

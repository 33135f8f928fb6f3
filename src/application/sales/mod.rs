pub mod create_sale;
pub mod get_sale_receipt;

pub use create_sale::{CreateSaleCommand, CreateSaleItemDto, CreateSaleResponse, CreateSaleUseCase};
pub use get_sale_receipt::{
  GetSaleReceiptCommand, GetSaleReceiptUseCase, ReceiptLineDto, ReceiptResponse,
};

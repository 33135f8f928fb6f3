pub mod dashboard;
pub mod health;
pub mod products;
pub mod sales;
pub mod stock;

#[cfg(test)]
pub(crate) mod test_app;

//! Application layer
//!
//! Use cases that turn incoming commands into calls on the inventory and sales
//! services, and shape the results into response DTOs.

pub mod inventory;
pub mod reporting;
pub mod sales;

#[cfg(test)]
pub(crate) mod test_support;

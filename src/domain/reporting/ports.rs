use async_trait::async_trait;

use super::entities::{DashboardQuery, DashboardStats};
use crate::domain::inventory::errors::RepositoryError;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
  async fn get_stats(&self, query: &DashboardQuery) -> Result<DashboardStats, RepositoryError>;
}

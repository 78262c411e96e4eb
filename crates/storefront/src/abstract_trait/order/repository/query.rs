use crate::{domain::requests::order::FindAllOrders, model::order::OrderWithItems};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_by_id(&self, order_id: i32) -> Result<Option<OrderWithItems>, RepositoryError>;
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<OrderWithItems>, RepositoryError>;
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<OrderWithItems>, RepositoryError>;
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderWithItems>, i64), RepositoryError>;
}

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

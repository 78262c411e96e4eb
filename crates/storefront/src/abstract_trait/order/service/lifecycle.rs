use crate::domain::{requests::order::PayOrderRequest, response::order::OrderResponse};
use async_trait::async_trait;
use shared::{domain::ApiResponse, errors::ServiceError};
use std::sync::Arc;

#[async_trait]
pub trait OrderLifecycleServiceTrait {
    async fn mark_paid(
        &self,
        order_id: i32,
        req: &PayOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn mark_delivered(&self, order_id: i32)
    -> Result<ApiResponse<OrderResponse>, ServiceError>;
}

pub type DynOrderLifecycleService = Arc<dyn OrderLifecycleServiceTrait + Send + Sync>;

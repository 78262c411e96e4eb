use crate::domain::{requests::order::FindAllOrders, response::order::OrderResponse};
use async_trait::async_trait;
use shared::{
    domain::{ApiResponse, ApiResponsePagination, AuthUser},
    errors::ServiceError,
};
use std::sync::Arc;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_by_id(
        &self,
        order_id: i32,
        user: &AuthUser,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn find_by_user(
        &self,
        user_id: i64,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
}

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

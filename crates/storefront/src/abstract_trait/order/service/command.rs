use crate::domain::{
    requests::order::{PlaceOrderRequest, QuoteRequest},
    response::order::{OrderResponse, PriceQuoteResponse},
};
use async_trait::async_trait;
use shared::{domain::ApiResponse, errors::ServiceError};
use std::sync::Arc;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn quote(
        &self,
        req: &QuoteRequest,
    ) -> Result<ApiResponse<PriceQuoteResponse>, ServiceError>;
    async fn place_order(
        &self,
        user_id: i64,
        req: &PlaceOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

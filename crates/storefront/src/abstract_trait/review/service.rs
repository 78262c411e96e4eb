use crate::domain::{requests::review::CreateReviewRequest, response::review::ReviewResponse};
use async_trait::async_trait;
use shared::{domain::ApiResponse, errors::ServiceError};
use std::sync::Arc;

#[async_trait]
pub trait ReviewCommandServiceTrait {
    async fn create_review(
        &self,
        product_id: i32,
        user_id: i64,
        req: &CreateReviewRequest,
    ) -> Result<ApiResponse<ReviewResponse>, ServiceError>;
}

pub type DynReviewCommandService = Arc<dyn ReviewCommandServiceTrait + Send + Sync>;

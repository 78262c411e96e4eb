use crate::{
    domain::{requests::product::FindAllProducts, response::product::ProductResponse},
};
use async_trait::async_trait;
use shared::{
    domain::{ApiResponse, ApiResponsePagination},
    errors::ServiceError,
};
use std::sync::Arc;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError>;
    async fn find_by_id(&self, product_id: i32)
    -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn find_top_rated(&self) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
}

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

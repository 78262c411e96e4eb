use crate::domain::{
    requests::product::{CreateProductRequest, UpdateProductRequest},
    response::product::ProductResponse,
};
use async_trait::async_trait;
use shared::{domain::ApiResponse, errors::ServiceError};
use std::sync::Arc;

#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn trash_product(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
}

pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

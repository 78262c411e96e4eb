use crate::{
    domain::requests::product::{CreateProductRequest, UpdateProductRequest},
    model::product::Product,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(&self, req: &CreateProductRequest) -> Result<Product, RepositoryError>;
    async fn update_product(&self, req: &UpdateProductRequest) -> Result<Product, RepositoryError>;
    async fn trash_product(&self, product_id: i32) -> Result<Product, RepositoryError>;
}

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

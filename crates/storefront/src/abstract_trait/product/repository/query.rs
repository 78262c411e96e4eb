use crate::{domain::requests::product::FindAllProducts, model::product::Product};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<Product>, i64), RepositoryError>;
    async fn find_by_id(&self, product_id: i32) -> Result<Option<Product>, RepositoryError>;
    /// Point-in-time catalog snapshot for the given ids. Missing or trashed
    /// products are simply absent from the result; the caller decides whether
    /// that is fatal.
    async fn find_by_ids(&self, product_ids: &[i32]) -> Result<Vec<Product>, RepositoryError>;
    async fn find_top_rated(&self, limit: i64) -> Result<Vec<Product>, RepositoryError>;
}

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

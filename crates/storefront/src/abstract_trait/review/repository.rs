use crate::{domain::requests::review::CreateReviewRequest, model::review::Review};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

#[async_trait]
pub trait ReviewCommandRepositoryTrait {
    /// Insert the review and recompute the product's rating aggregate in the
    /// same transaction. A duplicate `(product_id, user_id)` pair fails with
    /// `AlreadyExists`.
    async fn create_review(
        &self,
        product_id: i32,
        user_id: i64,
        req: &CreateReviewRequest,
    ) -> Result<Review, RepositoryError>;
}

pub type DynReviewCommandRepository = Arc<dyn ReviewCommandRepositoryTrait + Send + Sync>;

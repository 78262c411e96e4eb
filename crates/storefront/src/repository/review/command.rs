use crate::{
    abstract_trait::review::repository::ReviewCommandRepositoryTrait,
    domain::requests::review::CreateReviewRequest, model::review::Review,
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct ReviewCommandRepository {
    db: ConnectionPool,
}

impl ReviewCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewCommandRepositoryTrait for ReviewCommandRepository {
    async fn create_review(
        &self,
        product_id: i32,
        user_id: i64,
        req: &CreateReviewRequest,
    ) -> Result<Review, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let review: Review = sqlx::query_as(
            r#"
        INSERT INTO reviews (product_id, user_id, user_name, rating, comment, created_at)
        VALUES ($1, $2, $3, $4, $5, current_timestamp)
        RETURNING review_id, product_id, user_id, user_name, rating, comment, created_at
        "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(&req.user_name)
        .bind(req.rating)
        .bind(&req.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to create review for product {}: {:?}",
                product_id, err
            );
            RepositoryError::from_pg(err)
        })?;

        // Recompute the aggregate inside the same transaction so the product
        // row never shows a rating that disagrees with its reviews.
        sqlx::query(
            r#"
        UPDATE products
        SET rating = COALESCE(
                (SELECT ROUND(AVG(rating)::numeric, 2) FROM reviews WHERE product_id = $1), 0),
            num_reviews = (SELECT COUNT(*) FROM reviews WHERE product_id = $1),
            updated_at  = current_timestamp
        WHERE product_id = $1
        "#,
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to recompute rating for product {}: {:?}",
                product_id, e
            );
            RepositoryError::from_pg(e)
        })?;

        tx.commit().await.map_err(RepositoryError::from_pg)?;

        info!(
            "✅ Created review ID {} for product {} (rating {})",
            review.review_id, product_id, review.rating
        );

        Ok(review)
    }
}

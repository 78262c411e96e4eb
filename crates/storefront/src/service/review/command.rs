use crate::{
    abstract_trait::{
        product::repository::DynProductQueryRepository,
        review::{repository::DynReviewCommandRepository, service::ReviewCommandServiceTrait},
    },
    domain::{requests::review::CreateReviewRequest, response::review::ReviewResponse},
};
use shared::{
    domain::ApiResponse,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status},
};

use async_trait::async_trait;
use prometheus_client::registry::Registry;
use tokio::time::Instant;
use tracing::info;

#[derive(Clone)]
pub struct ReviewCommandService {
    product_query: DynProductQueryRepository,
    command: DynReviewCommandRepository,
    metrics: Metrics,
}

impl ReviewCommandService {
    pub fn new(
        product_query: DynProductQueryRepository,
        command: DynReviewCommandRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "review_command_service_request_counter",
            "Total number of requests to the ReviewCommandService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "review_command_service_request_duration",
            "Histogram of request durations for the ReviewCommandService",
            metrics.request_duration.clone(),
        );

        Self {
            product_query,
            command,
            metrics,
        }
    }
}

#[async_trait]
impl ReviewCommandServiceTrait for ReviewCommandService {
    async fn create_review(
        &self,
        product_id: i32,
        user_id: i64,
        req: &CreateReviewRequest,
    ) -> Result<ApiResponse<ReviewResponse>, ServiceError> {
        info!("⭐ Creating review for product ID={product_id} by user {user_id}");

        let started = Instant::now();
        let result = self.create_review_inner(product_id, user_id, req).await;

        let status = if result.is_ok() {
            Status::Success
        } else {
            Status::Error
        };
        self.metrics
            .record(Method::Post, status, started.elapsed().as_secs_f64());

        result
    }
}

impl ReviewCommandService {
    async fn create_review_inner(
        &self,
        product_id: i32,
        user_id: i64,
        req: &CreateReviewRequest,
    ) -> Result<ApiResponse<ReviewResponse>, ServiceError> {
        self.product_query
            .find_by_id(product_id)
            .await
            .map_err(ServiceError::Repo)?
            .ok_or(ServiceError::Repo(RepositoryError::NotFound))?;

        match self.command.create_review(product_id, user_id, req).await {
            Ok(review) => {
                info!(
                    "✅ Review ID {} added for product {}",
                    review.review_id, product_id
                );
                Ok(ApiResponse::success("Review added", review.into()))
            }
            Err(RepositoryError::AlreadyExists(_)) => {
                Err(ServiceError::AlreadyReviewed { product_id })
            }
            Err(e) => Err(ServiceError::Repo(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::review::repository::ReviewCommandRepositoryTrait,
        model::review::Review,
        service::order::testutil::{InMemoryCatalog, product},
    };
    use rust_decimal_macros::dec;
    use std::sync::{
        Mutex,
        atomic::{AtomicI32, Ordering},
    };

    struct InMemoryReviews {
        reviews: Mutex<Vec<Review>>,
        next_id: AtomicI32,
    }

    impl InMemoryReviews {
        fn new() -> std::sync::Arc<Self> {
            std::sync::Arc::new(Self {
                reviews: Mutex::new(Vec::new()),
                next_id: AtomicI32::new(1),
            })
        }
    }

    #[async_trait]
    impl ReviewCommandRepositoryTrait for InMemoryReviews {
        async fn create_review(
            &self,
            product_id: i32,
            user_id: i64,
            req: &CreateReviewRequest,
        ) -> Result<Review, RepositoryError> {
            let mut reviews = self.reviews.lock().unwrap();

            if reviews
                .iter()
                .any(|r| r.product_id == product_id && r.user_id == user_id)
            {
                return Err(RepositoryError::AlreadyExists(
                    "reviews_product_user_key".into(),
                ));
            }

            let review = Review {
                review_id: self.next_id.fetch_add(1, Ordering::SeqCst),
                product_id,
                user_id,
                user_name: req.user_name.clone(),
                rating: req.rating,
                comment: req.comment.clone(),
                created_at: None,
            };

            reviews.push(review.clone());
            Ok(review)
        }
    }

    fn review_request() -> CreateReviewRequest {
        CreateReviewRequest {
            rating: 4,
            comment: "Does what it says".into(),
            user_name: "Pat".into(),
        }
    }

    #[tokio::test]
    async fn review_on_existing_product_succeeds() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let reviews = InMemoryReviews::new();
        let mut registry = Registry::default();
        let svc = ReviewCommandService::new(catalog, reviews, &mut registry);

        let response = svc.create_review(1, 7, &review_request()).await.unwrap();

        assert_eq!(response.data.product_id, 1);
        assert_eq!(response.data.rating, 4);
    }

    #[tokio::test]
    async fn duplicate_review_is_rejected() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let reviews = InMemoryReviews::new();
        let mut registry = Registry::default();
        let svc = ReviewCommandService::new(catalog, reviews, &mut registry);

        svc.create_review(1, 7, &review_request()).await.unwrap();
        let err = svc.create_review(1, 7, &review_request()).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::AlreadyReviewed { product_id: 1 }
        ));
    }

    #[tokio::test]
    async fn review_on_missing_product_is_not_found() {
        let catalog = InMemoryCatalog::new(vec![]);
        let reviews = InMemoryReviews::new();
        let mut registry = Registry::default();
        let svc = ReviewCommandService::new(catalog, reviews, &mut registry);

        let err = svc.create_review(9, 7, &review_request()).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Repo(RepositoryError::NotFound)
        ));
    }
}

use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{requests::product::FindAllProducts, response::product::ProductResponse},
};
use shared::{
    domain::{ApiResponse, ApiResponsePagination, Pagination},
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status},
};

use async_trait::async_trait;
use prometheus_client::registry::Registry;
use tokio::time::Instant;
use tracing::info;

/// The storefront carousel shows a handful of top-rated products.
const TOP_RATED_LIMIT: i64 = 3;

#[derive(Clone)]
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    metrics: Metrics,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "product_query_service_request_counter",
            "Total number of requests to the ProductQueryService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "product_query_service_request_duration",
            "Histogram of request durations for the ProductQueryService",
            metrics.request_duration.clone(),
        );

        Self { query, metrics }
    }

    fn record(&self, status: Status, started: Instant) {
        self.metrics
            .record(Method::Get, status, started.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        info!("🔍 Fetching products (page {}, search {:?})", req.page, req.search);

        let started = Instant::now();

        let (products, total) = self.query.find_all(req).await.map_err(|e| {
            self.record(Status::Error, started);
            ServiceError::Repo(e)
        })?;

        let responses: Vec<ProductResponse> =
            products.into_iter().map(ProductResponse::from).collect();

        self.record(Status::Success, started);
        Ok(ApiResponsePagination {
            status: "success".into(),
            message: "Products fetched successfully".into(),
            data: responses,
            pagination: Pagination::new(req.page, req.page_size, total),
        })
    }

    async fn find_by_id(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔍 Fetching product ID={product_id}");

        let started = Instant::now();

        let product = match self.query.find_by_id(product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                self.record(Status::Error, started);
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                self.record(Status::Error, started);
                return Err(ServiceError::Repo(e));
            }
        };

        self.record(Status::Success, started);
        Ok(ApiResponse::success(
            "Product fetched successfully",
            product.into(),
        ))
    }

    async fn find_top_rated(&self) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        info!("🔍 Fetching top rated products");

        let started = Instant::now();

        let products = self
            .query
            .find_top_rated(TOP_RATED_LIMIT)
            .await
            .map_err(|e| {
                self.record(Status::Error, started);
                ServiceError::Repo(e)
            })?;

        let responses = products.into_iter().map(ProductResponse::from).collect();

        self.record(Status::Success, started);
        Ok(ApiResponse::success(
            "Top rated products fetched successfully",
            responses,
        ))
    }
}

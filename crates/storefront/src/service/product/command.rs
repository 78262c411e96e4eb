use crate::{
    abstract_trait::product::{
        repository::DynProductCommandRepository, service::ProductCommandServiceTrait,
    },
    domain::{
        requests::product::{CreateProductRequest, UpdateProductRequest},
        response::product::ProductResponse,
    },
};
use shared::{
    domain::ApiResponse,
    errors::ServiceError,
    utils::{Method, Metrics, Status},
};

use async_trait::async_trait;
use prometheus_client::registry::Registry;
use tokio::time::Instant;
use tracing::info;

#[derive(Clone)]
pub struct ProductCommandService {
    command: DynProductCommandRepository,
    metrics: Metrics,
}

impl ProductCommandService {
    pub fn new(command: DynProductCommandRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "product_command_service_request_counter",
            "Total number of requests to the ProductCommandService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "product_command_service_request_duration",
            "Histogram of request durations for the ProductCommandService",
            metrics.request_duration.clone(),
        );

        Self { command, metrics }
    }

    fn record(&self, method: Method, status: Status, started: Instant) {
        self.metrics
            .record(method, status, started.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating product '{}'", req.name);

        let started = Instant::now();

        let product = self.command.create_product(req).await.map_err(|e| {
            self.record(Method::Post, Status::Error, started);
            ServiceError::Repo(e)
        })?;

        self.record(Method::Post, Status::Success, started);
        Ok(ApiResponse::success(
            "Product created successfully",
            product.into(),
        ))
    }

    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("✏️ Updating product ID={:?}", req.product_id);

        let started = Instant::now();

        // Placed orders keep their frozen snapshots; a price or name change
        // here only affects future quotes and placements.
        let product = self.command.update_product(req).await.map_err(|e| {
            self.record(Method::Put, Status::Error, started);
            ServiceError::Repo(e)
        })?;

        self.record(Method::Put, Status::Success, started);
        Ok(ApiResponse::success(
            "Product updated successfully",
            product.into(),
        ))
    }

    async fn trash_product(
        &self,
        product_id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🗑️ Soft deleting product ID={product_id}");

        let started = Instant::now();

        let product = self.command.trash_product(product_id).await.map_err(|e| {
            self.record(Method::Delete, Status::Error, started);
            ServiceError::Repo(e)
        })?;

        self.record(Method::Delete, Status::Success, started);
        Ok(ApiResponse::success(
            "Product moved to trash successfully",
            product.into(),
        ))
    }
}

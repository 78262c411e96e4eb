use crate::{
    abstract_trait::{
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderLifecycleService, DynOrderQueryService},
        },
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::{DynProductCommandService, DynProductQueryService},
        },
        review::{repository::DynReviewCommandRepository, service::DynReviewCommandService},
    },
    repository::{
        order::{OrderCommandRepository, OrderQueryRepository},
        product::{ProductCommandRepository, ProductQueryRepository},
        review::ReviewCommandRepository,
    },
    service::{
        order::{
            OrderCommandService, OrderCommandServiceDeps, OrderLifecycleService,
            OrderLifecycleServiceDeps, OrderQueryService,
        },
        pricing::PricingEngine,
        product::{ProductCommandService, ProductQueryService},
        review::ReviewCommandService,
    },
};
use prometheus_client::registry::Registry;
use shared::{
    config::{ConnectionPool, PricingConfig},
    utils::Metrics,
};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
    pub review_command: DynReviewCommandService,
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
    pub order_lifecycle: DynOrderLifecycleService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .field("review_command", &"ReviewCommandService")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .field("order_lifecycle", &"OrderLifecycleService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(pool: ConnectionPool, pricing: PricingConfig, registry: &mut Registry) -> Self {
        let product_query_repo: DynProductQueryRepository =
            Arc::new(ProductQueryRepository::new(pool.clone()));
        let product_command_repo: DynProductCommandRepository =
            Arc::new(ProductCommandRepository::new(pool.clone()));
        let order_query_repo: DynOrderQueryRepository =
            Arc::new(OrderQueryRepository::new(pool.clone()));
        let order_command_repo: DynOrderCommandRepository =
            Arc::new(OrderCommandRepository::new(pool.clone()));
        let review_command_repo: DynReviewCommandRepository =
            Arc::new(ReviewCommandRepository::new(pool.clone()));

        let pricing_engine = PricingEngine::new(pricing);

        let product_query: DynProductQueryService = Arc::new(ProductQueryService::new(
            product_query_repo.clone(),
            registry,
        ));

        let product_command: DynProductCommandService = Arc::new(ProductCommandService::new(
            product_command_repo.clone(),
            registry,
        ));

        let review_command: DynReviewCommandService = Arc::new(ReviewCommandService::new(
            product_query_repo.clone(),
            review_command_repo.clone(),
            registry,
        ));

        let order_command: DynOrderCommandService = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                product_query: product_query_repo.clone(),
                order_query: order_query_repo.clone(),
                command: order_command_repo.clone(),
                pricing: pricing_engine,
                metrics: Metrics::new(),
            },
            registry,
        ));

        let order_lifecycle: DynOrderLifecycleService = Arc::new(OrderLifecycleService::new(
            OrderLifecycleServiceDeps {
                query: order_query_repo.clone(),
                command: order_command_repo.clone(),
                metrics: Metrics::new(),
            },
            registry,
        ));

        let order_query: DynOrderQueryService =
            Arc::new(OrderQueryService::new(order_query_repo.clone(), registry));

        Self {
            product_query,
            product_command,
            review_command,
            order_query,
            order_command,
            order_lifecycle,
        }
    }
}

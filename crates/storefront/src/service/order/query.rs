use crate::{
    abstract_trait::order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    domain::{requests::order::FindAllOrders, response::order::OrderResponse},
};
use shared::{
    domain::{ApiResponse, ApiResponsePagination, AuthUser, Pagination},
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status},
};

use async_trait::async_trait;
use prometheus_client::registry::Registry;
use tokio::time::Instant;
use tracing::info;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    metrics: Metrics,
}

impl OrderQueryService {
    pub fn new(query: DynOrderQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "order_query_service_request_counter",
            "Total number of requests to the OrderQueryService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "order_query_service_request_duration",
            "Histogram of request durations for the OrderQueryService",
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
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_by_id(
        &self,
        order_id: i32,
        user: &AuthUser,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🔍 Fetching order ID={order_id}");

        let started = Instant::now();

        let order = match self.query.find_by_id(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                self.record(Status::Error, started);
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                self.record(Status::Error, started);
                return Err(ServiceError::Repo(e));
            }
        };

        // Customers only see their own orders; admins see everything.
        if order.order.user_id != user.user_id && !user.is_admin {
            self.record(Status::Error, started);
            return Err(ServiceError::Forbidden(
                "You do not have access to this order".into(),
            ));
        }

        self.record(Status::Success, started);
        Ok(ApiResponse::success(
            "Order fetched successfully",
            order.into(),
        ))
    }

    async fn find_by_user(
        &self,
        user_id: i64,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!("🔍 Fetching orders for user_id={user_id}");

        let started = Instant::now();

        let orders = self.query.find_by_user(user_id).await.map_err(|e| {
            self.record(Status::Error, started);
            ServiceError::Repo(e)
        })?;

        let responses = orders.into_iter().map(OrderResponse::from).collect();

        self.record(Status::Success, started);
        Ok(ApiResponse::success(
            "Orders fetched successfully",
            responses,
        ))
    }

    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        info!("🔍 Fetching all orders (page {})", req.page);

        let started = Instant::now();

        let (orders, total) = self.query.find_all(req).await.map_err(|e| {
            self.record(Status::Error, started);
            ServiceError::Repo(e)
        })?;

        let responses: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();

        self.record(Status::Success, started);
        Ok(ApiResponsePagination {
            status: "success".into(),
            message: "Orders fetched successfully".into(),
            data: responses,
            pagination: Pagination::new(req.page, req.page_size, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::order::repository::OrderCommandRepositoryTrait,
        domain::requests::order::{CreateOrderItemRecordRequest, CreateOrderRecordRequest},
        service::order::testutil::{InMemoryCatalog, InMemoryOrderStore, product},
    };
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn service(store: &Arc<InMemoryOrderStore>) -> OrderQueryService {
        let mut registry = Registry::default();
        OrderQueryService::new(store.clone(), &mut registry)
    }

    async fn seed_order(store: &Arc<InMemoryOrderStore>, user_id: i64, key: &str) -> i32 {
        let record = CreateOrderRecordRequest {
            user_id,
            idempotency_key: key.into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            postal_code: "12345".into(),
            country: "USA".into(),
            payment_method: "PayPal".into(),
            items_price: dec!(40.00),
            shipping_price: dec!(5.00),
            tax_price: dec!(3.20),
            total_price: dec!(48.20),
            items: vec![CreateOrderItemRecordRequest {
                product_id: 1,
                name: "Product 1".into(),
                image: String::new(),
                price: dec!(20.00),
                quantity: 2,
            }],
        };

        store.create_order(&record).await.unwrap().order.order_id
    }

    #[tokio::test]
    async fn owner_and_admin_can_read_order() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 5)]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);
        let order_id = seed_order(&store, 7, "key-query-1").await;

        let owner = AuthUser {
            user_id: 7,
            is_admin: false,
        };
        let admin = AuthUser {
            user_id: 99,
            is_admin: true,
        };

        assert!(svc.find_by_id(order_id, &owner).await.is_ok());
        assert!(svc.find_by_id(order_id, &admin).await.is_ok());
    }

    #[tokio::test]
    async fn other_customer_is_forbidden() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 5)]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);
        let order_id = seed_order(&store, 7, "key-query-2").await;

        let stranger = AuthUser {
            user_id: 8,
            is_admin: false,
        };

        let err = svc.find_by_id(order_id, &stranger).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn find_by_user_returns_only_own_orders() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 10)]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);
        seed_order(&store, 7, "key-query-3").await;
        seed_order(&store, 8, "key-query-4").await;

        let response = svc.find_by_user(7).await.unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].user_id, 7);
    }
}

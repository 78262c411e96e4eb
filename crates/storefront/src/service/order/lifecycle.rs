use crate::{
    abstract_trait::order::{
        repository::{DynOrderCommandRepository, DynOrderQueryRepository},
        service::OrderLifecycleServiceTrait,
    },
    domain::{requests::order::PayOrderRequest, response::order::OrderResponse},
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

/// Advances orders through `created → paid → delivered`. Transitions are
/// monotonic; there is no un-pay or un-deliver.
#[derive(Clone)]
pub struct OrderLifecycleService {
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    metrics: Metrics,
}

pub struct OrderLifecycleServiceDeps {
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub metrics: Metrics,
}

impl OrderLifecycleService {
    pub fn new(deps: OrderLifecycleServiceDeps, registry: &mut Registry) -> Self {
        let OrderLifecycleServiceDeps {
            query,
            command,
            metrics,
        } = deps;

        registry.register(
            "order_lifecycle_service_request_counter",
            "Total number of requests to the OrderLifecycleService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "order_lifecycle_service_request_duration",
            "Histogram of request durations for the OrderLifecycleService",
            metrics.request_duration.clone(),
        );

        Self {
            query,
            command,
            metrics,
        }
    }

    async fn mark_paid_inner(
        &self,
        order_id: i32,
        req: &PayOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let existing = self
            .query
            .find_by_id(order_id)
            .await?
            .ok_or(ServiceError::Repo(RepositoryError::NotFound))?;

        if existing.order.is_paid {
            return Err(ServiceError::AlreadyPaid { order_id });
        }

        // The guarded update is the authority: if a concurrent callback paid
        // the order between our read and this write, it matches no row and
        // paid_at is never recorded twice.
        match self
            .command
            .mark_paid(order_id, &req.payment_reference)
            .await?
        {
            Some(order) => {
                info!("💳 Order ID {order_id} transitioned to paid");
                Ok(ApiResponse::success(
                    "Order marked as paid",
                    OrderResponse::from_parts(order, existing.items),
                ))
            }
            None => Err(ServiceError::AlreadyPaid { order_id }),
        }
    }

    async fn mark_delivered_inner(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let existing = self
            .query
            .find_by_id(order_id)
            .await?
            .ok_or(ServiceError::Repo(RepositoryError::NotFound))?;

        if !existing.order.is_paid {
            return Err(ServiceError::NotPaid { order_id });
        }
        if existing.order.is_delivered {
            return Err(ServiceError::AlreadyDelivered { order_id });
        }

        match self.command.mark_delivered(order_id).await? {
            Some(order) => {
                info!("🚚 Order ID {order_id} transitioned to delivered");
                Ok(ApiResponse::success(
                    "Order marked as delivered",
                    OrderResponse::from_parts(order, existing.items),
                ))
            }
            None => Err(ServiceError::AlreadyDelivered { order_id }),
        }
    }
}

#[async_trait]
impl OrderLifecycleServiceTrait for OrderLifecycleService {
    async fn mark_paid(
        &self,
        order_id: i32,
        req: &PayOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("💳 Marking order ID={order_id} as paid");

        let started = Instant::now();
        let result = self.mark_paid_inner(order_id, req).await;

        let status = if result.is_ok() {
            Status::Success
        } else {
            Status::Error
        };
        self.metrics
            .record(Method::Post, status, started.elapsed().as_secs_f64());

        result
    }

    async fn mark_delivered(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🚚 Marking order ID={order_id} as delivered");

        let started = Instant::now();
        let result = self.mark_delivered_inner(order_id).await;

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

    fn service(store: &Arc<InMemoryOrderStore>) -> OrderLifecycleService {
        let mut registry = Registry::default();
        OrderLifecycleService::new(
            OrderLifecycleServiceDeps {
                query: store.clone(),
                command: store.clone(),
                metrics: Metrics::new(),
            },
            &mut registry,
        )
    }

    async fn seed_order(store: &Arc<InMemoryOrderStore>, key: &str) -> i32 {
        let record = CreateOrderRecordRequest {
            user_id: 7,
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

    fn pay_request() -> PayOrderRequest {
        PayOrderRequest {
            payment_reference: "PAY-12345".into(),
        }
    }

    #[tokio::test]
    async fn pay_then_deliver_succeeds() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 5)]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);
        let order_id = seed_order(&store, "key-lifecycle-1").await;

        let paid = svc.mark_paid(order_id, &pay_request()).await.unwrap();
        assert!(paid.data.is_paid);
        assert!(paid.data.paid_at.is_some());
        assert_eq!(paid.data.payment_reference.as_deref(), Some("PAY-12345"));
        assert!(!paid.data.is_delivered);

        let delivered = svc.mark_delivered(order_id).await.unwrap();
        assert!(delivered.data.is_paid);
        assert!(delivered.data.is_delivered);
        assert!(delivered.data.delivered_at.is_some());
    }

    #[tokio::test]
    async fn deliver_before_payment_is_rejected() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 5)]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);
        let order_id = seed_order(&store, "key-lifecycle-2").await;

        let err = svc.mark_delivered(order_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotPaid { .. }));

        // Order untouched by the rejected transition.
        let stored = store.orders.lock().unwrap()[0].order.clone();
        assert!(!stored.is_delivered);
        assert!(stored.delivered_at.is_none());
    }

    #[tokio::test]
    async fn double_pay_is_rejected_and_keeps_first_timestamp() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 5)]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);
        let order_id = seed_order(&store, "key-lifecycle-3").await;

        svc.mark_paid(order_id, &pay_request()).await.unwrap();
        let first_paid_at = store.orders.lock().unwrap()[0].order.paid_at;

        let err = svc.mark_paid(order_id, &pay_request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyPaid { .. }));

        let second_paid_at = store.orders.lock().unwrap()[0].order.paid_at;
        assert_eq!(first_paid_at, second_paid_at);
    }

    #[tokio::test]
    async fn double_deliver_is_rejected() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 5)]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);
        let order_id = seed_order(&store, "key-lifecycle-4").await;

        svc.mark_paid(order_id, &pay_request()).await.unwrap();
        svc.mark_delivered(order_id).await.unwrap();

        let err = svc.mark_delivered(order_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyDelivered { .. }));
    }

    #[tokio::test]
    async fn lifecycle_on_missing_order_is_not_found() {
        let catalog = InMemoryCatalog::new(vec![]);
        let store = InMemoryOrderStore::new(catalog);
        let svc = service(&store);

        let err = svc.mark_paid(42, &pay_request()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repo(RepositoryError::NotFound)
        ));
    }
}

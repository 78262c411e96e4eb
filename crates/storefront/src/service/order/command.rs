use crate::{
    abstract_trait::{
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
        product::repository::DynProductQueryRepository,
    },
    domain::{
        requests::order::{
            CartLineRequest, CreateOrderItemRecordRequest, CreateOrderRecordRequest,
            PlaceOrderRequest, QuoteRequest,
        },
        response::order::{OrderResponse, PriceQuoteResponse},
    },
    model::product::Product,
    service::pricing::{PriceQuote, PricingEngine},
};
use shared::{
    domain::ApiResponse,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status},
};

use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::collections::HashMap;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Bounded retries for transient storage conflicts. Business-rule failures
/// are never retried.
const MAX_PLACEMENT_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct OrderCommandService {
    product_query: DynProductQueryRepository,
    order_query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    pricing: PricingEngine,
    metrics: Metrics,
}

pub struct OrderCommandServiceDeps {
    pub product_query: DynProductQueryRepository,
    pub order_query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub pricing: PricingEngine,
    pub metrics: Metrics,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            product_query,
            order_query,
            command,
            pricing,
            metrics,
        } = deps;

        registry.register(
            "order_command_service_request_counter",
            "Total number of requests to the OrderCommandService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "order_command_service_request_duration",
            "Histogram of request durations for the OrderCommandService",
            metrics.request_duration.clone(),
        );

        Self {
            product_query,
            order_query,
            command,
            pricing,
            metrics,
        }
    }

    /// Point-in-time read of every product the cart references. Trashed or
    /// unknown ids are simply absent; the pricing and stock checks decide
    /// what that means.
    async fn catalog_snapshot(
        &self,
        lines: &[CartLineRequest],
    ) -> Result<HashMap<i32, Product>, ServiceError> {
        let ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();

        let products = self
            .product_query
            .find_by_ids(&ids)
            .await
            .map_err(ServiceError::Repo)?;

        Ok(products.into_iter().map(|p| (p.product_id, p)).collect())
    }

    fn check_stock(
        lines: &[CartLineRequest],
        snapshot: &HashMap<i32, Product>,
    ) -> Result<(), ServiceError> {
        for line in lines {
            let product =
                snapshot
                    .get(&line.product_id)
                    .ok_or(ServiceError::ProductUnavailable {
                        product_id: line.product_id,
                    })?;

            if line.quantity > product.stock {
                return Err(ServiceError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
        }

        Ok(())
    }

    /// Freeze each line to its snapshot copy so later catalog edits cannot
    /// reach back into this order.
    fn freeze_order(
        user_id: i64,
        req: &PlaceOrderRequest,
        quote: &PriceQuote,
        snapshot: &HashMap<i32, Product>,
    ) -> Result<CreateOrderRecordRequest, ServiceError> {
        let mut items = Vec::with_capacity(req.items.len());

        for line in &req.items {
            let product =
                snapshot
                    .get(&line.product_id)
                    .ok_or(ServiceError::ProductUnavailable {
                        product_id: line.product_id,
                    })?;

            items.push(CreateOrderItemRecordRequest {
                product_id: product.product_id,
                name: product.name.clone(),
                image: product.image.clone(),
                price: product.price,
                quantity: line.quantity,
            });
        }

        Ok(CreateOrderRecordRequest {
            user_id,
            idempotency_key: req.idempotency_key.clone(),
            address: req.shipping_address.address.clone(),
            city: req.shipping_address.city.clone(),
            postal_code: req.shipping_address.postal_code.clone(),
            country: req.shipping_address.country.clone(),
            payment_method: req.payment_method.clone(),
            items_price: quote.items_price,
            shipping_price: quote.shipping_price,
            tax_price: quote.tax_price,
            total_price: quote.total_price,
            items,
        })
    }

    async fn quote_inner(
        &self,
        req: &QuoteRequest,
    ) -> Result<ApiResponse<PriceQuoteResponse>, ServiceError> {
        let snapshot = self.catalog_snapshot(&req.items).await?;
        let quote = self.pricing.quote(&req.items, &snapshot)?;

        Ok(ApiResponse::success(
            "Quote computed successfully",
            quote.into(),
        ))
    }

    async fn place_order_inner(
        &self,
        user_id: i64,
        req: &PlaceOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        // At-most-once: a key that already produced an order short-circuits
        // before any validation or stock work.
        if let Some(existing) = self
            .order_query
            .find_by_idempotency_key(&req.idempotency_key)
            .await?
        {
            info!(
                "🔁 Idempotent replay: returning order ID {} for existing key",
                existing.order.order_id
            );
            return Ok(ApiResponse::success(
                "Order created successfully",
                existing.into(),
            ));
        }

        let mut attempt = 0;

        loop {
            attempt += 1;

            let snapshot = self.catalog_snapshot(&req.items).await?;
            Self::check_stock(&req.items, &snapshot)?;

            let quote = self.pricing.quote(&req.items, &snapshot)?;
            let record = Self::freeze_order(user_id, req, &quote, &snapshot)?;

            match self.command.create_order(&record).await {
                Ok(created) => {
                    info!(
                        "✅ Order ID {} placed for user {} (total {})",
                        created.order.order_id, user_id, created.order.total_price
                    );
                    return Ok(ApiResponse::success(
                        "Order created successfully",
                        created.into(),
                    ));
                }

                Err(RepositoryError::AlreadyExists(_)) => {
                    // A concurrent placement with the same key committed first;
                    // its order is the one and only result for this key.
                    info!("🔁 Lost idempotency-key race, returning the committed order");
                    let existing = self
                        .order_query
                        .find_by_idempotency_key(&req.idempotency_key)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::Internal(
                                "Order missing after idempotency conflict".into(),
                            )
                        })?;
                    return Ok(ApiResponse::success(
                        "Order created successfully",
                        existing.into(),
                    ));
                }

                Err(RepositoryError::StockConflict { product_id }) => {
                    // A concurrent placement consumed the stock between our
                    // snapshot and the commit. Genuinely short now, so this is
                    // a business rejection, not a retry.
                    let requested = req
                        .items
                        .iter()
                        .filter(|l| l.product_id == product_id)
                        .map(|l| l.quantity)
                        .sum();
                    let available = match self.product_query.find_by_id(product_id).await {
                        Ok(Some(p)) => p.stock,
                        _ => 0,
                    };
                    return Err(ServiceError::InsufficientStock {
                        product_id,
                        requested,
                        available,
                    });
                }

                Err(RepositoryError::Serialization(msg)) => {
                    if attempt < MAX_PLACEMENT_ATTEMPTS {
                        warn!(
                            "⚠️ Placement attempt {attempt} hit storage contention, retrying: {msg}"
                        );
                        continue;
                    }
                    error!("❌ Placement gave up after {attempt} attempts: {msg}");
                    return Err(ServiceError::ConflictRetriesExhausted);
                }

                Err(e) => return Err(ServiceError::Repo(e)),
            }
        }
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn quote(
        &self,
        req: &QuoteRequest,
    ) -> Result<ApiResponse<PriceQuoteResponse>, ServiceError> {
        info!("🧮 Quoting cart with {} line(s)", req.items.len());

        let started = Instant::now();
        let result = self.quote_inner(req).await;

        let status = if result.is_ok() {
            Status::Success
        } else {
            Status::Error
        };
        self.metrics
            .record(Method::Post, status, started.elapsed().as_secs_f64());

        result
    }

    async fn place_order(
        &self,
        user_id: i64,
        req: &PlaceOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🏗️ Placing order for user_id={user_id}");

        let started = Instant::now();
        let result = self.place_order_inner(user_id, req).await;

        if let Err(ref e) = result {
            info!("⚠️ Placement rejected for user {user_id}: {e}");
        }

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
        domain::requests::order::ShippingAddressRequest,
        service::order::testutil::{InMemoryCatalog, InMemoryOrderStore, product},
    };
    use rust_decimal_macros::dec;
    use shared::config::PricingConfig;
    use std::sync::{Arc, atomic::Ordering};

    fn test_engine() -> PricingEngine {
        PricingEngine::new(PricingConfig {
            free_shipping_threshold: dec!(50),
            flat_shipping_fee: dec!(5),
            tax_rate: dec!(0.08),
        })
    }

    fn service(
        catalog: &Arc<InMemoryCatalog>,
        store: &Arc<InMemoryOrderStore>,
    ) -> OrderCommandService {
        let mut registry = Registry::default();
        OrderCommandService::new(
            OrderCommandServiceDeps {
                product_query: catalog.clone(),
                order_query: store.clone(),
                command: store.clone(),
                pricing: test_engine(),
                metrics: Metrics::new(),
            },
            &mut registry,
        )
    }

    fn line(product_id: i32, quantity: i32) -> CartLineRequest {
        CartLineRequest {
            product_id,
            quantity,
            price: None,
        }
    }

    fn place_request(items: Vec<CartLineRequest>, key: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            items,
            shipping_address: ShippingAddressRequest {
                address: "1 Main St".into(),
                city: "Springfield".into(),
                postal_code: "12345".into(),
                country: "USA".into(),
            },
            payment_method: "PayPal".into(),
            idempotency_key: key.into(),
        }
    }

    #[tokio::test]
    async fn placement_freezes_catalog_totals() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let response = svc
            .place_order(7, &place_request(vec![line(1, 2)], "key-000000001"))
            .await
            .unwrap();

        let order = response.data;
        assert_eq!(order.items_price, dec!(40.00));
        assert_eq!(order.shipping_price, dec!(5.00));
        assert_eq!(order.tax_price, dec!(3.20));
        assert_eq!(order.total_price, dec!(48.20));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, dec!(20.00));
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(catalog.stock_of(1), 1);
    }

    #[tokio::test]
    async fn replayed_key_returns_first_order_and_decrements_once() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let first = svc
            .place_order(7, &place_request(vec![line(1, 2)], "key-000000002"))
            .await
            .unwrap();

        // Even a different cart behind the same key replays the first order.
        let second = svc
            .place_order(7, &place_request(vec![line(1, 1)], "key-000000002"))
            .await
            .unwrap();

        assert_eq!(first.data.id, second.data.id);
        assert_eq!(first.data.total_price, second.data.total_price);
        assert_eq!(store.order_count(), 1);
        assert_eq!(catalog.stock_of(1), 1);
    }

    #[tokio::test]
    async fn insufficient_stock_rejects_whole_placement() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let err = svc
            .place_order(7, &place_request(vec![line(1, 5)], "key-000000003"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InsufficientStock {
                product_id: 1,
                requested: 5,
                available: 3
            }
        ));
        assert_eq!(catalog.stock_of(1), 3);
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn placement_is_all_or_nothing() {
        let catalog =
            InMemoryCatalog::new(vec![product(1, dec!(20.00), 3), product(2, dec!(10.00), 1)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let err = svc
            .place_order(
                7,
                &place_request(vec![line(1, 2), line(2, 2)], "key-000000004"),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InsufficientStock { product_id: 2, .. }
        ));
        assert_eq!(catalog.stock_of(1), 3);
        assert_eq!(catalog.stock_of(2), 1);
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn unknown_product_is_unavailable() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let err = svc
            .place_order(7, &place_request(vec![line(99, 1)], "key-000000005"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::ProductUnavailable { product_id: 99 }
        ));
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn tampered_client_price_does_not_change_totals() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let mut tampered = line(1, 2);
        tampered.price = Some(dec!(0.01));

        let response = svc
            .place_order(7, &place_request(vec![tampered], "key-000000006"))
            .await
            .unwrap();

        assert_eq!(response.data.items[0].price, dec!(20.00));
        assert_eq!(response.data.total_price, dec!(48.20));
    }

    #[tokio::test]
    async fn transient_conflict_is_retried() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        store.serialization_failures.store(2, Ordering::SeqCst);
        let svc = service(&catalog, &store);

        let response = svc
            .place_order(7, &place_request(vec![line(1, 2)], "key-000000007"))
            .await
            .unwrap();

        assert_eq!(response.data.total_price, dec!(48.20));
        assert_eq!(store.order_count(), 1);
        assert_eq!(catalog.stock_of(1), 1);
    }

    #[tokio::test]
    async fn conflict_retries_are_bounded() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        store.serialization_failures.store(3, Ordering::SeqCst);
        let svc = service(&catalog, &store);

        let err = svc
            .place_order(7, &place_request(vec![line(1, 2)], "key-000000008"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::ConflictRetriesExhausted));
        assert_eq!(store.order_count(), 0);
        assert_eq!(catalog.stock_of(1), 3);
    }

    #[tokio::test]
    async fn lost_idempotency_race_returns_committed_order() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 5)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let first = svc
            .place_order(7, &place_request(vec![line(1, 2)], "key-000000009"))
            .await
            .unwrap();

        // Stage the race: the existence check misses, the insert collides.
        store.hide_existing_once.store(true, Ordering::SeqCst);

        let second = svc
            .place_order(7, &place_request(vec![line(1, 2)], "key-000000009"))
            .await
            .unwrap();

        assert_eq!(first.data.id, second.data.id);
        assert_eq!(store.order_count(), 1);
        assert_eq!(catalog.stock_of(1), 3);
    }

    #[tokio::test]
    async fn quote_writes_nothing() {
        let catalog = InMemoryCatalog::new(vec![product(1, dec!(20.00), 3)]);
        let store = InMemoryOrderStore::new(catalog.clone());
        let svc = service(&catalog, &store);

        let response = svc
            .quote(&QuoteRequest {
                items: vec![line(1, 2)],
            })
            .await
            .unwrap();

        assert_eq!(response.data.items_price, dec!(40.00));
        assert_eq!(response.data.total_price, dec!(48.20));
        assert_eq!(catalog.stock_of(1), 3);
        assert_eq!(store.order_count(), 0);
    }
}

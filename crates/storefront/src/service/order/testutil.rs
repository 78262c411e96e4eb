//! In-memory repository doubles for service-level tests. They honor the same
//! contracts as the sqlx repositories: all-or-nothing stock reservation,
//! unique idempotency keys, guarded lifecycle transitions.

use crate::{
    abstract_trait::{
        order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        product::repository::ProductQueryRepositoryTrait,
    },
    domain::requests::{
        order::{CreateOrderRecordRequest, FindAllOrders},
        product::FindAllProducts,
    },
    model::{
        order::{Order, OrderWithItems},
        order_item::OrderItem,
        product::Product,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering},
    },
};

pub(crate) fn product(product_id: i32, price: Decimal, stock: i32) -> Product {
    Product {
        product_id,
        name: format!("Product {product_id}"),
        image: format!("/images/{product_id}.jpg"),
        category: "test".into(),
        description: "A test product".into(),
        price,
        stock,
        rating: Decimal::ZERO,
        num_reviews: 0,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

pub(crate) struct InMemoryCatalog {
    pub products: Mutex<HashMap<i32, Product>>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Arc<Self> {
        Arc::new(Self {
            products: Mutex::new(products.into_iter().map(|p| (p.product_id, p)).collect()),
        })
    }

    pub fn stock_of(&self, product_id: i32) -> i32 {
        self.products
            .lock()
            .unwrap()
            .get(&product_id)
            .map(|p| p.stock)
            .unwrap_or(-1)
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryCatalog {
    async fn find_all(
        &self,
        _req: &FindAllProducts,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        unimplemented!("not exercised by order service tests")
    }

    async fn find_by_id(&self, product_id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .get(&product_id)
            .filter(|p| p.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_ids(&self, product_ids: &[i32]) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.lock().unwrap();
        Ok(product_ids
            .iter()
            .filter_map(|id| products.get(id))
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_top_rated(&self, _limit: i64) -> Result<Vec<Product>, RepositoryError> {
        unimplemented!("not exercised by order service tests")
    }
}

pub(crate) struct InMemoryOrderStore {
    pub catalog: Arc<InMemoryCatalog>,
    pub orders: Mutex<Vec<OrderWithItems>>,
    next_id: AtomicI32,
    /// Number of upcoming `create_order` calls that fail with a simulated
    /// serialization conflict before succeeding.
    pub serialization_failures: AtomicU32,
    /// Makes the next `find_by_idempotency_key` miss, to stage the race where
    /// two placements with one key both pass the existence check.
    pub hide_existing_once: AtomicBool,
}

impl InMemoryOrderStore {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            orders: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
            serialization_failures: AtomicU32::new(0),
            hide_existing_once: AtomicBool::new(false),
        })
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryOrderStore {
    async fn find_by_id(&self, order_id: i32) -> Result<Option<OrderWithItems>, RepositoryError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.order.order_id == order_id)
            .cloned())
    }

    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        if self.hide_existing_once.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }

        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.order.idempotency_key == key)
            .cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<OrderWithItems>, RepositoryError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.order.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_all(
        &self,
        _req: &FindAllOrders,
    ) -> Result<(Vec<OrderWithItems>, i64), RepositoryError> {
        let orders = self.orders.lock().unwrap();
        Ok((orders.clone(), orders.len() as i64))
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryOrderStore {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderWithItems, RepositoryError> {
        let pending = self.serialization_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.serialization_failures
                .store(pending - 1, Ordering::SeqCst);
            return Err(RepositoryError::Serialization(
                "simulated storage contention".into(),
            ));
        }

        let mut products = self.catalog.products.lock().unwrap();
        let mut orders = self.orders.lock().unwrap();

        if orders
            .iter()
            .any(|o| o.order.idempotency_key == req.idempotency_key)
        {
            return Err(RepositoryError::AlreadyExists(
                "orders_idempotency_key_key".into(),
            ));
        }

        // All-or-nothing: verify every line before any decrement, exactly like
        // the transactional repository rolls back on the first short row.
        for item in &req.items {
            let available = products
                .get(&item.product_id)
                .filter(|p| p.deleted_at.is_none())
                .map(|p| p.stock)
                .unwrap_or(0);
            if available < item.quantity {
                return Err(RepositoryError::StockConflict {
                    product_id: item.product_id,
                });
            }
        }

        for item in &req.items {
            if let Some(p) = products.get_mut(&item.product_id) {
                p.stock -= item.quantity;
            }
        }

        let order_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now().naive_utc();

        let order = Order {
            order_id,
            user_id: req.user_id,
            idempotency_key: req.idempotency_key.clone(),
            address: req.address.clone(),
            city: req.city.clone(),
            postal_code: req.postal_code.clone(),
            country: req.country.clone(),
            payment_method: req.payment_method.clone(),
            items_price: req.items_price,
            shipping_price: req.shipping_price,
            tax_price: req.tax_price,
            total_price: req.total_price,
            is_paid: false,
            paid_at: None,
            payment_reference: None,
            is_delivered: false,
            delivered_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let items: Vec<OrderItem> = req
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| OrderItem {
                order_item_id: order_id * 100 + idx as i32,
                order_id,
                product_id: item.product_id,
                name: item.name.clone(),
                image: item.image.clone(),
                price: item.price,
                quantity: item.quantity,
                created_at: Some(now),
            })
            .collect();

        let with_items = OrderWithItems { order, items };
        orders.push(with_items.clone());

        Ok(with_items)
    }

    async fn mark_paid(
        &self,
        order_id: i32,
        payment_reference: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut orders = self.orders.lock().unwrap();

        let Some(existing) = orders.iter_mut().find(|o| o.order.order_id == order_id) else {
            return Ok(None);
        };

        if existing.order.is_paid {
            return Ok(None);
        }

        existing.order.is_paid = true;
        existing.order.paid_at = Some(Utc::now().naive_utc());
        existing.order.payment_reference = Some(payment_reference.to_string());

        Ok(Some(existing.order.clone()))
    }

    async fn mark_delivered(&self, order_id: i32) -> Result<Option<Order>, RepositoryError> {
        let mut orders = self.orders.lock().unwrap();

        let Some(existing) = orders.iter_mut().find(|o| o.order.order_id == order_id) else {
            return Ok(None);
        };

        if !existing.order.is_paid || existing.order.is_delivered {
            return Ok(None);
        }

        existing.order.is_delivered = true;
        existing.order.delivered_at = Some(Utc::now().naive_utc());

        Ok(Some(existing.order.clone()))
    }
}

use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::CreateOrderRecordRequest,
    model::{
        order::{Order, OrderWithItems},
        order_item::OrderItem,
    },
    repository::order::{ORDER_COLUMNS, ORDER_ITEM_COLUMNS},
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        // Reserve stock first. The conditional decrement row-locks each product
        // and matches nothing when stock is short, so a concurrent placement
        // can never drive stock below zero. Dropping the transaction on any
        // error path rolls everything back.
        for item in &req.items {
            let result = sqlx::query(
                r#"
            UPDATE products
            SET stock = stock - $2, updated_at = current_timestamp
            WHERE product_id = $1 AND deleted_at IS NULL AND stock >= $2
            "#,
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to reserve stock for product {}: {:?}",
                    item.product_id, e
                );
                RepositoryError::from_pg(e)
            })?;

            if result.rows_affected() == 0 {
                info!(
                    "⚠️ Stock reservation lost for product {} (requested {})",
                    item.product_id, item.quantity
                );
                return Err(RepositoryError::StockConflict {
                    product_id: item.product_id,
                });
            }
        }

        let order: Order = sqlx::query_as(&format!(
            r#"
        INSERT INTO orders (user_id, idempotency_key, address, city, postal_code, country,
                            payment_method, items_price, shipping_price, tax_price, total_price,
                            created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                current_timestamp, current_timestamp)
        RETURNING {ORDER_COLUMNS}
        "#
        ))
        .bind(req.user_id)
        .bind(&req.idempotency_key)
        .bind(&req.address)
        .bind(&req.city)
        .bind(&req.postal_code)
        .bind(&req.country)
        .bind(&req.payment_method)
        .bind(req.items_price)
        .bind(req.shipping_price)
        .bind(req.tax_price)
        .bind(req.total_price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert order for user {}: {:?}",
                req.user_id, err
            );
            RepositoryError::from_pg(err)
        })?;

        let mut items = Vec::with_capacity(req.items.len());
        for item in &req.items {
            let inserted: OrderItem = sqlx::query_as(&format!(
                r#"
            INSERT INTO order_items (order_id, product_id, name, image, price, quantity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, current_timestamp)
            RETURNING {ORDER_ITEM_COLUMNS}
            "#
            ))
            .bind(order.order_id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(&item.image)
            .bind(item.price)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to insert order item for product {}: {:?}",
                    item.product_id, e
                );
                RepositoryError::from_pg(e)
            })?;

            items.push(inserted);
        }

        tx.commit().await.map_err(RepositoryError::from_pg)?;

        info!(
            "✅ Created order ID {} for user {} ({} items)",
            order.order_id,
            order.user_id,
            items.len()
        );

        Ok(OrderWithItems { order, items })
    }

    async fn mark_paid(
        &self,
        order_id: i32,
        payment_reference: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        // The is_paid guard makes a racing double-pay a no-match instead of a
        // second paid_at write.
        let order: Option<Order> = sqlx::query_as(&format!(
            r#"
        UPDATE orders
        SET is_paid           = TRUE,
            paid_at           = current_timestamp,
            payment_reference = $2,
            updated_at        = current_timestamp
        WHERE order_id = $1 AND is_paid = FALSE
        RETURNING {ORDER_COLUMNS}
        "#
        ))
        .bind(order_id)
        .bind(payment_reference)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to mark order {} paid: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        if let Some(ref o) = order {
            info!("💳 Order ID {} marked paid at {:?}", o.order_id, o.paid_at);
        }

        Ok(order)
    }

    async fn mark_delivered(&self, order_id: i32) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order: Option<Order> = sqlx::query_as(&format!(
            r#"
        UPDATE orders
        SET is_delivered = TRUE,
            delivered_at = current_timestamp,
            updated_at   = current_timestamp
        WHERE order_id = $1 AND is_paid = TRUE AND is_delivered = FALSE
        RETURNING {ORDER_COLUMNS}
        "#
        ))
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to mark order {} delivered: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        if let Some(ref o) = order {
            info!("🚚 Order ID {} marked delivered", o.order_id);
        }

        Ok(order)
    }
}

use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::order::FindAllOrders,
    model::{
        order::{Order, OrderWithItems},
        order_item::OrderItem,
    },
    repository::order::{ORDER_COLUMNS, ORDER_ITEM_COLUMNS},
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, Row, postgres::PgRow};
use std::collections::HashMap;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    /// Fetch the items for a batch of orders in one round trip and group them
    /// by order id.
    async fn load_items(
        conn: &mut PgConnection,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<OrderItem>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items: Vec<OrderItem> = sqlx::query_as(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items
             WHERE order_id = ANY($1)
             ORDER BY order_item_id"
        ))
        .bind(order_ids)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order items: {:?}", e);
            RepositoryError::from(e)
        })?;

        let mut grouped: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.order_id).or_default().push(item);
        }

        Ok(grouped)
    }

    async fn attach_items(
        conn: &mut PgConnection,
        order: Order,
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut grouped = Self::load_items(conn, &[order.order_id]).await?;
        let items = grouped.remove(&order.order_id).unwrap_or_default();
        Ok(OrderWithItems { order, items })
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, order_id: i32) -> Result<Option<OrderWithItems>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order: Option<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order ID {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        match order {
            Some(order) => Ok(Some(Self::attach_items(&mut conn, order).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order: Option<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE idempotency_key = $1"
        ))
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order for idempotency key: {:?}", e);
            RepositoryError::from(e)
        })?;

        match order {
            Some(order) => Ok(Some(Self::attach_items(&mut conn, order).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<OrderWithItems>, RepositoryError> {
        info!("📦 Fetching orders for user_id: {}", user_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let orders: Vec<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders for user {}: {:?}", user_id, e);
            RepositoryError::from(e)
        })?;

        let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let mut grouped = Self::load_items(&mut conn, &order_ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = grouped.remove(&order.order_id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }

    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderWithItems>, i64), RepositoryError> {
        info!("📦 Fetching orders page {} ({})", req.page, req.page_size);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = req.page_size as i64;
        let offset = ((req.page - 1).max(0) * req.page_size) as i64;

        let rows: Vec<PgRow> = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS}, COUNT(*) OVER() AS total_count
             FROM orders
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total = rows
            .first()
            .map(|r| r.try_get::<i64, _>("total_count"))
            .transpose()
            .map_err(RepositoryError::from)?
            .unwrap_or(0);

        let orders: Vec<Order> = rows
            .iter()
            .map(Order::from_row)
            .collect::<Result<_, _>>()
            .map_err(RepositoryError::from)?;

        let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let mut grouped = Self::load_items(&mut conn, &order_ids).await?;

        let with_items = orders
            .into_iter()
            .map(|order| {
                let items = grouped.remove(&order.order_id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect();

        Ok((with_items, total))
    }
}

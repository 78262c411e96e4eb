use crate::model::order_item::OrderItem;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub user_id: i64,
    pub idempotency_key: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub payment_method: String,
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<NaiveDateTime>,
    pub payment_reference: Option<String>,
    pub is_delivered: bool,
    pub delivered_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// An order together with its frozen line items, the unit the service and
/// response layers work with.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A frozen copy of a product at placement time. Later catalog edits must not
/// reach back into placed orders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: Option<NaiveDateTime>,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub review_id: i32,
    pub product_id: i32,
    pub user_id: i64,
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: Option<NaiveDateTime>,
}

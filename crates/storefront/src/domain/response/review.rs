use crate::model::review::Review as ReviewModel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ReviewResponse {
    pub id: i32,
    #[serde(rename = "product_id")]
    pub product_id: i32,
    #[serde(rename = "user_id")]
    pub user_id: i64,
    #[serde(rename = "user_name")]
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
}

impl From<ReviewModel> for ReviewResponse {
    fn from(value: ReviewModel) -> Self {
        ReviewResponse {
            id: value.review_id,
            product_id: value.product_id,
            user_id: value.user_id,
            user_name: value.user_name,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at.map(|dt| dt.to_string()),
        }
    }
}

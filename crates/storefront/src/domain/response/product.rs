use crate::model::product::Product as ProductModel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub rating: Decimal,
    #[serde(rename = "num_reviews")]
    pub num_reviews: i32,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at")]
    pub updated_at: Option<String>,
}

impl From<ProductModel> for ProductResponse {
    fn from(value: ProductModel) -> Self {
        ProductResponse {
            id: value.product_id,
            name: value.name,
            image: value.image,
            category: value.category,
            description: value.description,
            price: value.price,
            stock: value.stock,
            rating: value.rating,
            num_reviews: value.num_reviews,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}

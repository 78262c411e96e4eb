use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::requests::order::{default_page, default_page_size};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, IntoParams)]
pub struct FindAllProducts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(rename = "page_size", default = "default_page_size")]
    pub page_size: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 2, max = 100, message = "Product name must be between 2 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    pub image: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_non_negative"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Count in stock must be a non-negative integer"))]
    pub stock: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(skip_deserializing)]
    #[serde(rename = "product_id")]
    pub product_id: Option<i32>,

    #[validate(length(min = 2, max = 100, message = "Product name must be between 2 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    pub image: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_non_negative"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Count in stock must be a non-negative integer"))]
    pub stock: i32,
}

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Price must be a positive number".into());
        return Err(err);
    }
    Ok(())
}

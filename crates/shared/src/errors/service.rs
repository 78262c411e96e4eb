use crate::errors::repository::RepositoryError;
use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: i32, quantity: i32 },

    #[error("Product {product_id} is unavailable")]
    ProductUnavailable { product_id: i32 },

    #[error(
        "Insufficient stock for product {product_id}: requested={requested}, available={available}"
    )]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Order {order_id} is already paid")]
    AlreadyPaid { order_id: i32 },

    #[error("Order {order_id} is not paid yet")]
    NotPaid { order_id: i32 },

    #[error("Order {order_id} is already delivered")]
    AlreadyDelivered { order_id: i32 },

    #[error("Product {product_id} is already reviewed by this user")]
    AlreadyReviewed { product_id: i32 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid Token")]
    InvalidTokenType,

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Storage contention, retries exhausted")]
    ConflictRetriesExhausted,

    #[error("Internal error: {0}")]
    Internal(String),
}

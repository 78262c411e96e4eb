use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// One cart line as submitted by the client. The `price` field is what the
/// storefront displayed when the line entered the cart; the server recomputes
/// every total from the live catalog and never reads it.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CartLineRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "product_id")]
    pub product_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct QuoteRequest {
    #[validate(length(min = 1, message = "Cart must contain at least one item"), nested)]
    pub items: Vec<CartLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct ShippingAddressRequest {
    #[validate(length(min = 1, message = "Shipping address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, message = "Postal code is required"))]
    #[serde(rename = "postal_code")]
    pub postal_code: String,

    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, message = "Cart must contain at least one item"), nested)]
    pub items: Vec<CartLineRequest>,

    #[validate(nested)]
    #[serde(rename = "shipping_address")]
    pub shipping_address: ShippingAddressRequest,

    #[validate(length(min = 1, message = "Payment method is required"))]
    #[serde(rename = "payment_method")]
    pub payment_method: String,

    #[validate(length(min = 8, max = 128))]
    #[serde(rename = "idempotency_key")]
    pub idempotency_key: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct PayOrderRequest {
    #[validate(length(min = 1, message = "Payment reference is required"))]
    #[serde(rename = "payment_reference")]
    pub payment_reference: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, IntoParams)]
pub struct FindAllOrders {
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: i32,

    #[validate(range(min = 1, max = 100))]
    #[serde(rename = "page_size", default = "default_page_size")]
    pub page_size: i32,
}

pub(crate) fn default_page() -> i32 {
    1
}

pub(crate) fn default_page_size() -> i32 {
    10
}

/// Write-side record handed to the order repository: totals already computed,
/// every line frozen to its catalog snapshot.
#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
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
    pub items: Vec<CreateOrderItemRecordRequest>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderItemRecordRequest {
    pub product_id: i32,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
}

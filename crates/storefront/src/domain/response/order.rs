use crate::{
    model::{
        order::{Order as OrderModel, OrderWithItems},
        order_item::OrderItem as OrderItemModel,
    },
    service::pricing::PriceQuote,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PriceQuoteResponse {
    #[serde(rename = "items_price")]
    pub items_price: Decimal,
    #[serde(rename = "shipping_price")]
    pub shipping_price: Decimal,
    #[serde(rename = "tax_price")]
    pub tax_price: Decimal,
    #[serde(rename = "total_price")]
    pub total_price: Decimal,
}

impl From<PriceQuote> for PriceQuoteResponse {
    fn from(value: PriceQuote) -> Self {
        PriceQuoteResponse {
            items_price: value.items_price,
            shipping_price: value.shipping_price,
            tax_price: value.tax_price,
            total_price: value.total_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemResponse {
    pub id: i32,
    #[serde(rename = "product_id")]
    pub product_id: i32,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl From<OrderItemModel> for OrderItemResponse {
    fn from(value: OrderItemModel) -> Self {
        OrderItemResponse {
            id: value.order_item_id,
            product_id: value.product_id,
            name: value.name,
            image: value.image,
            price: value.price,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ShippingAddressResponse {
    pub address: String,
    pub city: String,
    #[serde(rename = "postal_code")]
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub id: i32,
    #[serde(rename = "user_id")]
    pub user_id: i64,
    #[serde(rename = "idempotency_key")]
    pub idempotency_key: String,
    pub items: Vec<OrderItemResponse>,
    #[serde(rename = "shipping_address")]
    pub shipping_address: ShippingAddressResponse,
    #[serde(rename = "payment_method")]
    pub payment_method: String,
    #[serde(rename = "items_price")]
    pub items_price: Decimal,
    #[serde(rename = "shipping_price")]
    pub shipping_price: Decimal,
    #[serde(rename = "tax_price")]
    pub tax_price: Decimal,
    #[serde(rename = "total_price")]
    pub total_price: Decimal,
    #[serde(rename = "is_paid")]
    pub is_paid: bool,
    #[serde(rename = "paid_at")]
    pub paid_at: Option<String>,
    #[serde(rename = "payment_reference")]
    pub payment_reference: Option<String>,
    #[serde(rename = "is_delivered")]
    pub is_delivered: bool,
    #[serde(rename = "delivered_at")]
    pub delivered_at: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
}

impl OrderResponse {
    pub fn from_parts(order: OrderModel, items: Vec<OrderItemModel>) -> Self {
        OrderResponse {
            id: order.order_id,
            user_id: order.user_id,
            idempotency_key: order.idempotency_key,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
            shipping_address: ShippingAddressResponse {
                address: order.address,
                city: order.city,
                postal_code: order.postal_code,
                country: order.country,
            },
            payment_method: order.payment_method,
            items_price: order.items_price,
            shipping_price: order.shipping_price,
            tax_price: order.tax_price,
            total_price: order.total_price,
            is_paid: order.is_paid,
            paid_at: order.paid_at.map(|dt| dt.to_string()),
            payment_reference: order.payment_reference,
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at.map(|dt| dt.to_string()),
            created_at: order.created_at.map(|dt| dt.to_string()),
        }
    }
}

impl From<OrderWithItems> for OrderResponse {
    fn from(value: OrderWithItems) -> Self {
        OrderResponse::from_parts(value.order, value.items)
    }
}

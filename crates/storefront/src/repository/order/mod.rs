mod command;
mod query;

pub use self::command::OrderCommandRepository;
pub use self::query::OrderQueryRepository;

const ORDER_COLUMNS: &str = "order_id, user_id, idempotency_key, address, city, postal_code, \
     country, payment_method, items_price, shipping_price, tax_price, total_price, \
     is_paid, paid_at, payment_reference, is_delivered, delivered_at, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "order_item_id, order_id, product_id, name, image, price, quantity, created_at";

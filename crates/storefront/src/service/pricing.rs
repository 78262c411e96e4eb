use crate::{domain::requests::order::CartLineRequest, model::product::Product};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::{config::PricingConfig, errors::ServiceError};
use std::collections::HashMap;

/// Totals computed for one cart against one catalog snapshot. Never cached:
/// catalog prices can change between a quote and the placement that follows
/// it, so every request prices fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
}

/// Round half-up to 2 decimal places and pin the scale so money always
/// serializes with cents.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Price a cart against a catalog snapshot. Only the catalog price is
    /// read; whatever unit price the client attached to a line never enters
    /// the arithmetic. Rounding is applied once per derived field, not
    /// compounded.
    pub fn quote(
        &self,
        lines: &[CartLineRequest],
        snapshot: &HashMap<i32, Product>,
    ) -> Result<PriceQuote, ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let mut items_total = Decimal::ZERO;

        for line in lines {
            if line.quantity < 1 {
                return Err(ServiceError::InvalidQuantity {
                    product_id: line.product_id,
                    quantity: line.quantity,
                });
            }

            let product = snapshot
                .get(&line.product_id)
                .ok_or(ServiceError::ProductUnavailable {
                    product_id: line.product_id,
                })?;

            items_total += product.price * Decimal::from(line.quantity);
        }

        let items_price = round_money(items_total);

        let shipping_price = if items_price >= self.config.free_shipping_threshold {
            round_money(Decimal::ZERO)
        } else {
            round_money(self.config.flat_shipping_fee)
        };

        let tax_price = round_money(items_price * self.config.tax_rate);
        let total_price = round_money(items_price + shipping_price + tax_price);

        Ok(PriceQuote {
            items_price,
            shipping_price,
            tax_price,
            total_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_config() -> PricingConfig {
        PricingConfig {
            free_shipping_threshold: dec!(50),
            flat_shipping_fee: dec!(5),
            tax_rate: dec!(0.08),
        }
    }

    fn product(product_id: i32, price: Decimal, stock: i32) -> Product {
        Product {
            product_id,
            name: format!("Product {product_id}"),
            image: String::new(),
            category: "test".into(),
            description: String::new(),
            price,
            stock,
            rating: Decimal::ZERO,
            num_reviews: 0,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn line(product_id: i32, quantity: i32) -> CartLineRequest {
        CartLineRequest {
            product_id,
            quantity,
            price: None,
        }
    }

    fn snapshot(products: Vec<Product>) -> HashMap<i32, Product> {
        products.into_iter().map(|p| (p.product_id, p)).collect()
    }

    #[test]
    fn quote_below_free_shipping_threshold() {
        let engine = PricingEngine::new(test_config());
        let snapshot = snapshot(vec![product(1, dec!(20.00), 3)]);

        let quote = engine.quote(&[line(1, 2)], &snapshot).unwrap();

        assert_eq!(quote.items_price, dec!(40.00));
        assert_eq!(quote.shipping_price, dec!(5.00));
        assert_eq!(quote.tax_price, dec!(3.20));
        assert_eq!(quote.total_price, dec!(48.20));
    }

    #[test]
    fn quote_at_threshold_ships_free() {
        let engine = PricingEngine::new(test_config());
        let snapshot = snapshot(vec![product(1, dec!(25.00), 10)]);

        let quote = engine.quote(&[line(1, 2)], &snapshot).unwrap();

        assert_eq!(quote.items_price, dec!(50.00));
        assert_eq!(quote.shipping_price, dec!(0.00));
        assert_eq!(quote.tax_price, dec!(4.00));
        assert_eq!(quote.total_price, dec!(54.00));
    }

    #[test]
    fn tax_rounds_half_up_once() {
        let engine = PricingEngine::new(test_config());
        // 3 × 20.75 = 62.25; 62.25 × 0.08 = 4.98 exactly, but 62.25 over the
        // threshold exercises the free-shipping branch too.
        let snapshot = snapshot(vec![product(1, dec!(20.75), 10)]);

        let quote = engine.quote(&[line(1, 3)], &snapshot).unwrap();

        assert_eq!(quote.items_price, dec!(62.25));
        assert_eq!(quote.shipping_price, dec!(0.00));
        assert_eq!(quote.tax_price, dec!(4.98));
        assert_eq!(quote.total_price, dec!(67.23));
    }

    #[test]
    fn midpoint_tax_rounds_away_from_zero() {
        let config = PricingConfig {
            free_shipping_threshold: dec!(100),
            flat_shipping_fee: dec!(10),
            tax_rate: dec!(0.15),
        };
        let engine = PricingEngine::new(config);
        // 12.30 × 0.15 = 1.845 — a true midpoint, must round up to 1.85.
        let snapshot = snapshot(vec![product(1, dec!(12.30), 5)]);

        let quote = engine.quote(&[line(1, 1)], &snapshot).unwrap();

        assert_eq!(quote.tax_price, dec!(1.85));
        assert_eq!(quote.total_price, dec!(24.15));
    }

    #[test]
    fn client_supplied_price_is_ignored() {
        let engine = PricingEngine::new(test_config());
        let snapshot = snapshot(vec![product(1, dec!(20.00), 3)]);

        let mut tampered = line(1, 2);
        tampered.price = Some(dec!(0.01));

        let honest = engine.quote(&[line(1, 2)], &snapshot).unwrap();
        let quoted = engine.quote(&[tampered], &snapshot).unwrap();

        assert_eq!(honest, quoted);
        assert_eq!(quoted.total_price, dec!(48.20));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let engine = PricingEngine::new(test_config());
        let snapshot = HashMap::new();

        let err = engine.quote(&[], &snapshot).unwrap_err();

        assert!(matches!(err, ServiceError::EmptyCart));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let engine = PricingEngine::new(test_config());
        let snapshot = snapshot(vec![product(1, dec!(20.00), 3)]);

        let err = engine.quote(&[line(1, 0)], &snapshot).unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InvalidQuantity {
                product_id: 1,
                quantity: 0
            }
        ));
    }

    #[test]
    fn missing_product_is_unavailable() {
        let engine = PricingEngine::new(test_config());
        let snapshot = snapshot(vec![product(1, dec!(20.00), 3)]);

        let err = engine.quote(&[line(2, 1)], &snapshot).unwrap_err();

        assert!(matches!(
            err,
            ServiceError::ProductUnavailable { product_id: 2 }
        ));
    }
}

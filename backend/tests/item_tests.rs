//! Item catalog tests
//!
//! Tests for item status derivation, SKU validation, and stock value math.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{derive_status, validate_price, validate_sku, ItemStatus};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Status derivation boundaries around the low-stock threshold
    #[test]
    fn test_status_boundaries() {
        let threshold = 10;

        assert_eq!(derive_status(0, threshold), ItemStatus::OutOfStock);
        assert_eq!(derive_status(1, threshold), ItemStatus::LowStock);
        assert_eq!(derive_status(10, threshold), ItemStatus::LowStock);
        assert_eq!(derive_status(11, threshold), ItemStatus::InStock);
    }

    /// Serialized status strings match the database CHECK constraint
    #[test]
    fn test_status_wire_format() {
        let statuses = [
            ItemStatus::InStock,
            ItemStatus::LowStock,
            ItemStatus::OutOfStock,
            ItemStatus::Discontinued,
        ];

        for status in statuses {
            let s = status.as_str();
            assert!(s.chars().all(|c| c.is_lowercase() || c == '_'));
        }
    }

    #[test]
    fn test_sku_validation() {
        assert!(validate_sku("WIDGET-42").is_ok());
        assert!(validate_sku("a1").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"X".repeat(33)).is_err());
    }

    #[test]
    fn test_price_validation() {
        assert!(validate_price(dec("19.99")).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(dec("-0.01")).is_err());
    }

    /// Stock value is price times units
    #[test]
    fn test_stock_value_calculation() {
        let price = dec("12.50");
        let stock = Decimal::from(40);

        assert_eq!(price * stock, dec("500.0"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Exactly one status is derived for any stock level
    #[test]
    fn prop_status_total(stock in -1000i32..10_000, threshold in 0i32..500) {
        let status = derive_status(stock, threshold);

        let expected = if stock <= 0 {
            ItemStatus::OutOfStock
        } else if stock <= threshold {
            ItemStatus::LowStock
        } else {
            ItemStatus::InStock
        };

        prop_assert_eq!(status, expected);
    }

    /// Derived status never comes back as discontinued
    #[test]
    fn prop_derived_status_never_discontinued(stock in -100i32..1000, threshold in 0i32..100) {
        prop_assert_ne!(derive_status(stock, threshold), ItemStatus::Discontinued);
    }
}

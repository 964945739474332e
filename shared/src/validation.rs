//! Validation utilities for the Stockpile inventory platform

use rust_decimal::Decimal;

use crate::models::HistoryPoint;

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate SKU format (3-32 chars, alphanumeric plus dash/underscore)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 3 {
        return Err("SKU must be at least 3 characters");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("SKU must be alphanumeric with optional dashes or underscores");
    }
    Ok(())
}

/// Validate a price or cost is non-negative
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a ledger slice is strictly ascending by date with no duplicates
pub fn validate_ledger_order(history: &[HistoryPoint]) -> Result<(), &'static str> {
    for pair in history.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err("Ledger dates must be strictly increasing");
        }
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate phone number (7-15 digits, optional leading +)
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.strip_prefix('+').unwrap_or(phone);
    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    if digits.len() < 7 || digits.len() > 15 {
        return Err("Phone number must contain 7 to 15 digits");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == ' ' || c == '(' || c == ')')
    {
        return Err("Phone number contains invalid characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("SKU-001").is_ok());
        assert!(validate_sku("ab").is_err());
        assert!(validate_sku("bad sku").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::from(10)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ops@stockpile.io").is_ok());
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+1-202-555-0145").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_ledger_order() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let ordered = vec![
            HistoryPoint { date: d(1), stock_level: 10, sales: 1 },
            HistoryPoint { date: d(2), stock_level: 9, sales: 1 },
        ];
        let duplicated = vec![
            HistoryPoint { date: d(1), stock_level: 10, sales: 1 },
            HistoryPoint { date: d(1), stock_level: 9, sales: 1 },
        ];

        assert!(validate_ledger_order(&ordered).is_ok());
        assert!(validate_ledger_order(&duplicated).is_err());
    }
}

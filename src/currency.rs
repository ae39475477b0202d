//! # Currency Module
//!
//! Formatting and parsing of currency amounts.

use lazy_static::lazy_static;
use regex::Regex;

use crate::costing_errors::CostingError;

/// Symbol used when none is configured
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

// Optional sign on either side of an optional symbol, digits with optional
// thousands separators, optional decimals (a bare trailing point is allowed)
const PRICE_PATTERN: &str =
    r"^\s*([+-])?\s*[$€£]?\s*([+-])?\s*(\d{1,3}(?:,\d{3})+|\d*)(\.\d*)?\s*$";

lazy_static! {
    static ref PRICE_REGEX: Regex =
        Regex::new(PRICE_PATTERN).expect("Price pattern should be valid");
}

/// Format an amount with two decimals after the given symbol (e.g., "$1.56")
pub fn format_currency(value: f64, symbol: &str) -> String {
    format!("{symbol}{value:.2}")
}

/// Format an amount with the default "$" symbol
pub fn to_currency(value: f64) -> String {
    format_currency(value, DEFAULT_CURRENCY_SYMBOL)
}

/// Parse a price typed by a user
///
/// Accepts plain numbers and amounts decorated with a currency symbol,
/// surrounding whitespace or thousands separators. The sign may come before
/// or after the symbol, so everything [`format_currency`] writes parses back.
///
/// # Examples
///
/// ```rust
/// use food_cost::currency::parse_price;
///
/// assert_eq!(parse_price("$2.00")?, 2.0);
/// assert_eq!(parse_price(" 1,250.50 ")?, 1250.5);
/// # Ok::<(), food_cost::costing_errors::CostingError>(())
/// ```
pub fn parse_price(raw: &str) -> Result<f64, CostingError> {
    let invalid = || CostingError::InvalidPrice(raw.to_string());

    let captures = PRICE_REGEX.captures(raw).ok_or_else(invalid)?;
    let sign = match (captures.get(1), captures.get(2)) {
        (Some(_), Some(_)) => return Err(invalid()),
        (Some(sign), None) | (None, Some(sign)) => sign.as_str(),
        (None, None) => "+",
    };
    let whole = captures.get(3).map_or("", |m| m.as_str()).replace(',', "");
    let fraction = captures
        .get(4)
        .map_or("", |m| m.as_str())
        .trim_start_matches('.');
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }

    let whole = if whole.is_empty() { "0" } else { whole.as_str() };
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    let digits = format!("{whole}.{fraction}");
    let value: f64 = digits.parse().map_err(|_| invalid())?;

    Ok(if sign == "-" { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_currency_two_decimals() {
        assert_eq!(to_currency(1.5625), "$1.56");
        assert_eq!(to_currency(0.0), "$0.00");
        assert_eq!(to_currency(3.5), "$3.50");
        assert_eq!(to_currency(1234.567), "$1234.57");
    }

    #[test]
    fn test_format_currency_custom_symbol() {
        assert_eq!(format_currency(0.77, "€"), "€0.77");
    }

    #[test]
    fn test_parse_price_variants() {
        assert_eq!(parse_price("2").unwrap(), 2.0);
        assert_eq!(parse_price("$2.00").unwrap(), 2.0);
        assert_eq!(parse_price("  $ 3.25 ").unwrap(), 3.25);
        assert_eq!(parse_price(".75").unwrap(), 0.75);
        assert_eq!(parse_price("$1,250.00").unwrap(), 1250.0);
        assert_eq!(parse_price("-$4.10").unwrap(), -4.1);
        assert_eq!(parse_price("$-4.10").unwrap(), -4.1);
        assert_eq!(parse_price("+2").unwrap(), 2.0);
        assert_eq!(parse_price("$+2").unwrap(), 2.0);
        assert_eq!(parse_price("2.").unwrap(), 2.0);
        assert_eq!(parse_price("-.5").unwrap(), -0.5);
    }

    #[test]
    fn test_formatted_amounts_parse_back() {
        for value in [0.0, 1.56, 2.0, 0.77, 1234.57, -4.1, -0.05, -1250.0] {
            assert_eq!(parse_price(&to_currency(value)).unwrap(), value, "{value}");
            assert_eq!(parse_price(&format_currency(value, "€")).unwrap(), value, "{value}");
        }
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price("").is_err());
        assert!(parse_price("$").is_err());
        assert!(parse_price("two dollars").is_err());
        assert!(parse_price("1,25").is_err());
        assert!(parse_price(".").is_err());
        assert!(parse_price("-$-4").is_err());
        assert!(parse_price("+-2").is_err());
        assert!(matches!(parse_price("abc"), Err(CostingError::InvalidPrice(_))));
    }
}

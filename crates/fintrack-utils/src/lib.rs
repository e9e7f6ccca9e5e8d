//! Utility functions and helpers

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Format an integer string with a thousands separator
pub fn format_number<T: ToString>(n: T, separator: &str) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// How an amount is rendered for display
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyStyle<'a> {
    pub symbol: &'a str,
    pub thousands_separator: &'a str,
    pub decimal_separator: &'a str,
    pub decimal_places: u32,
    pub symbol_before: bool,
}

impl Default for CurrencyStyle<'_> {
    fn default() -> Self {
        Self {
            symbol: "Rp",
            thousands_separator: ".",
            decimal_separator: ",",
            decimal_places: 0,
            symbol_before: true,
        }
    }
}

/// Format a monetary amount, e.g. `Rp 1.250.000`
pub fn format_currency(amount: &Decimal, style: &CurrencyStyle<'_>) -> String {
    let rounded = amount.round_dp(style.decimal_places);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let integer = abs.trunc();
    let mut body = format_number(integer, style.thousands_separator);

    if style.decimal_places > 0 {
        let fraction = (abs - integer).round_dp(style.decimal_places);
        let scaled = fraction * Decimal::from(10u64.pow(style.decimal_places));
        let digits = scaled.trunc().to_string();
        body.push_str(style.decimal_separator);
        body.push_str(&format!(
            "{:0>width$}",
            digits,
            width = style.decimal_places as usize
        ));
    }

    let sign = if negative { "-" } else { "" };
    if style.symbol_before {
        format!("{}{} {}", sign, style.symbol, body)
    } else {
        format!("{}{} {}", sign, body, style.symbol)
    }
}

/// Parse free-form amount input ("Rp 1.500.000") by keeping digits only
pub fn parse_amount_input(input: &str) -> Option<Decimal> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Decimal::from_str(&digits).ok()
}

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID
pub fn generate_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", now, seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0, ","), "0");
        assert_eq!(format_number(999, ","), "999");
        assert_eq!(format_number(1000, ","), "1,000");
        assert_eq!(format_number(1234567, "."), "1.234.567");
        assert_eq!(format_number(-1500, ","), "-1,500");
    }

    #[test]
    fn test_format_currency_default_style() {
        let amount = Decimal::from(1_250_000);
        assert_eq!(format_currency(&amount, &CurrencyStyle::default()), "Rp 1.250.000");
    }

    #[test]
    fn test_format_currency_with_decimals() {
        let style = CurrencyStyle {
            symbol: "$",
            thousands_separator: ",",
            decimal_separator: ".",
            decimal_places: 2,
            symbol_before: true,
        };
        assert_eq!(format_currency(&Decimal::new(123405, 2), &style), "$ 1,234.05");
        assert_eq!(format_currency(&Decimal::new(-50, 1), &style), "-$ 5.00");
    }

    #[test]
    fn test_format_currency_symbol_after() {
        let style = CurrencyStyle {
            symbol: "EUR",
            symbol_before: false,
            ..CurrencyStyle::default()
        };
        assert_eq!(format_currency(&Decimal::from(2500), &style), "2.500 EUR");
    }

    #[test]
    fn test_parse_amount_input() {
        assert_eq!(parse_amount_input("Rp 1.500.000"), Some(Decimal::from(1_500_000)));
        assert_eq!(parse_amount_input("42"), Some(Decimal::from(42)));
        assert_eq!(parse_amount_input("abc"), None);
        assert_eq!(parse_amount_input(""), None);
    }

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }
}

// Text-to-value parsing for rendered storefront text
//
// Prices, quantities and header counters are read as text. None of these
// functions fail: absent or unparsable text yields "" or zero, so presence
// checks can call them speculatively.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Trims text content; `None` (element without text) becomes `""`.
pub fn clean_text(text: Option<String>) -> String {
    text.map(|t| t.trim().to_string()).unwrap_or_default()
}

/// Parses a bracketed counter such as the header's `(3)`.
///
/// Brackets and whitespace are stripped; anything else yields `0`.
pub fn parse_counter(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, '(' | ')') && !c.is_whitespace())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parses a quantity input value.
pub fn parse_quantity(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// Parses a rendered price such as `" 49.00 "` or `"$1,200.00"`.
///
/// Currency symbols and thousands separators are dropped. Text that is not
/// a number ("Calculated during checkout") yields [`Decimal::ZERO`].
pub fn parse_price(text: &str) -> Decimal {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',') && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

/// Formats a money amount the way the storefront renders it (two decimals).
pub fn format_price(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

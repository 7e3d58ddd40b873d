//! Common parsing helpers for exchange responses.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses an optional decimal string; blank or unparseable values are None.
pub fn parse_optional_decimal(value: Option<&str>) -> Option<Decimal> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Decimal::from_str(value).ok()
}

/// Returns true for market statuses that accept orders. A missing status is
/// treated as tradeable.
pub fn is_tradeable_status(status: Option<&str>) -> bool {
    match status {
        None => true,
        Some(s) => s.eq_ignore_ascii_case("trading"),
    }
}

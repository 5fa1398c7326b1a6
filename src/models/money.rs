//! Money normalization at the data-model boundary.
//!
//! Cabin prices and booking totals reach us either as JSON numbers or as
//! currency-formatted strings such as `"$1,250.00"`. Everything is turned
//! into a `Decimal` once, on deserialization, so no call site has to parse.

use std::str::FromStr;

use rust_decimal::prelude::*;
use serde_json::Value;

/// Currency code used for every amount this service reports.
pub const CURRENCY: &str = "USD";

/// Parse a currency-formatted string.
///
/// Currency symbols, whitespace and thousands separators are ignored. A
/// minus before the first digit (`"-$50"`, `"$-50"`) makes it negative.
/// Returns `None` when no number remains (e.g. `"$abc"`).
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let negative = raw
        .chars()
        .take_while(|c| !c.is_ascii_digit() && *c != '.')
        .any(|c| c == '-');
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let amount = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -amount } else { amount })
}

/// Normalize a JSON value holding an amount, defaulting to zero.
pub fn normalize_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .unwrap_or(Decimal::ZERO)
        }
        Value::String(s) => parse_money(s).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Format an amount with exactly two decimal places (half away from zero).
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Serde adapter: read a number-or-string amount, write a JSON number.
pub mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .map(super::normalize_amount)
            .unwrap_or(Decimal::ZERO))
    }

    pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(amount, serializer)
    }
}

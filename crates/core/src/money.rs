//! Lenient numeric input and money display.
//!
//! Quantities and prices arrive as free text from forms and as loosely typed
//! JSON from older stored records. Malformed values are coerced to zero rather
//! than rejected; values keep full `f64` precision and are only rounded to two
//! decimals when formatted for display.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Currency symbol used for every displayed amount.
pub const CURRENCY_SYMBOL: &str = "€";

/// Parse user-entered text as an amount; anything non-numeric becomes `0.0`.
pub fn coerce_amount(raw: &str) -> f64 {
    finite_or_zero(raw.trim().parse::<f64>().unwrap_or(0.0))
}

/// Clamp to `>= 0`, mapping NaN/infinity to zero.
pub fn non_negative(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Coerce an arbitrary JSON value into an amount.
pub fn amount_from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => finite_or_zero(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => coerce_amount(s),
        _ => 0.0,
    }
}

/// `#[serde(deserialize_with = "lenient_amount")]` for `f64` fields that may hold
/// strings, nulls or garbage in stored data.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_json(&value))
}

/// Optional variant for form input: `null`, missing and blank text are `None`,
/// anything else is coerced like [`lenient_amount`].
pub fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(amount_from_json(&v)),
    })
}

/// Format an amount with exactly two decimals and the currency symbol.
pub fn format_money(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{:.2}", finite_or_zero(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "lenient_amount", default)]
        qty: f64,
    }

    #[test]
    fn coerce_amount_parses_numbers_and_zeroes_garbage() {
        assert_eq!(coerce_amount("12.5"), 12.5);
        assert_eq!(coerce_amount("  3 "), 3.0);
        assert_eq!(coerce_amount("abc"), 0.0);
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("NaN"), 0.0);
        assert_eq!(coerce_amount("inf"), 0.0);
    }

    #[test]
    fn non_negative_clamps() {
        assert_eq!(non_negative(-4.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(2.25), 2.25);
    }

    #[test]
    fn lenient_amount_accepts_loose_json() {
        let rows: Vec<Row> =
            serde_json::from_str(r#"[{"qty":2},{"qty":"3.5"},{"qty":null},{"qty":"x"},{"qty":true},{}]"#)
                .unwrap();
        let qtys: Vec<f64> = rows.iter().map(|r| r.qty).collect();
        assert_eq!(qtys, vec![2.0, 3.5, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn optional_amount_treats_blank_as_absent() {
        #[derive(Debug, Deserialize)]
        struct Form {
            #[serde(deserialize_with = "optional_amount", default)]
            price: Option<f64>,
        }

        let parse = |raw: &str| serde_json::from_str::<Form>(raw).unwrap().price;
        assert_eq!(parse(r#"{"price":"12.50"}"#), Some(12.5));
        assert_eq!(parse(r#"{"price":7}"#), Some(7.0));
        assert_eq!(parse(r#"{"price":""}"#), None);
        assert_eq!(parse(r#"{"price":null}"#), None);
        assert_eq!(parse("{}"), None);
    }

    #[test]
    fn format_money_uses_two_decimals() {
        assert_eq!(format_money(150.0), "€150.00");
        assert_eq!(format_money(-12.5), "€-12.50");
        assert_eq!(format_money(0.1 + 0.2), "€0.30");
    }

    proptest! {
        #[test]
        fn coerce_amount_never_yields_non_finite(raw in ".*") {
            prop_assert!(coerce_amount(&raw).is_finite());
        }
    }
}

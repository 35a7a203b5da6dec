// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Lenient coercion of untyped JSON scalars.

use serde_json::Value;

/// Numeric reading of a JSON value. Anything that cannot be read as a finite number is 0.
///
/// Numeric strings (surrounding whitespace allowed) and booleans are accepted.
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// `Some` number for any non-null value, `None` when the value is absent.
pub fn present_number(value: Option<&Value>) -> Option<f64> {
    value.filter(|v| !v.is_null()).map(to_number)
}

/// Text reading of a JSON value: strings verbatim, everything else as compact JSON.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keep at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!(3.5)), 3.5);
        assert_eq!(to_number(&json!(" 42 ")), 42.0);
        assert_eq!(to_number(&json!("1e3")), 1000.0);
        assert_eq!(to_number(&json!("abc")), 0.0);
        assert_eq!(to_number(&json!("inf")), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!([1])), 0.0);
        assert_eq!(to_number(&json!(null)), 0.0);
    }

    #[test]
    fn test_present_number() {
        assert_eq!(present_number(None), None);
        assert_eq!(present_number(Some(&json!(null))), None);
        assert_eq!(present_number(Some(&json!("x"))), Some(0.0));
        assert_eq!(present_number(Some(&json!(-2))), Some(-2.0));
    }

    #[test]
    fn test_display_and_truncate() {
        assert_eq!(to_display_string(&json!("heat pumps")), "heat pumps");
        assert_eq!(to_display_string(&json!(12)), "12");
        assert_eq!(to_display_string(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(truncate_chars("žluťoučký", 4), "žluť");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}

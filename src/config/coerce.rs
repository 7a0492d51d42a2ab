//! Scalar coercion with fallback to a default.
//!
//! Every coercer passes already-typed values through untouched, so the same
//! call works for text sources (the process environment) and typed ones.

use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::{is_boolean, is_number};
use super::{ParseError, Value};

static DECIMAL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(\d+(\.\d*)?|\.\d+)").expect("valid decimal regex"));

/// Coerces a value to a boolean.
///
/// Text must read `true` or `false` (case-insensitive). Anything else yields
/// `default`, or an error when no default is given.
pub fn parse_boolean(value: &Value, default: Option<bool>) -> Result<bool, ParseError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if is_boolean(value) => Ok(s.trim().eq_ignore_ascii_case("true")),
        _ => default.ok_or_else(|| ParseError::NotBoolean {
            value: value.to_string(),
        }),
    }
}

/// Coerces a value to a number.
///
/// `_` separators are removed before parsing. A `0x` prefix is accepted but
/// not read as hexadecimal: only the leading decimal digits count, so
/// `"0x88"` parses as `0`.
pub fn parse_number(value: &Value, default: Option<f64>) -> Result<f64, ParseError> {
    let parsed = match value {
        Value::Number(n) => return Ok(*n),
        Value::String(s) if is_number(value) => leading_decimal(&s.replace('_', "")),
        _ => None,
    };

    parsed.or(default).ok_or_else(|| ParseError::NotNumber {
        value: value.to_string(),
    })
}

fn leading_decimal(s: &str) -> Option<f64> {
    DECIMAL_PREFIX_RE
        .find(s.trim())
        .and_then(|m| m.as_str().parse().ok())
}

/// Infers the scalar type of a value: boolean first, then number, then
/// trimmed text.
///
/// Never fails. Empty text and non-scalar values yield `default`, or
/// [`Value::Null`] when there is none.
pub fn parse_auto(value: &Value, default: Option<Value>) -> Value {
    if is_boolean(value) {
        if let Ok(b) = parse_boolean(value, None) {
            return Value::Bool(b);
        }
    }
    if is_number(value) {
        if let Ok(n) = parse_number(value, None) {
            return Value::Number(n);
        }
    }

    match value {
        Value::String(s) if !s.trim().is_empty() => Value::String(s.trim().to_string()),
        _ => default.unwrap_or_default(),
    }
}

/// Converts a value to its textual form. Only `Null` falls back to `default`.
pub fn parse_string(value: &Value, default: Option<String>) -> String {
    match value {
        Value::Null => default.unwrap_or_default(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn test_parse_boolean() {
        assert!(parse_boolean(&Value::Bool(true), None).unwrap());
        assert!(!parse_boolean(&Value::Bool(false), None).unwrap());
        assert!(parse_boolean(&text("true"), None).unwrap());
        assert!(!parse_boolean(&text("false"), None).unwrap());
        assert!(parse_boolean(&text("TrUe"), None).unwrap());
        assert!(!parse_boolean(&text("FaLSe"), None).unwrap());
        assert!(parse_boolean(&text("  TrUe    "), None).unwrap());
        assert!(!parse_boolean(&text("    FaLSe "), None).unwrap());
    }

    #[test]
    fn test_parse_boolean_default() {
        assert!(parse_boolean(&text("10_000"), Some(true)).unwrap());
        assert!(!parse_boolean(&text("10_000"), Some(false)).unwrap());
        assert!(parse_boolean(&text("another string"), Some(true)).unwrap());
        assert!(parse_boolean(&Value::Array(vec![]), Some(true)).unwrap());
        assert!(parse_boolean(&Value::Null, Some(true)).unwrap());
    }

    #[test]
    fn test_parse_boolean_errors() {
        assert!(parse_boolean(&text(""), None).is_err());
        assert!(parse_boolean(&Value::Number(10_000.35), None).is_err());
        assert!(parse_boolean(&Value::Array(vec![]), None).is_err());
        assert_eq!(
            parse_boolean(&Value::Number(89.0), None),
            Err(ParseError::NotBoolean {
                value: "89".into()
            })
        );
        assert_eq!(
            parse_boolean(&text("another string"), None),
            Err(ParseError::NotBoolean {
                value: "another string".into()
            })
        );
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(&Value::Number(10_000.35), None).unwrap(), 10_000.35);
        assert_eq!(parse_number(&text("10_000.35"), None).unwrap(), 10_000.35);
        assert_eq!(parse_number(&text("  10_000.35  "), None).unwrap(), 10_000.35);
        assert_eq!(parse_number(&text("-7"), None).unwrap(), -7.0);
        assert_eq!(parse_number(&text("-16_000.40"), None).unwrap(), -16_000.40);
    }

    #[test]
    fn test_parse_number_hex_reads_leading_zero() {
        assert_eq!(parse_number(&text("0x88"), None).unwrap(), 0.0);
    }

    #[test]
    fn test_parse_number_default() {
        for value in [text("false"), text("true"), text("another string"), Value::Array(vec![])] {
            assert_eq!(parse_number(&value, Some(11_000.35)).unwrap(), 11_000.35);
        }
        assert_eq!(parse_number(&text("not a number"), Some(5.0)).unwrap(), 5.0);
    }

    #[test]
    fn test_parse_number_errors() {
        assert!(parse_number(&text(""), None).is_err());
        assert!(parse_number(&Value::Bool(true), None).is_err());
        assert!(parse_number(&Value::Array(vec![]), None).is_err());
        assert_eq!(
            parse_number(&text("not a number"), None),
            Err(ParseError::NotNumber {
                value: "not a number".into()
            })
        );
    }

    #[test]
    fn test_parse_auto() {
        assert_eq!(parse_auto(&text(" true "), None), Value::Bool(true));
        assert_eq!(parse_auto(&text(" FalSE "), None), Value::Bool(false));
        assert_eq!(parse_auto(&Value::Bool(true), None), Value::Bool(true));
        assert_eq!(parse_auto(&text("10"), None), Value::Number(10.0));
        assert_eq!(parse_auto(&text("10_000.35"), None), Value::Number(10_000.35));
        assert_eq!(parse_auto(&Value::Number(10_000.35), None), Value::Number(10_000.35));
        assert_eq!(parse_auto(&text("hello"), None), text("hello"));
        assert_eq!(parse_auto(&text("  padded value "), None), text("padded value"));
    }

    #[test]
    fn test_parse_auto_default() {
        let fallback = || Some(text("fallback"));
        assert_eq!(parse_auto(&text("0"), fallback()), Value::Number(0.0));
        assert_eq!(parse_auto(&text(" FalSE "), fallback()), Value::Bool(false));
        assert_eq!(parse_auto(&text(""), fallback()), text("fallback"));
        assert_eq!(parse_auto(&text("   "), fallback()), text("fallback"));
        assert_eq!(parse_auto(&Value::Null, fallback()), text("fallback"));
        assert_eq!(parse_auto(&text(""), None), Value::Null);
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_string(&text(" as is "), None), " as is ");
        assert_eq!(parse_string(&Value::Number(8.0), None), "8");
        assert_eq!(parse_string(&Value::Bool(true), None), "true");
        assert_eq!(parse_string(&Value::Null, Some("none".into())), "none");
        assert_eq!(parse_string(&Value::Null, None), "");
    }

    proptest! {
        #[test]
        fn prop_boolean_words_parse_case_insensitively(
            word in "[tT][rR][uU][eE]|[fF][aA][lL][sS][eE]",
            pad in "[ \t]{0,3}",
        ) {
            let expected = word.eq_ignore_ascii_case("true");
            let value = text(&format!("{pad}{word}{pad}"));
            prop_assert_eq!(parse_boolean(&value, None), Ok(expected));
        }

        #[test]
        fn prop_native_values_pass_through(n in any::<f64>().prop_filter("not NaN", |n| !n.is_nan()), b in any::<bool>()) {
            prop_assert_eq!(parse_number(&Value::Number(n), None), Ok(n));
            prop_assert_eq!(parse_boolean(&Value::Bool(b), None), Ok(b));
            prop_assert_eq!(parse_auto(&Value::Number(n), None), Value::Number(n));
            prop_assert_eq!(parse_auto(&Value::Bool(b), None), Value::Bool(b));
        }

        #[test]
        fn prop_integers_with_separators_parse(n in 0u32..10_000_000) {
            let grouped = n
                .to_string()
                .as_bytes()
                .rchunks(3)
                .rev()
                .map(|chunk| std::str::from_utf8(chunk).unwrap())
                .collect::<Vec<_>>()
                .join("_");
            prop_assert_eq!(parse_number(&text(&grouped), None), Ok(n as f64));
        }
    }
}

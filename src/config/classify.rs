//! Predicates deciding whether a raw value can be read as a given scalar type.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Value;

static BOOLEAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(true|false)\s*$").expect("valid boolean regex"));

// `0x` is accepted syntactically but the digits are still read as decimal.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-?(0x)?(\d[\d_]*|[\d_]*\.\d[\d_]*)\s*$").expect("valid number regex")
});

/// Returns `true` for native booleans and for text reading `true` or `false`
/// (case-insensitive, surrounding whitespace ignored).
pub fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) => BOOLEAN_RE.is_match(s),
        _ => false,
    }
}

/// Returns `true` for native numbers and for decimal text, optionally negative,
/// with `_` digit separators.
///
/// Octal (`0o`) and binary (`0b`) literals are never recognized in text.
pub fn is_number(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => NUMBER_RE.is_match(s),
        _ => false,
    }
}

pub fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

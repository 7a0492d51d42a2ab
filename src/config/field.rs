//! Field declarations and per-source field resolution.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::coerce::{parse_auto, parse_boolean, parse_number, parse_string};
use super::source::ConfigSource;
use super::{ConfigError, ParseError, Value};

static DEFAULT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;]+").expect("valid separator regex"));

/// Scalar type a field coerces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarKind {
    /// Inferred at parse time: boolean, then number, then string.
    #[default]
    Auto,
    Boolean,
    Number,
    String,
}

impl ScalarKind {
    fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Auto => "auto",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Number => "number",
            ScalarKind::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a field: a scalar kind, optionally as an array.
///
/// Spelled `auto`, `boolean`, `number`, `string`, with a `[]` suffix for arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldType {
    pub kind: ScalarKind,
    pub is_array: bool,
}

impl FieldType {
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self {
            kind,
            is_array: false,
        }
    }

    pub const fn array(kind: ScalarKind) -> Self {
        Self {
            kind,
            is_array: true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl FromStr for FieldType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, is_array) = match s.strip_suffix("[]") {
            Some(name) => (name, true),
            None => (s, false),
        };
        let kind = match name {
            "auto" => ScalarKind::Auto,
            "boolean" => ScalarKind::Boolean,
            "number" => ScalarKind::Number,
            "string" => ScalarKind::String,
            _ => return Err(ConfigError::InvalidFieldType(s.to_string())),
        };
        Ok(Self { kind, is_array })
    }
}

impl TryFrom<String> for FieldType {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.to_string()
    }
}

/// How text is split into array items.
#[derive(Debug, Clone)]
pub enum Separator {
    /// Splits on an exact string. An empty string splits into single characters.
    Literal(String),
    Pattern(Regex),
}

impl Separator {
    /// Compiles a regex separator.
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Separator::Pattern(Regex::new(pattern)?))
    }

    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Separator::Literal(sep) if sep.is_empty() => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
            Separator::Literal(sep) => text.split(sep.as_str()).collect(),
            Separator::Pattern(re) => re.split(text).collect(),
        }
    }
}

impl Default for Separator {
    /// One or more `,` or `;`.
    fn default() -> Self {
        Separator::Pattern(Regex::clone(&DEFAULT_SEPARATOR))
    }
}

impl From<&str> for Separator {
    fn from(sep: &str) -> Self {
        Separator::Literal(sep.to_string())
    }
}

impl From<Regex> for Separator {
    fn from(re: Regex) -> Self {
        Separator::Pattern(re)
    }
}

/// Declaration of one configuration field.
///
/// ```
/// use dragon_env::FieldSpec;
///
/// let pool = FieldSpec::number("DATABASE_CONNECTION_POOL").default_value(10);
/// let hosts = FieldSpec::new("ALLOWED_HOSTS").of_type("string[]".parse()?);
/// # Ok::<(), dragon_env::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
    separator: Separator,
    default_value: Option<Value>,
}

impl FieldSpec {
    /// Declares an `auto` field looked up under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::default(),
            separator: Separator::default(),
            default_value: None,
        }
    }

    pub fn auto(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name).of_type(FieldType::scalar(ScalarKind::Boolean))
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name).of_type(FieldType::scalar(ScalarKind::Number))
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name).of_type(FieldType::scalar(ScalarKind::String))
    }

    pub fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Turns the field into an array of its current scalar kind.
    pub fn array(mut self) -> Self {
        self.field_type.is_array = true;
        self
    }

    /// Sets the item separator. Only used by array fields.
    pub fn separator(mut self, separator: impl Into<Separator>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn declared_default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    fn invalid_default(&self, value: &Value) -> ParseError {
        ParseError::InvalidDefault {
            value: value.to_string(),
            expected: self.field_type,
        }
    }

    fn default_bool(&self) -> Result<Option<bool>, ParseError> {
        self.default_value
            .as_ref()
            .map(|d| d.as_bool().ok_or_else(|| self.invalid_default(d)))
            .transpose()
    }

    fn default_number(&self) -> Result<Option<f64>, ParseError> {
        self.default_value
            .as_ref()
            .map(|d| d.as_f64().ok_or_else(|| self.invalid_default(d)))
            .transpose()
    }

    fn default_scalar(&self) -> Result<Option<Value>, ParseError> {
        match &self.default_value {
            Some(d) if !d.is_scalar() => Err(self.invalid_default(d)),
            other => Ok(other.clone()),
        }
    }
}

/// Resolves one field against one source.
///
/// Array fields never fail: unparseable items are dropped, and an empty result
/// is replaced by the field's default. Scalar fields fall back to the default
/// and fail only when there is none (strings never fail).
pub fn parse_config(field: &FieldSpec, source: &dyn ConfigSource) -> Result<Value, ParseError> {
    let raw = source.get(&field.name);
    let raw = raw.as_deref();

    if field.field_type.is_array {
        return Ok(resolve_array(field, raw));
    }

    match field.field_type.kind {
        ScalarKind::Auto => match raw.map(|value| parse_auto(value, None)) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Ok(field.default_scalar()?.unwrap_or_default()),
        },
        ScalarKind::Boolean => match raw.map(|value| parse_boolean(value, None)) {
            Some(Ok(b)) => Ok(Value::Bool(b)),
            Some(Err(err)) => field.default_bool()?.map(Value::Bool).ok_or(err),
            None => field.default_bool()?.map(Value::Bool).ok_or(ParseError::Missing {
                expected: ScalarKind::Boolean,
            }),
        },
        ScalarKind::Number => match raw.map(|value| parse_number(value, None)) {
            Some(Ok(n)) => Ok(Value::Number(n)),
            Some(Err(err)) => field.default_number()?.map(Value::Number).ok_or(err),
            None => field.default_number()?.map(Value::Number).ok_or(ParseError::Missing {
                expected: ScalarKind::Number,
            }),
        },
        ScalarKind::String => {
            let default = field.default_value.as_ref().map(Value::to_string);
            Ok(Value::String(parse_string(raw.unwrap_or(&Value::Null), default)))
        }
    }
}

fn resolve_array(field: &FieldSpec, raw: Option<&Value>) -> Value {
    let items: Vec<Value> = match raw {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(text)) => field
            .separator
            .split(text)
            .into_iter()
            .map(Value::from)
            .collect(),
        _ => Vec::new(),
    };

    let resolved: Vec<Value> = items
        .iter()
        .filter_map(|item| resolve_item(field.field_type.kind, item))
        .collect();

    if !resolved.is_empty() {
        return Value::Array(resolved);
    }

    match &field.default_value {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        Some(value) => Value::Array(vec![value.clone()]),
        None => Value::Array(Vec::new()),
    }
}

/// Coerces one array item, returning `None` when it should be dropped.
fn resolve_item(kind: ScalarKind, item: &Value) -> Option<Value> {
    let trimmed;
    let item = match item {
        Value::String(s) => {
            trimmed = Value::String(s.trim().to_string());
            &trimmed
        }
        other => other,
    };
    if matches!(item, Value::String(s) if s.is_empty()) {
        return None;
    }

    match kind {
        ScalarKind::Auto => Some(parse_auto(item, None)).filter(|v| !v.is_null()),
        ScalarKind::Boolean => parse_boolean(item, None).ok().map(Value::Bool),
        ScalarKind::Number => parse_number(item, None).ok().map(Value::Number),
        ScalarKind::String if item.is_scalar() => Some(Value::String(item.to_string())),
        ScalarKind::String => None,
    }
}

//! Process environment source.

use std::borrow::Cow;

use super::source::{ConfigSource, SourceMap};
use super::Value;

/// The process environment as a configuration source.
///
/// Every value is text. Variables holding non-unicode data are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    /// Looks up field names as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `<prefix><name>` for each field name.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Captures the current matching variables, with the prefix stripped.
    pub fn snapshot(&self) -> SourceMap {
        std::env::vars_os()
            .filter_map(|(key, value)| {
                let key = key.into_string().ok()?;
                let value = value.into_string().ok()?;
                let name = key.strip_prefix(&self.prefix)?;
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value))
            })
            .collect()
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<Cow<'_, Value>> {
        let var = format!("{}{}", self.prefix, key);
        std::env::var(var)
            .ok()
            .map(|value| Cow::Owned(Value::String(value)))
    }
}

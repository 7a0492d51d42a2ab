//! Source abstraction and the in-memory source.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Value};

/// A key-value lookup table supplying raw configuration values.
///
/// `get` distinguishes a missing key (`None`) from a key whose value is empty.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<Cow<'_, Value>>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// An in-memory source, typically built programmatically or deserialized
/// from any serde format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMap {
    values: BTreeMap<String, Value>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl ConfigSource for SourceMap {
    fn get(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.values.get(key).map(Cow::Borrowed)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SourceMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Converts a TOML table of scalars and arrays into a typed source.
///
/// Nested tables are rejected.
impl TryFrom<toml::Table> for SourceMap {
    type Error = ConfigError;

    fn try_from(table: toml::Table) -> Result<Self, Self::Error> {
        let values = table
            .into_iter()
            .map(|(key, value)| Ok((key, Value::try_from(value)?)))
            .collect::<Result<_, ConfigError>>()?;
        Ok(Self { values })
    }
}

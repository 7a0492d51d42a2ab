//! Schema loading across an ordered list of sources.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::env::EnvSource;
use super::field::parse_config;
use super::source::ConfigSource;
use super::{ConfigError, LoadError, Schema, Value};

/// Resolved configuration values keyed by schema output name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_array(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
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

    /// Deserializes the resolved values into `T`.
    ///
    /// Integral numbers deserialize into integer fields. `Null` values are
    /// left out, so they read as `None` in `Option` fields.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let table: toml::Table = self
            .values
            .iter()
            .filter_map(|(key, value)| Some((key.clone(), value.clone().into_toml()?)))
            .collect();
        toml::Value::Table(table)
            .try_into()
            .map_err(ConfigError::DeserializeError)
    }
}

/// Loads `schema` from `sources` into a fresh [`ResolvedConfig`].
///
/// See [`load_config_into`] for precedence and failure rules.
pub fn load_config(
    schema: &Schema,
    sources: &[&dyn ConfigSource],
) -> Result<ResolvedConfig, ConfigError> {
    let mut resolved = ResolvedConfig::new();
    load_config_into(schema, sources, &mut resolved)?;
    Ok(resolved)
}

/// Loads `schema` from the process environment.
pub fn load_env_config(schema: &Schema) -> Result<ResolvedConfig, ConfigError> {
    load_config(schema, &[&EnvSource::new()])
}

/// Loads `schema` from `sources`, merging into `target`.
///
/// An empty `sources` slice reads the process environment instead.
/// Sources are applied in order and later sources win. A source that does not
/// define a field's key is skipped once the field already holds a value,
/// including values left in `target` by an earlier call. Entries of `target`
/// outside the schema are left untouched.
///
/// Every field is resolved against every applicable source before failures are
/// reported; all of them come back together in [`ConfigError::Load`].
pub fn load_config_into<'a>(
    schema: &Schema,
    sources: &[&dyn ConfigSource],
    target: &'a mut ResolvedConfig,
) -> Result<&'a mut ResolvedConfig, ConfigError> {
    let env = EnvSource::new();
    let fallback: [&dyn ConfigSource; 1] = [&env];
    let sources = if sources.is_empty() { &fallback[..] } else { sources };
    let mut errors = Vec::new();

    for (key, field) in schema.iter() {
        let env_name = field.name();
        for (source_index, source) in sources.iter().enumerate() {
            if target.contains_key(key) && !source.contains_key(env_name) {
                tracing::debug!(key, env_name, source_index, "source does not define field, skipping");
                continue;
            }

            match parse_config(field, *source) {
                Ok(value) => {
                    tracing::debug!(key, env_name, source_index, "resolved config field");
                    target.insert(key, value);
                }
                Err(error) => {
                    tracing::warn!(key, env_name, source_index, %error, "failed to resolve config field");
                    errors.push(LoadError {
                        key: key.to_string(),
                        env_name: env_name.to_string(),
                        source_index,
                        error,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(target)
    } else {
        Err(ConfigError::Load(errors))
    }
}

//! Error types for coercion and loading.

use std::fmt;

use thiserror::Error;

use super::field::{FieldType, ScalarKind};

/// A raw value could not be coerced to the declared scalar type.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("the value \"{value}\" is not a boolean")]
    NotBoolean { value: String },

    #[error("the value \"{value}\" is not a number")]
    NotNumber { value: String },

    #[error("no value present and no default for a {expected} field")]
    Missing { expected: ScalarKind },

    #[error("default value \"{value}\" cannot be used for a {expected} field")]
    InvalidDefault { value: String, expected: FieldType },
}

/// One field that failed to resolve against one source.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{key} (env {env_name}, source #{source_index}): {error}")]
pub struct LoadError {
    /// Output key in the schema.
    pub key: String,
    /// Name looked up in the source.
    pub env_name: String,
    /// Position of the source in the ordered source list.
    pub source_index: usize,
    #[source]
    pub error: ParseError,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{}", LoadFailures(.0))]
    Load(Vec<LoadError>),

    #[error("invalid field type: {0}")]
    InvalidFieldType(String),

    #[error("invalid separator pattern: {0}")]
    InvalidSeparator(#[from] regex::Error),

    #[error("nested tables are not supported as configuration values")]
    NestedTable,

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
}

impl ConfigError {
    /// Returns the individual failures when this is an aggregated load error.
    pub fn load_errors(&self) -> &[LoadError] {
        match self {
            ConfigError::Load(errors) => errors,
            _ => &[],
        }
    }
}

struct LoadFailures<'a>(&'a [LoadError]);

impl fmt::Display for LoadFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load {} config field(s):", self.0.len())?;
        for error in self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

//! Builder entry point for layered loading.

use serde::de::DeserializeOwned;

use super::env::EnvSource;
use super::loader::{load_config, ResolvedConfig};
use super::source::ConfigSource;
use super::{ConfigError, FieldSpec, Schema};

/// Builder for loading typed configuration from layered sources.
///
/// Sources are applied in registration order, so later sources override
/// earlier ones for every key they define. With no source registered the
/// process environment is used.
///
/// ## Example
///
/// ```no_run
/// use dragon_env::{Config, FieldSpec, SourceMap};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MyConfig {
///     database_url: String,
///     connection_pool: u32,
///     allowed_hosts: Vec<String>,
/// }
///
/// let defaults = SourceMap::new().with("DATABASE_URL", "postgres://localhost/app");
///
/// let config: MyConfig = Config::builder()
///     .with_source(defaults)
///     .with_env()
///     .with_field("database_url", FieldSpec::string("DATABASE_URL"))
///     .with_field(
///         "connection_pool",
///         FieldSpec::number("DATABASE_CONNECTION_POOL").default_value(10),
///     )
///     .with_field("allowed_hosts", FieldSpec::string("ALLOWED_HOSTS").array())
///     .build()?;
/// # Ok::<(), dragon_env::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .load() or .build() is called"]
pub struct Config {
    schema: Schema,
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Declares a field resolved under the output name `key`.
    pub fn with_field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.schema.insert(key, spec);
        self
    }

    /// Declares every field of `schema`.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        for (key, spec) in schema.iter() {
            self.schema.insert(key, spec.clone());
        }
        self
    }

    /// Adds a source to the end of the source list.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Adds the process environment as a source.
    pub fn with_env(self) -> Self {
        self.with_source(EnvSource::new())
    }

    /// Adds the process environment, looking up `<prefix><name>` per field.
    pub fn with_prefixed_env(self, prefix: impl Into<String>) -> Self {
        self.with_source(EnvSource::with_prefix(prefix))
    }

    /// Resolves every declared field.
    pub fn load(self) -> Result<ResolvedConfig, ConfigError> {
        if self.sources.is_empty() {
            return load_config(&self.schema, &[&EnvSource::new()]);
        }
        let sources: Vec<&dyn ConfigSource> =
            self.sources.iter().map(|source| &**source).collect();
        load_config(&self.schema, &sources)
    }

    /// Resolves every declared field and deserializes the result into `T`.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        self.load()?.deserialize()
    }
}

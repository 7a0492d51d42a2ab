//! Typed configuration loading from key-value sources.

mod builder;
mod classify;
mod coerce;
mod env;
mod error;
mod field;
mod loader;
mod schema;
mod source;
mod value;

pub use builder::Config;
pub use classify::{is_boolean, is_number, is_string};
pub use coerce::{parse_auto, parse_boolean, parse_number, parse_string};
pub use env::EnvSource;
pub use error::{ConfigError, LoadError, ParseError};
pub use field::{parse_config, FieldSpec, FieldType, ScalarKind, Separator};
pub use loader::{load_config, load_config_into, load_env_config, ResolvedConfig};
pub use schema::Schema;
pub use source::{ConfigSource, SourceMap};
pub use value::Value;

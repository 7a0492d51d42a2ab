pub mod config;

pub use config::{
    load_config, load_config_into, load_env_config, parse_config, Config, ConfigError,
    ConfigSource, EnvSource, FieldSpec, FieldType, LoadError, ParseError, ResolvedConfig,
    ScalarKind, Schema, Separator, SourceMap, Value,
};

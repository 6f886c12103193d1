//! Shared configuration loader for nodeshape.
//!
//! `defaults/nodeshape.default.toml` is embedded into every build so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`NodeshapeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use nodeshape::SchemaOptions;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/nodeshape.default.toml");

/// Top-level configuration consumed by nodeshape applications.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeshapeConfig {
    pub schema: SchemaConfig,
    pub output: OutputConfig,
    pub treeviz: TreevizConfig,
}

/// Mirrors the knobs exposed by the schema generator.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    pub hidden_prefix: char,
    pub include_extras: bool,
}

impl From<&SchemaConfig> for SchemaOptions {
    fn from(config: &SchemaConfig) -> Self {
        SchemaOptions {
            hidden_prefix: config.hidden_prefix,
            include_extras: config.include_extras,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreevizConfig {
    pub show_linum: bool,
    pub show_ranges: bool,
}

impl TreevizConfig {
    /// Parameters in the form `to_treeviz_str_with_params` expects
    pub fn to_params(&self) -> HashMap<String, String> {
        HashMap::from([
            ("show-linum".to_string(), self.show_linum.to_string()),
            ("show-ranges".to_string(), self.show_ranges.to_string()),
        ])
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<NodeshapeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<NodeshapeConfig, ConfigError> {
    Loader::new().build()
}

//! Configuration loading for rstlex.
//!
//! `defaults/rstlex.default.toml` is embedded so that the documented defaults and the runtime
//! behavior stay in sync. Callers layer user files and single overrides on top through
//! [`Loader`] before deserializing into [`RstlexConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/rstlex.default.toml");

/// Top-level configuration consumed by the rstlex binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RstlexConfig {
    pub lexer: LexerOptions,
    pub output: OutputConfig,
    pub log: LogConfig,
}

/// Knobs of the lexer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerOptions {
    /// NFC-normalize item text
    pub normalize_text: bool,
    /// Minimum length of an adornment line that has no title to measure against
    pub min_adornment_length: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            normalize_text: true,
            min_adornment_length: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "yaml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

/// Builds an [`RstlexConfig`] from the embedded defaults plus whatever the caller layers on.
///
/// Later layers win: defaults, then files in the order they were added, then overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Adds a TOML file that must exist, such as the one named by `--config`.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Adds a TOML file that is skipped when it does not exist.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Sets one dotted key, e.g. `log.level` from `--log-level`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<RstlexConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone
pub fn load_defaults() -> Result<RstlexConfig, ConfigError> {
    Loader::new().build()
}

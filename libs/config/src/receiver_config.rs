//! Receiver Configuration Module
//!
//! Loads the receiver configuration from defaults, an optional TOML file and
//! environment variables, then applies command-line overrides on top.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::defaults::{
    DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_MAX_MESSAGE_SIZE, ENV_PREFIX, ENV_SEPARATOR,
    UNSET_PORT,
};
use eti_codec::ENVELOPE_HEADER_SIZE;

/// Main receiver configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ReceiverConfig {
    /// ZeroMQ publisher settings
    pub source: SourceConfig,

    /// Optional per-frame diagnostics
    pub diagnostics: DiagnosticsConfig,

    /// Behaviour on malformed messages
    pub errors: ErrorConfig,

    /// Destination of the ETI stream
    pub output: OutputConfig,

    pub logging: LoggingConfig,
}

/// ZeroMQ publisher settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub host: String,
    pub port: u16,
    /// Longer messages are truncated before parsing
    pub max_message_size: usize,
}

/// Diagnostics toggles
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Decode metadata and TIST of every frame and log its timing
    pub timestamps: bool,
    /// Check the FSYNC word of every frame; follows `timestamps` when unset
    pub frame_sync: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ErrorConfig {
    pub policy: ErrorPolicy,
}

/// What the receiver does with a message that fails to parse
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Drop the message, count it and keep receiving
    #[default]
    Skip,
    /// End the run with the error before anything of the message is written
    Abort,
}

/// Output settings
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Write frames here instead of stdout
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter, e.g. `info` or `eti_codec=debug,info`
    pub level: String,
}

/// Command-line values that take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timestamps: bool,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub log_level: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: UNSET_PORT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn frame_sync_enabled(&self) -> bool {
        self.frame_sync.unwrap_or(self.timestamps)
    }
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => bail!("unknown error policy '{}' (expected skip or abort)", other),
        }
    }
}

impl ReceiverConfig {
    /// Load configuration from an optional file with `ETI_RX_*` overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load configuration reading environment overrides under `prefix`
    pub fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading configuration file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Parse a TOML file directly, without environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply command-line values
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.source.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.source.port = port;
        }
        if overrides.timestamps {
            self.diagnostics.timestamps = true;
        }
        if let Some(path) = &overrides.output {
            self.output.path = Some(path.clone());
        }
        if overrides.strict {
            self.errors.policy = ErrorPolicy::Abort;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.host.trim().is_empty() {
            bail!("source.host must not be empty");
        }

        if self.source.port == UNSET_PORT {
            bail!("source.port must be set to a non-zero port");
        }

        if self.source.max_message_size < ENVELOPE_HEADER_SIZE {
            bail!(
                "source.max_message_size must be >= {} (envelope header size)",
                ENVELOPE_HEADER_SIZE
            );
        }

        Ok(())
    }

    /// ZeroMQ endpoint of the publisher
    pub fn endpoint(&self) -> String {
        format!("tcp://{}:{}", self.source.host, self.source.port)
    }
}

//! Bridge configuration
//!
//! Loaded from `.dotbridge.toml`. Every field has a default so an empty
//! file (or no file at all) yields a working configuration.

use crate::logging::{LogConfig, LogFormat, LogOutput};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::Level;

pub const CONFIG_FILE_NAME: &str = ".dotbridge.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub handles: HandleConfig,

    #[serde(default)]
    pub marshal: MarshalConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleConfig {
    /// Live handles allowed at once before construction fails
    #[serde(default = "default_max_live")]
    pub max_live: usize,

    #[serde(default)]
    pub double_release: DoubleReleasePolicy,
}

/// What the C ABI does when a handle is released a second time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoubleReleasePolicy {
    /// Return `DisposedHandle`
    #[default]
    Report,
    /// Treat as a no-op
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarshalConfig {
    #[serde(default = "default_max_string_bytes")]
    pub max_string_bytes: usize,

    #[serde(default = "default_max_sequence_len")]
    pub max_sequence_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub filter: Option<String>,

    /// Write daily-rolling log files here instead of stderr
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default = "default_false")]
    pub span_events: bool,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            max_live: default_max_live(),
            double_release: DoubleReleasePolicy::default(),
        }
    }
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            max_string_bytes: default_max_string_bytes(),
            max_sequence_len: default_max_sequence_len(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            filter: None,
            directory: None,
            span_events: false,
        }
    }
}

fn default_max_live() -> usize {
    1 << 20
}

fn default_max_string_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_max_sequence_len() -> usize {
    16 * 1024 * 1024
}

fn default_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Find `.dotbridge.toml` in the current directory or its parents
    pub fn discover() -> Self {
        let mut current = std::env::current_dir().ok();

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "ignoring config"),
                }
            }

            current = dir.parent().map(|p| p.to_path_buf());
        }

        Self::default()
    }

    fn validate(&self) -> Result<(), String> {
        if self.handles.max_live == 0 {
            return Err("handles.max_live must be at least 1".to_string());
        }
        parse_level(&self.logging.level)?;
        Ok(())
    }

    /// Logging setup described by the `[logging]` section
    pub fn log_config(&self) -> LogConfig {
        let level = parse_level(&self.logging.level).unwrap_or(Level::INFO);
        let output = match &self.logging.directory {
            Some(directory) => LogOutput::File {
                directory: directory.clone(),
                prefix: "dotbridge".to_string(),
            },
            None => LogOutput::Stderr,
        };

        let mut config = LogConfig::new()
            .with_level(level)
            .with_format(self.logging.format)
            .with_output(output)
            .with_span_events(self.logging.span_events);
        if let Some(filter) = &self.logging.filter {
            config = config.with_filter(filter.clone());
        }
        config
    }
}

fn parse_level(level: &str) -> Result<Level, String> {
    level
        .parse::<Level>()
        .map_err(|_| format!("Unknown log level '{}'", level))
}

static ACTIVE: Lazy<RwLock<BridgeConfig>> = Lazy::new(|| RwLock::new(BridgeConfig::default()));

/// Replace the process-wide configuration
pub fn install(config: BridgeConfig) {
    *ACTIVE.write() = config;
}

/// Snapshot of the process-wide configuration
pub fn settings() -> BridgeConfig {
    ACTIVE.read().clone()
}

pub(crate) fn with_settings<R>(f: impl FnOnce(&BridgeConfig) -> R) -> R {
    f(&ACTIVE.read())
}

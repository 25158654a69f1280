// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the admin simulator.

use std::path::PathBuf;
use std::str::FromStr;

use kong_admin_sdk::DEFAULT_PAGE_SIZE;

/// Largest list window the gateway serves.
pub const MAX_PAGE_SIZE: usize = 1000;

/// How `update` treats the `config` map of a plugin configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigUpdateMode {
    /// Supplied keys overwrite stored ones, sibling keys persist, and a
    /// `null` value removes the key.
    #[default]
    Merge,
    /// A non-empty supplied map replaces the stored map.
    Replace,
}

impl std::fmt::Display for ConfigUpdateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigUpdateMode::Merge => write!(f, "merge"),
            ConfigUpdateMode::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for ConfigUpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(ConfigUpdateMode::Merge),
            "replace" => Ok(ConfigUpdateMode::Replace),
            _ => Err(format!("Unknown config update mode: {}", s)),
        }
    }
}

/// Configuration for the KongAdminSimulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Delete dependents together with their owner (plugin configurations of a
    /// route; credentials and consumer-scoped plugin configurations of a consumer).
    pub cascade_deletes: bool,
    /// Treatment of plugin `config` maps on update.
    pub config_update: ConfigUpdateMode,
    /// Window size used by callers that do not pick one.
    pub default_window_size: usize,
    /// Largest accepted `size` for list calls.
    pub max_page_size: usize,
    /// JSON file replacing the built-in plugin schemas.
    pub plugin_schemas: Option<PathBuf>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            cascade_deletes: false,
            config_update: ConfigUpdateMode::Merge,
            default_window_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            plugin_schemas: None,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `KONG_SIMULATOR_CASCADE_DELETES`: Delete dependents with their owner (default: "false")
    /// - `KONG_SIMULATOR_CONFIG_UPDATE`: `merge` or `replace` (default: "merge")
    /// - `KONG_SIMULATOR_PAGE_SIZE`: Default list window size (default: 100)
    /// - `KONG_SIMULATOR_MAX_PAGE_SIZE`: Largest accepted list window (default: 1000)
    /// - `KONG_SIMULATOR_PLUGIN_SCHEMAS`: Path to a plugin schema JSON file (default: built-in set)
    pub fn from_env() -> Result<Self, ConfigError> {
        let cascade_deletes = parse_flag("KONG_SIMULATOR_CASCADE_DELETES", false)?;

        let config_update = match std::env::var("KONG_SIMULATOR_CONFIG_UPDATE") {
            Ok(value) => value
                .parse::<ConfigUpdateMode>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "KONG_SIMULATOR_CONFIG_UPDATE",
                    value,
                })?,
            Err(_) => ConfigUpdateMode::default(),
        };

        let default_window_size = parse_size("KONG_SIMULATOR_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let max_page_size = parse_size("KONG_SIMULATOR_MAX_PAGE_SIZE", MAX_PAGE_SIZE)?;

        let plugin_schemas = std::env::var("KONG_SIMULATOR_PLUGIN_SCHEMAS")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let config = Self {
            cascade_deletes,
            config_update,
            default_window_size,
            max_page_size,
            plugin_schemas,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_window_size == 0 || self.default_window_size > self.max_page_size {
            return Err(ConfigError::WindowSize {
                size: self.default_window_size,
                max: self.max_page_size,
            });
        }
        Ok(())
    }

    /// Enable or disable cascading deletes.
    pub fn with_cascade_deletes(mut self, cascade: bool) -> Self {
        self.cascade_deletes = cascade;
        self
    }

    /// Set the plugin config update mode.
    pub fn with_config_update(mut self, mode: ConfigUpdateMode) -> Self {
        self.config_update = mode;
        self
    }

    /// Set the default list window size.
    pub fn with_default_window_size(mut self, size: usize) -> Self {
        self.default_window_size = size;
        self
    }

    /// Set the largest accepted list window.
    pub fn with_max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    /// Load plugin schemas from a JSON file instead of the built-in set.
    pub fn with_plugin_schemas(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugin_schemas = Some(path.into());
        self
    }
}

fn parse_flag(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Ok(value) => match value.to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidValue { var, value }),
        },
        Err(_) => Ok(default),
    }
}

fn parse_size(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(var) {
        Ok(value) => match value.parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(ConfigError::InvalidValue { var, value }),
        },
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    /// The default list window does not fit within the largest accepted window.
    #[error("Default window size {size} must be between 1 and the max page size {max}")]
    WindowSize { size: usize, max: usize },

    /// The plugin schema file cannot be read or parsed.
    #[error("Invalid plugin schema file {path}: {reason}")]
    PluginSchemas { path: PathBuf, reason: String },
}

//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use super::source::ConfigSource;
use super::types::AppSettings;
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::parse_log_level;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use wireup_domain::error::{Error, Result};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// The file [`load`](Self::load) reads: the configured path, or the first
    /// default location that exists
    ///
    /// Loading does not log, since it runs before logging is initialized.
    /// Callers report the path with [`log_config_loaded`] once it is.
    ///
    /// [`log_config_loaded`]: crate::logging::log_config_loaded
    pub fn resolved_config_path(&self) -> Option<PathBuf> {
        match &self.config_path {
            Some(config_path) => Some(config_path.clone()),
            None => Self::find_default_config_path(),
        }
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default library settings under the `wireup` key
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `WIREUP__SERVICE__PORT`)
    pub fn load(&self) -> Result<ConfigSource> {
        let mut figment =
            Figment::new().merge(Serialized::default(SETTINGS_KEY, AppSettings::default()));

        if let Some(config_path) = self.resolved_config_path()
            && config_path.exists()
        {
            figment = figment.merge(Toml::file(config_path));
        }

        // Double underscore separates nested keys so single underscores survive in names
        let prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        Ok(ConfigSource::new(figment))
    }

    /// Save library settings to a TOML file under the `wireup` key
    pub fn save_to_file<P: AsRef<Path>>(&self, settings: &AppSettings, path: P) -> Result<()> {
        let document = BTreeMap::from([(SETTINGS_KEY, settings)]);
        let toml_string = toml::to_string_pretty(&document)
            .config_context("Failed to serialize settings to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context(format!(
            "Failed to write config file: {}",
            path.as_ref().display()
        ))?;

        Ok(())
    }

    /// Reload configuration from the same sources
    pub fn reload(&self) -> Result<ConfigSource> {
        self.load()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Decode and validate the library settings stored under the `wireup` key
pub fn load_settings(source: &ConfigSource) -> Result<AppSettings> {
    let mut settings = AppSettings::default();
    if source.contains(SETTINGS_KEY) {
        source.unmarshal_key(SETTINGS_KEY, &mut settings, &Default::default())?;
    }
    validate_settings(&settings)?;
    Ok(settings)
}

/// Validate library settings
fn validate_settings(settings: &AppSettings) -> Result<()> {
    parse_log_level(&settings.logging.level)?;

    if settings.lifecycle.start_timeout_ms == 0 {
        return Err(Error::configuration(
            "lifecycle.start_timeout_ms must be greater than 0",
        ));
    }
    if settings.lifecycle.stop_timeout_ms == 0 {
        return Err(Error::configuration(
            "lifecycle.stop_timeout_ms must be greater than 0",
        ));
    }

    Ok(())
}

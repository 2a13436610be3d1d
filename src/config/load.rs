use std::{
    env,
    path::{Path, PathBuf},
};

use snafu::prelude::*;

use super::schema::Settings;
use crate::error::{ConfigSnafu, Error, Result};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SUBRATE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and the resolved config file.
    pub fn load() -> Result<Self> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load settings from environment and an explicit (optional) config file.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SUBRATE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build().context(ConfigSnafu)?;
        let settings: Settings = cfg.try_deserialize().context(ConfigSnafu)?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Error::InvalidSettings {
            message: message.to_string(),
        };

        if self.server.url.trim().is_empty() {
            return Err(invalid("server.url must not be empty"));
        }
        if self.server.username.trim().is_empty() {
            return Err(invalid("server.username must not be empty"));
        }
        if self.library.normalized_extension().is_empty() {
            return Err(invalid("library.extension must not be empty"));
        }
        Ok(())
    }
}

/// Resolve the config path from `SUBRATE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SUBRATE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/subrate/config.toml`
/// or `~/.config/subrate/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("subrate").join("config.toml"))
}

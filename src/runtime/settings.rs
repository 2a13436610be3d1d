use std::path::Path;

use crate::config;
use crate::error::{Error, Result};

/// Load and validate settings. A broken or incomplete config stops the run.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<config::Settings> {
    let settings = match explicit_path {
        Some(path) if !path.is_file() => {
            return Err(Error::InvalidSettings {
                message: format!("config file {} does not exist", path.display()),
            });
        }
        Some(path) => config::Settings::load_from(Some(path))?,
        None => config::Settings::load()?,
    };
    settings.validate()?;
    Ok(settings)
}

// tcset (timecode setter for the resolve media pool)
// Copyright (C) 2025 Andrew Nissen

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TcsetConfig {
    /// Python 3 interpreter used to run the scripting bridge. Empty means
    /// auto-detect from the system path.
    #[serde(default)]
    pub python_path: String,
    /// Fallback location of the host's scripting module, tried only when
    /// the plain import fails. Empty means the platform default install
    /// path.
    #[serde(default)]
    pub scripting_module_path: String,
}

impl Default for TcsetConfig {
    fn default() -> Self {
        Self {
            python_path: String::new(),
            scripting_module_path: String::new(),
        }
    }
}

pub fn load_config() -> Result<TcsetConfig, confy::ConfyError> {
    if let Ok(config_path) = std::env::var("TCSET_CONFIG_PATH") {
        confy::load_path(&config_path)
    } else {
        confy::load("tcset", "config")
    }
}

pub fn load_config_or_default() -> TcsetConfig {
    load_config().unwrap_or_default()
}

pub fn store_config(config: &TcsetConfig) -> Result<(), confy::ConfyError> {
    if let Ok(config_path) = std::env::var("TCSET_CONFIG_PATH") {
        confy::store_path(&config_path, config)
    } else {
        confy::store("tcset", "config", config)
    }
}

pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
    if let Ok(config_path) = std::env::var("TCSET_CONFIG_PATH") {
        Ok(std::path::PathBuf::from(config_path))
    } else {
        confy::get_configuration_file_path("tcset", "config")
    }
}

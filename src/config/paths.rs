use crate::config::ConfigError;
use std::path::PathBuf;

pub const GLOBAL_STATE_DIR: &str = ".promptdeck";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const CONFIG_BACKUP_FILE_NAME: &str = "config.yaml.backup";

pub fn default_state_root() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(GLOBAL_STATE_DIR))
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_state_root()?.join(CONFIG_FILE_NAME))
}

pub mod error;
pub mod paths;
pub mod store;

pub use error::ConfigError;
pub use paths::{
    default_config_path, default_state_root, CONFIG_BACKUP_FILE_NAME, CONFIG_FILE_NAME,
    GLOBAL_STATE_DIR,
};
pub use store::ConfigStore;

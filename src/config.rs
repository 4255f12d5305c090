//! Runtime settings. Fixed in code: the program takes no config file,
//! environment variables or flags.

use std::path::PathBuf;

/// Where the database lives when nothing else is said.
pub const DEFAULT_DB_PATH: &str = "tesla_rent.db";

#[derive(Debug, Clone, PartialEq)]
pub struct RentalConfig {
    /// SQLite file holding all three tables
    pub db_path: PathBuf,
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: "warn".to_string(),
        }
    }
}

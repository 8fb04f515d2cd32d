use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use once_cell::sync::Lazy;

#[derive(Debug)]
pub struct Config {
    /// Directory holding the snapshot files and the audit log.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub bcrypt_cost: u32,
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

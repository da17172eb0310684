//! Configuration file support for faculty-scout.
//!
//! Files may be TOML, YAML or JSON; environment variables prefixed with
//! `FACULTY_SCOUT_` override them, with `__` separating nested keys.
//!
//! # Configuration File Format
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [scholar]
//! base_url = "https://scholar.google.com"
//! min_request_delay_ms = 1000
//! max_request_delay_ms = 3000
//!
//! [scholar.retry]
//! max_attempts = 3
//! initial_delay_ms = 2000
//! max_delay_ms = 30000
//! multiplier = 2.0
//! max_jitter_ms = 1000
//!
//! [semantic_scholar]
//! api_key = "your-api-key"
//! cache_ttl_secs = 1800
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```
//!
//! e.g. `FACULTY_SCOUT_SEMANTIC_SCHOLAR__CACHE_TTL_SECS=600`.

use std::path::{Path, PathBuf};

use super::Config;

/// File name searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "faculty-scout.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "FACULTY_SCOUT";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Locate a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("faculty-scout").join("config.toml"))
        .filter(|p| p.is_file())
}

use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const MIN_ENRICHMENT_TIMEOUT_SECS: u64 = 1;
const MAX_ENRICHMENT_TIMEOUT_SECS: u64 = 9;

/// Configuration for riffradar.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (RIFF_* prefix)
/// 3. Config file (~/.config/riffradar/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API key used to attach tutorials to recommendations.
    /// Enrichment is skipped when unset.
    ///
    /// Can be set via:
    /// - ENV: RIFF_YOUTUBE_API_KEY
    /// - Config: youtube_api_key = "..."
    #[serde(default)]
    pub youtube_api_key: Option<String>,

    /// Path to the SQLite song index.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: RIFF_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/riffradar/songs.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Path to the SQLite query cache. Follows `--db` when that is given.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Lifetime of cached query results, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Time budget for one tutorial lookup, in seconds. Clamped to 1..=9.
    #[serde(default = "default_enrichment_timeout_secs")]
    pub enrichment_timeout_secs: u64,

    /// Neighbors requested from the index when the caller gives no count.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Log level: trace, debug, info, warn, or error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Colour log output.
    #[serde(default = "default_log_coloured")]
    pub log_coloured: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            database_path: default_db_path(),
            cache_path: default_cache_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
            enrichment_timeout_secs: default_enrichment_timeout_secs(),
            max_results: default_max_results(),
            log_level: default_log_level(),
            log_coloured: default_log_coloured(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/riffradar/config.toml
    /// Reads environment variables with RIFF_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("riff");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        Ok(Self::load()?.with_database_path(db_path))
    }

    /// Point at another song index, with its query cache alongside it.
    ///
    /// `songs.db` gets `songs.cache.db`, so results cached for one
    /// catalog are never served for another.
    #[must_use]
    pub fn with_database_path(mut self, db_path: PathBuf) -> Self {
        self.cache_path = db_path.with_extension("cache.db");
        self.database_path = db_path;
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(
            self.enrichment_timeout_secs
                .clamp(MIN_ENRICHMENT_TIMEOUT_SECS, MAX_ENRICHMENT_TIMEOUT_SECS),
        )
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("riffradar")
}

/// Returns: ~/.local/share/riffradar/songs.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    data_dir().join("songs.db")
}

/// Returns: ~/.local/share/riffradar/cache.db (or platform equivalent)
fn default_cache_path() -> PathBuf {
    data_dir().join("cache.db")
}

const fn default_cache_ttl_secs() -> u64 {
    3600
}

const fn default_enrichment_timeout_secs() -> u64 {
    5
}

const fn default_max_results() -> usize {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_coloured() -> bool {
    true
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/riffradar/config.toml
/// - macOS: ~/Library/Application Support/riffradar/config.toml
/// - Windows: %APPDATA%\riffradar\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("riffradar")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# RiffRadar Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (RIFF_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# YouTube Data API key for tutorial lookups
# Recommendations are returned without tutorials when this is unset.
#
# Can also be set via:
# - Environment: RIFF_YOUTUBE_API_KEY=your-key-here
#youtube_api_key = "your-youtube-api-key-here"

# Path to the SQLite song index
#
# Can also be set via:
# - CLI: riffradar --db /custom/path.db recommend C G Am F
# - Environment: RIFF_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/songs.db"

# Path to the SQLite query cache
# With --db, the cache sits next to that database instead.
#cache_path = "/path/to/custom/cache.db"

# How long cached recommendations stay valid, in seconds
cache_ttl_secs = 3600

# Time budget for each tutorial lookup, in seconds (1 to 9)
enrichment_timeout_secs = 5

# Neighbors fetched per recommendation request
max_results = 50

# Logging
log_level = "info"
log_coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resilience::DEFAULT_MAX_CONCURRENT;

/// Configuration for nocturne.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (NOCT_* prefix)
/// 3. Config file (~/.config/nocturne/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the cached catalog (JSON record array).
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/catalog.json
    /// - ENV: NOCT_CATALOG_PATH
    /// - Default: ~/.cache/nocturne/catalog.json
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Path to the SQLite download ledger.
    ///
    /// - ENV: NOCT_DATABASE_PATH
    /// - Default: ~/.local/share/nocturne/nocturne.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Directory downloads land in when no explicit output is given.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Audio format requested from the extractor.
    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    /// The yt-dlp executable.
    #[serde(default = "default_yt_dlp_path")]
    pub yt_dlp_path: PathBuf,

    /// URLs serving JSON record arrays, used by `nocturne fetch`.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Maximum number of source requests in flight.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            database_path: default_db_path(),
            download_dir: default_download_dir(),
            audio_format: default_audio_format(),
            yt_dlp_path: default_yt_dlp_path(),
            sources: Vec::new(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/nocturne/config.toml
    /// Reads environment variables with NOCT_ prefix.
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

        let env_opts = env::Options::with_top_level("noct");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom catalog path.
    ///
    /// This is used when the --catalog CLI flag is provided.
    pub fn load_with_catalog_path(catalog_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.catalog_path = catalog_path;
        Ok(config)
    }
}

fn default_catalog_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nocturne")
        .join("catalog.json")
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nocturne")
        .join("nocturne.db")
}

fn default_download_dir() -> PathBuf {
    dirs::audio_dir().unwrap_or_else(std::env::temp_dir)
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_yt_dlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

const fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/nocturne/config.toml
/// - macOS: ~/Library/Application Support/nocturne/config.toml
/// - Windows: %APPDATA%\nocturne\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nocturne")
        .join("config.toml")
}

/// Keys accepted by `config get` / `config set`.
pub const KEYS: &[&str] = &[
    "catalog_path",
    "database_path",
    "download_dir",
    "audio_format",
    "yt_dlp_path",
    "max_concurrent_fetches",
];

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Nocturne Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (NOCT_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# URLs serving the catalog as a JSON array of records.
# `nocturne fetch` pulls every source and writes the catalog cache.
sources = []

# Maximum number of source requests in flight
#max_concurrent_fetches = 4

# Cached catalog
#
# Can also be set via:
# - CLI: nocturne --catalog /custom/catalog.json pick
# - Environment: NOCT_CATALOG_PATH=/custom/catalog.json
#catalog_path = "/path/to/catalog.json"

# Download ledger (records what was downloaded, and where)
#database_path = "/path/to/nocturne.db"

# Where `nocturne download` saves files when --output is not given
#download_dir = "/path/to/music"

# Audio format requested from yt-dlp
audio_format = "mp3"

# The yt-dlp executable
yt_dlp_path = "yt-dlp"
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

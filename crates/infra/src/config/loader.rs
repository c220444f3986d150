//! Configuration loader
//!
//! Loads the agent configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file if one is found (existing variables win)
//! 2. Reads the environment variables below
//! 3. If the required ones are missing, falls back to a config file
//! 4. Supports JSON and TOML config files
//!
//! ## Environment Variables
//! - `SERVER_URL`: Backend base URL (required)
//! - `API_KEY`: Backend credential (required)
//! - `COMPANY_ID`: Company identifier (optional, informational)
//! - `TALLY_URL`: Daemon endpoint (default `http://localhost:9000`)
//! - `TALLYBRIDGE_SYNC_INTERVAL`: Poll interval in seconds (default 60)
//!
//! ## File Locations
//! `.env` is probed next to the executable, then in the current directory.
//! Config files (`tallybridge.toml`, `tallybridge.json`) are probed in the
//! current directory, then next to the executable.

use std::path::{Path, PathBuf};

use tallybridge_core::ConfigProvider;
use tallybridge_domain::constants::DEFAULT_TALLY_URL;
use tallybridge_domain::{AgentConfig, BridgeError, Result};
use url::Url;

use crate::errors::InfraError;

const ENV_FILE: &str = ".env";
const CONFIG_FILE_STEM: &str = "tallybridge";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `BridgeError::Config` if configuration cannot be loaded from
/// either source or a value is invalid.
pub fn load() -> Result<AgentConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None).map_err(|file_err| {
                BridgeError::Config(format!("{e}; config file fallback failed: {file_err}"))
            })
        }
    }
}

/// Load the first `.env` file found, returning its path.
///
/// Variables already present in the process environment are not overridden.
pub fn load_dotenv() -> Option<PathBuf> {
    for path in probe_env_paths() {
        if !path.exists() {
            continue;
        }
        match dotenvy::from_path(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Loaded .env file");
                return Some(path);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to load .env file");
            }
        }
    }
    tracing::debug!("No .env file found");
    None
}

/// Load configuration from environment variables
///
/// All values are trimmed. `SERVER_URL` and `API_KEY` are required.
///
/// # Errors
/// Returns `BridgeError::Config` if required variables are missing or a
/// value is invalid.
pub fn load_from_env() -> Result<AgentConfig> {
    let server_url = env_var("SERVER_URL")?;
    let api_key = env_var("API_KEY")?;
    check_url("SERVER_URL", &server_url)?;

    let tally_url = env_opt("TALLY_URL").unwrap_or_else(|| DEFAULT_TALLY_URL.to_string());
    check_url("TALLY_URL", &tally_url)?;

    let mut config = AgentConfig::new(server_url, api_key).with_tally_url(tally_url);
    config.company_id = env_opt("COMPANY_ID");

    if let Some(interval) = env_opt("TALLYBRIDGE_SYNC_INTERVAL") {
        config.sync.interval_seconds = interval
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| BridgeError::Config(format!("Invalid sync interval: {interval}")))?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `BridgeError::Config` if the file is missing, unreadable, or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<AgentConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BridgeError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents =
        std::fs::read_to_string(&config_path).map_err(|e| BridgeError::from(InfraError::from(e)))?;

    let config = parse_config(&contents, &config_path)?;
    check_url("server_url", &config.server_url)?;
    check_url("tally_url", &config.tally_url)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AgentConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| BridgeError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BridgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// Returns the first existing candidate.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    for dir in [std::env::current_dir().ok(), exe_dir()].into_iter().flatten() {
        candidates.push(dir.join(format!("{CONFIG_FILE_STEM}.toml")));
        candidates.push(dir.join(format!("{CONFIG_FILE_STEM}.json")));
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Candidate `.env` locations in probe order.
fn probe_env_paths() -> Vec<PathBuf> {
    [exe_dir(), std::env::current_dir().ok()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(ENV_FILE))
        .collect()
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Get a required, non-empty environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| BridgeError::Config(format!("Missing required environment variable: {key}")))
}

/// Get an optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn check_url(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Ok(());
    }
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| BridgeError::Config(format!("Invalid URL for {key} '{value}': {e}")))
}

/// [`ConfigProvider`] backed by the process environment, `.env` files, and
/// config files.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    config_path: Option<PathBuf>,
    load_env_file: bool,
}

impl EnvConfigProvider {
    /// Provider that also loads `.env` files before reading the environment.
    pub fn new() -> Self {
        Self { config_path: None, load_env_file: true }
    }

    /// Use an explicit config file when the environment is incomplete.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_env_file(mut self, enabled: bool) -> Self {
        self.load_env_file = enabled;
        self
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn load(&self) -> Result<AgentConfig> {
        if self.load_env_file {
            load_dotenv();
        }

        let config = match &self.config_path {
            Some(path) => load_from_env().or_else(|_| load_from_file(Some(path.clone())))?,
            None => load()?,
        };

        tracing::info!(
            server_url = %config.server_url,
            api_key = %config.masked_api_key(),
            company_id = config.company_id.as_deref().unwrap_or_default(),
            tally_url = %config.tally_url,
            interval_seconds = config.sync.interval_seconds,
            "Configuration loaded"
        );
        Ok(config)
    }
}

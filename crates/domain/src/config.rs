//! Agent configuration snapshot
//!
//! A loaded [`AgentConfig`] is immutable. Reloading produces a new snapshot
//! which is picked up by the next sync cycle only.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MASTER_TIMEOUT_SECS, DEFAULT_STATUS_TIMEOUT_SECS,
    DEFAULT_SYNC_INTERVAL_SECS, DEFAULT_TALLY_URL, DEFAULT_VOUCHER_TIMEOUT_SECS,
};
use crate::errors::{BridgeError, Result};

/// Configuration consumed by one sync cycle.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the order-management backend.
    pub server_url: String,
    /// Credential sent with every webhook event.
    pub api_key: String,
    #[serde(default)]
    pub company_id: Option<String>,
    /// Accounting daemon endpoint.
    #[serde(default = "default_tally_url")]
    pub tally_url: String,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

/// Polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub interval_seconds: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self { interval_seconds: DEFAULT_SYNC_INTERVAL_SECS }
    }
}

/// Per-call timeout budgets, in seconds.
///
/// Master-data and status calls use short budgets so one slow daemon call
/// cannot stall a cycle; the voucher call gets more time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub fetch_secs: u64,
    pub status_secs: u64,
    pub master_secs: u64,
    pub voucher_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            fetch_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            status_secs: DEFAULT_STATUS_TIMEOUT_SECS,
            master_secs: DEFAULT_MASTER_TIMEOUT_SECS,
            voucher_secs: DEFAULT_VOUCHER_TIMEOUT_SECS,
        }
    }
}

impl TimeoutSettings {
    pub fn fetch(&self) -> Duration {
        Duration::from_secs(self.fetch_secs)
    }

    pub fn status(&self) -> Duration {
        Duration::from_secs(self.status_secs)
    }

    pub fn master(&self) -> Duration {
        Duration::from_secs(self.master_secs)
    }

    pub fn voucher(&self) -> Duration {
        Duration::from_secs(self.voucher_secs)
    }
}

fn default_tally_url() -> String {
    DEFAULT_TALLY_URL.to_string()
}

impl AgentConfig {
    /// Build a snapshot with default daemon URL, interval, and timeouts.
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
            company_id: None,
            tally_url: default_tally_url(),
            sync: SyncSettings::default(),
            timeouts: TimeoutSettings::default(),
        }
    }

    #[must_use]
    pub fn with_tally_url(mut self, tally_url: impl Into<String>) -> Self {
        self.tally_url = tally_url.into();
        self
    }

    /// Check that the settings required to run a cycle are present.
    ///
    /// # Errors
    /// Returns `BridgeError::Config` naming every missing setting.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.server_url.trim().is_empty() {
            missing.push("SERVER_URL");
        }
        if self.api_key.trim().is_empty() {
            missing.push("API_KEY");
        }
        if self.tally_url.trim().is_empty() {
            missing.push("TALLY_URL");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BridgeError::Config(format!(
                "missing required configuration: {}",
                missing.join(", ")
            )))
        }
    }

    /// Webhook endpoint derived from the backend base URL.
    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), crate::constants::WEBHOOK_PATH)
    }

    /// The credential with all but its outer characters masked.
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("server_url", &self.server_url)
            .field("api_key", &self.masked_api_key())
            .field("company_id", &self.company_id)
            .field("tally_url", &self.tally_url)
            .field("sync", &self.sync)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

/// Mask a secret for logging: keep two characters at each end.
///
/// Secrets of four characters or fewer are masked entirely.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 4))
}

//! Configuration port

use tallybridge_domain::{AgentConfig, Result};

/// Source of configuration snapshots.
///
/// Each call produces a fresh, immutable snapshot; callers decide when a new
/// snapshot takes effect.
pub trait ConfigProvider: Send + Sync {
    /// Load the current configuration.
    ///
    /// Implementations do not validate; see [`AgentConfig::validate`].
    fn load(&self) -> Result<AgentConfig>;
}

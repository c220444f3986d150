//! Agent context - wires the configuration provider, runner and scheduler

use std::sync::Arc;
use std::time::Duration;

use tallybridge_core::ConfigProvider;
use tallybridge_domain::constants::DEFAULT_SYNC_INTERVAL_SECS;
use tallybridge_infra::{
    CycleOutcome, EnvConfigProvider, SchedulerError, SyncCycleRunner, SyncScheduler,
    SyncSchedulerConfig,
};
use tracing::{info, warn};

/// Everything the agent needs for its lifetime.
pub struct AgentContext {
    pub runner: Arc<SyncCycleRunner>,
    pub scheduler: SyncScheduler,
    pub interval: Duration,
}

impl AgentContext {
    /// Build the context from the process environment and config files.
    ///
    /// A startup configuration failure is not fatal. The runner loads a fresh
    /// snapshot at the start of every cycle, so fixing `.env` while the agent
    /// runs is enough. The sync interval is read once here.
    pub fn new() -> Self {
        Self::with_provider(Arc::new(EnvConfigProvider::new()))
    }

    pub fn with_provider(provider: Arc<dyn ConfigProvider>) -> Self {
        let initial = match provider.load().and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(error = %err, "configuration incomplete at startup; will retry each cycle");
                None
            }
        };

        let interval = initial
            .as_ref()
            .map_or(DEFAULT_SYNC_INTERVAL_SECS, |config| config.sync.interval_seconds);
        let interval = Duration::from_secs(interval.max(1));

        let runner = Arc::new(SyncCycleRunner::new(provider));

        let scheduler =
            SyncScheduler::new(Arc::clone(&runner), SyncSchedulerConfig::with_interval(interval));

        Self { runner, scheduler, interval }
    }

    /// Run a single cycle outside the scheduler.
    pub async fn run_once(&self) -> CycleOutcome {
        self.runner.run_cycle().await
    }

    pub async fn start(&mut self) -> Result<(), SchedulerError> {
        info!(interval_secs = self.interval.as_secs(), "starting sync loop");
        self.scheduler.start().await
    }

    pub async fn shutdown(&mut self) -> Result<(), SchedulerError> {
        info!("shutdown called on AgentContext");
        if !self.scheduler.is_running() {
            return Ok(());
        }
        self.scheduler.stop().await
    }
}

impl Default for AgentContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tallybridge_domain::{AgentConfig, BridgeError, Result};

    use super::*;

    struct StaticProvider(Option<AgentConfig>);

    impl ConfigProvider for StaticProvider {
        fn load(&self) -> Result<AgentConfig> {
            self.0.clone().ok_or_else(|| BridgeError::Config("SERVER_URL missing".into()))
        }
    }

    #[test]
    fn interval_comes_from_startup_config() {
        let mut config = AgentConfig::new("http://orders.local", "key");
        config.sync.interval_seconds = 5;

        let context = AgentContext::with_provider(Arc::new(StaticProvider(Some(config))));
        assert_eq!(context.interval, Duration::from_secs(5));
    }

    #[test]
    fn missing_config_falls_back_to_default_interval() {
        let context = AgentContext::with_provider(Arc::new(StaticProvider(None)));
        assert_eq!(context.interval, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn once_without_config_aborts() {
        let context = AgentContext::with_provider(Arc::new(StaticProvider(None)));
        assert!(context.run_once().await.is_aborted());
    }

    #[tokio::test]
    async fn shutdown_before_start_is_a_no_op() {
        let mut context = AgentContext::with_provider(Arc::new(StaticProvider(None)));
        assert!(context.shutdown().await.is_ok());
    }
}

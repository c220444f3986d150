//! Cycle runner: configuration snapshot, overlap guard, per-cycle clients.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tallybridge_core::{ConfigProvider, CycleSummary, InvoiceSyncService};
use tallybridge_domain::{AgentConfig, BridgeError, Result};
use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};

use crate::backend::WebhookBackend;
use crate::http::HttpClient;
use crate::tally::TallyClient;

/// Result of a cycle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleSummary),
    /// Another cycle was still running.
    Skipped,
    /// Configuration or fetch failure; nothing was reported.
    Aborted(BridgeError),
}

impl CycleOutcome {
    pub fn summary(&self) -> Option<&CycleSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Skipped | Self::Aborted(_) => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

#[derive(Default)]
struct RunnerState {
    /// Snapshot used by the previous cycle.
    last_config: Option<AgentConfig>,
}

/// Runs complete sync cycles, never two at once.
///
/// Every cycle takes a fresh configuration snapshot while holding the cycle
/// lock, so changes are picked up at the next cycle and a cycle never
/// observes a half-updated configuration.
pub struct SyncCycleRunner {
    provider: Arc<dyn ConfigProvider>,
    state: Mutex<RunnerState>,
    cycles: AtomicU64,
}

impl SyncCycleRunner {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self { provider, state: Mutex::new(RunnerState::default()), cycles: AtomicU64::new(0) }
    }

    /// Run one cycle unless one is already in flight.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Ok(mut state) = self.state.try_lock() else {
            warn!("previous sync cycle still running, skipping");
            return CycleOutcome::Skipped;
        };

        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let span = info_span!("sync_cycle", cycle);

        async {
            let config = match self.cycle_config(&mut state) {
                Ok(config) => config,
                Err(err) => {
                    error!(error = %err, "sync cycle aborted: configuration invalid");
                    return CycleOutcome::Aborted(err);
                }
            };

            let service = match build_service(&config) {
                Ok(service) => service,
                Err(err) => {
                    error!(error = %err, "sync cycle aborted: could not build clients");
                    return CycleOutcome::Aborted(err);
                }
            };

            info!(webhook = %config.webhook_url(), tally_url = %config.tally_url, "sync cycle started");
            match service.run_cycle().await {
                Ok(summary) => CycleOutcome::Completed(summary),
                Err(err) => {
                    error!(kind = err.label(), error = %err, "sync cycle aborted: fetch failed");
                    CycleOutcome::Aborted(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Fresh snapshot for this cycle, reloading once if the first is invalid.
    fn cycle_config(&self, state: &mut RunnerState) -> Result<AgentConfig> {
        let config = match self.load_valid() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "configuration invalid, reloading");
                self.load_valid()?
            }
        };

        if state.last_config.as_ref().is_some_and(|last| *last != config) {
            info!(config = ?config, "configuration changed since previous cycle");
        }
        state.last_config = Some(config.clone());
        Ok(config)
    }

    fn load_valid(&self) -> Result<AgentConfig> {
        let config = self.provider.load()?;
        config.validate()?;
        Ok(config)
    }
}

/// Build the orchestrator and its clients from one snapshot.
fn build_service(config: &AgentConfig) -> Result<InvoiceSyncService> {
    let ceiling = config.timeouts.voucher().max(config.timeouts.fetch());
    let http = HttpClient::builder().timeout(ceiling).build()?;

    let backend = Arc::new(WebhookBackend::from_config(http.clone(), config));
    let gateway = Arc::new(TallyClient::from_config(http, config));
    Ok(InvoiceSyncService::new(backend, gateway))
}

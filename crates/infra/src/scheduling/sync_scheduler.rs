//! Sync scheduler for periodic invoice synchronization.
//!
//! Runs one cycle immediately on start, then one per interval. Ticks missed
//! while a cycle is still running are skipped rather than queued.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tallybridge_infra::config::EnvConfigProvider;
//! use tallybridge_infra::scheduling::{SyncScheduler, SyncSchedulerConfig};
//! use tallybridge_infra::sync::SyncCycleRunner;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = Arc::new(SyncCycleRunner::new(Arc::new(EnvConfigProvider::new())));
//! let mut scheduler = SyncScheduler::new(runner, SyncSchedulerConfig::default());
//!
//! scheduler.start().await?;
//! // ... agent runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tallybridge_domain::constants::DEFAULT_SYNC_INTERVAL_SECS;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};
use crate::sync::{CycleOutcome, SyncCycleRunner};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for sync scheduler
#[derive(Debug, Clone)]
pub struct SyncSchedulerConfig {
    /// Time between cycle starts
    pub interval: Duration,
    /// How long `stop` waits for an in-flight cycle
    pub join_timeout: Duration,
}

impl Default for SyncSchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            join_timeout: Duration::from_secs(35),
        }
    }
}

impl SyncSchedulerConfig {
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval, ..Self::default() }
    }
}

/// Sync scheduler for periodic invoice synchronization
pub struct SyncScheduler {
    runner: Arc<SyncCycleRunner>,
    config: SyncSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl SyncScheduler {
    pub fn new(runner: Arc<SyncCycleRunner>, config: SyncSchedulerConfig) -> Self {
        Self {
            runner,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs sync cycles periodically.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval_secs = self.config.interval.as_secs(), "Starting sync scheduler");

        // Fresh token so the scheduler can be restarted after stop
        self.cancellation_token = CancellationToken::new();

        let runner = Arc::clone(&self.runner);
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::sync_loop(runner, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Sync scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the background task and waits for an in-flight cycle to
    /// finish, up to the configured join timeout.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is not running or the task does not finish
    /// in time.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping sync scheduler");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.config.join_timeout;
            let abort = handle.abort_handle();
            match tokio::time::timeout(join_timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Err(SchedulerError::TaskJoinFailed(err.to_string())),
                Err(_) => {
                    abort.abort();
                    return Err(SchedulerError::Timeout { seconds: join_timeout.as_secs() });
                }
            }
        }

        info!("Sync scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Background sync loop
    async fn sync_loop(runner: Arc<SyncCycleRunner>, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Sync loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    match runner.run_cycle().await {
                        CycleOutcome::Completed(summary) => debug!(?summary, "Sync tick finished"),
                        CycleOutcome::Skipped => debug!("Sync tick skipped"),
                        CycleOutcome::Aborted(err) => {
                            warn!(error = %err, "Sync tick aborted; retrying next interval");
                        }
                    }
                }
            }
        }
    }
}

/// Ensure scheduler is stopped when dropped
impl Drop for SyncScheduler {
    fn drop(&mut self) {
        // Best-effort: the task handle cannot be awaited here
        if !self.cancellation_token.is_cancelled() {
            warn!("SyncScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}

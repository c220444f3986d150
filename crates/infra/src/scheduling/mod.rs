//! Scheduling infrastructure for automated sync cycles
//!
//! The scheduler follows explicit lifecycle rules:
//! - Explicit start/stop
//! - Join handle for the spawned loop
//! - Cancellation token support
//! - Join-with-timeout on stop

pub mod error;
pub mod sync_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use sync_scheduler::{SyncScheduler, SyncSchedulerConfig};

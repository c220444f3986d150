//! # TallyBridge Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client and error mapping
//! - Accounting daemon and backend webhook adapters
//! - Configuration loading (environment, `.env`, config files)
//! - Cycle runner and interval scheduler
//!
//! ## Architecture
//! - Implements traits defined in `tallybridge-core`
//! - Contains all "impure" code (network, filesystem, timers)

pub mod backend;
pub mod config;
pub mod errors;
pub mod http;
pub mod scheduling;
pub mod sync;
pub mod tally;

// Re-export commonly used items
pub use backend::WebhookBackend;
pub use config::EnvConfigProvider;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use scheduling::{SchedulerError, SyncScheduler, SyncSchedulerConfig};
pub use sync::{CycleOutcome, SyncCycleRunner};
pub use tally::TallyClient;

//! Sync cycle execution
//!
//! The runner owns the configuration snapshot and the overlap guard; the
//! scheduler in [`crate::scheduling`] decides when it runs.

pub mod runner;

pub use runner::{CycleOutcome, SyncCycleRunner};

//! # TallyBridge Domain
//!
//! Business domain types and models for TallyBridge.
//!
//! This crate contains:
//! - Invoice and line-item records as offered by the backend
//! - Sync status and webhook payloads
//! - Domain error types and Result definitions
//! - The agent configuration snapshot
//! - Domain constants (sentinels, fixed ledger names, defaults)
//!
//! ## Architecture
//! - No dependencies on other TallyBridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

//! Accounting daemon adapter

pub mod client;

pub use client::TallyClient;

//! Backend webhook adapter

pub mod client;

pub use client::WebhookBackend;

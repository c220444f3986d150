//! Error types used throughout the bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TallyBridge
///
/// Variants follow the failure taxonomy of a sync cycle: configuration,
/// transport, protocol, daemon line errors, invoice shape, document
/// serialization, and recovered runtime faults.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection, DNS, or timeout failure on an outbound call.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-OK HTTP status or an undecodable response body.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Error text embedded by the daemon in an otherwise successful response.
    #[error("Tally error: {0}")]
    Daemon(String),

    #[error("Invalid invoice: {0}")]
    InvalidInvoice(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Protocol(_) => "protocol",
            Self::Daemon(_) => "daemon",
            Self::InvalidInvoice(_) => "invalid_invoice",
            Self::Document(_) => "document",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(BridgeError::Config("x".into()).label(), "config");
        assert_eq!(BridgeError::Daemon("x".into()).label(), "daemon");
        assert_eq!(BridgeError::InvalidInvoice("x".into()).label(), "invalid_invoice");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(BridgeError::Network("refused".into())).unwrap();
        assert_eq!(json["type"], "Network");
        assert_eq!(json["message"], "refused");
    }
}

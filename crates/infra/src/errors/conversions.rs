//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use tallybridge_domain::BridgeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BridgeError);

impl From<InfraError> for BridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BridgeError> for InfraError {
    fn from(value: BridgeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBridgeError {
    fn into_bridge(self) -> BridgeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for HttpError {
    fn into_bridge(self) -> BridgeError {
        if self.is_timeout() {
            return BridgeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return BridgeError::Network(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            return BridgeError::Protocol(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        if self.is_decode() {
            return BridgeError::Protocol(format!("undecodable response body: {self}"));
        }

        if self.is_builder() {
            return BridgeError::Config(format!("invalid request: {self}"));
        }

        BridgeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for serde_json::Error {
    fn into_bridge(self) -> BridgeError {
        BridgeError::Protocol(format!("invalid JSON: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / toml::de::Error → BridgeError (configuration files) */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for std::io::Error {
    fn into_bridge(self) -> BridgeError {
        BridgeError::Config(format!("failed to read config file: {self}"))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_bridge())
    }
}

impl IntoBridgeError for toml::de::Error {
    fn into_bridge(self) -> BridgeError {
        BridgeError::Config(format!("invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

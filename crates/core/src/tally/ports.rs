//! Port interface for the accounting daemon

use async_trait::async_trait;
use tallybridge_domain::Result;

/// Class of import request; selects the per-request timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    Master,
    Voucher,
}

impl RequestClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Voucher => "voucher",
        }
    }
}

/// Transport to the daemon's import endpoint.
#[async_trait]
pub trait TallyGateway: Send + Sync {
    /// Post one document and return the raw response body.
    ///
    /// `entity` is a short description used in logs only. Transport failures
    /// and non-OK statuses are errors; line errors inside an OK body are not.
    async fn post_document(&self, document: &str, class: RequestClass, entity: &str)
        -> Result<String>;
}

//! Port to the storefront backend.
//!
//! Every endpoint answer is decoded once, at the network boundary, into the
//! exhaustive outcome types below. Wizards match on those enums instead of
//! probing response fields.
//!
//! - `wire` holds the JSON shapes and the decoders shared by HTTP adapters.
//! - `memory` is an in-process backend used by tests and offline runs.

pub mod memory;
pub mod wire;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::order::OrderRequest;
use crate::domain::warranty::{WarrantyPayload, WarrantyRecord, WarrantyStatus};

pub use memory::InMemoryStorefrontApi;

pub const WARRANTY_CHECK_PATH: &str = "/api/warranty/check";
pub const WARRANTY_VERIFY_PATH: &str = "/api/warranty/verify";
pub const ORDERS_PATH: &str = "/api/orders";
pub const WARRANTIES_PATH: &str = "/api/warranties";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("request could not be delivered: {0}")]
    Transport(String),
    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("response could not be decoded: {0}")]
    Decode(String),
    #[error("request was rejected: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Server-supplied text, when the failure carried any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Rejected(message) => Some(message.as_str()),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarrantyCheckOutcome {
    /// Record exists and is Active or Expired; the passcode step follows.
    PasscodeRequired { status: Option<WarrantyStatus> },
    NotFound,
    /// Record exists but coverage was never activated.
    Inactive { message: Option<String> },
    /// Record exists and needs a passcode but the server did not report success.
    Unavailable { message: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarrantyVerifyOutcome {
    Verified(WarrantyRecord),
    Rejected { message: Option<String> },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub order_id: Option<String>,
    pub message: Option<String>,
}

#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn check_warranty(&self, serial_number: &str)
        -> Result<WarrantyCheckOutcome, ApiError>;

    async fn verify_warranty(
        &self,
        serial_number: &str,
        passcode: &str,
    ) -> Result<WarrantyVerifyOutcome, ApiError>;

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError>;

    async fn list_warranties(&self) -> Result<Vec<WarrantyRecord>, ApiError>;

    async fn create_warranty(&self, payload: &WarrantyPayload) -> Result<(), ApiError>;

    async fn update_warranty(&self, id: &str, payload: &WarrantyPayload) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn server_message_is_exposed_only_for_server_failures() {
        let status = ApiError::Status { status: 503, message: Some("maintenance".to_string()) };
        assert_eq!(status.server_message(), Some("maintenance"));
        assert_eq!(ApiError::Rejected("nope".to_string()).server_message(), Some("nope"));
        assert_eq!(ApiError::Transport("reset".to_string()).server_message(), None);
        assert_eq!(ApiError::Decode("eof".to_string()).server_message(), None);
    }
}

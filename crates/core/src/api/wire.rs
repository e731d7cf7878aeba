//! JSON shapes exchanged with the storefront backend and the decoders that turn
//! a `(status, body)` pair into the typed outcomes of [`crate::api`].

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, OrderReceipt, WarrantyCheckOutcome, WarrantyVerifyOutcome};
use crate::domain::warranty::{WarrantyRecord, WarrantyStatus};

pub const DEFAULT_VERIFY_FAILURE: &str = "Invalid passcode. Please try again.";
pub const DEFAULT_SAVE_FAILURE: &str = "Failed to save warranty";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub serial_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub serial_number: String,
    pub passcode: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub found: Option<bool>,
    #[serde(default)]
    pub requires_passcode: Option<bool>,
    #[serde(default)]
    pub status: Option<WarrantyStatus>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub warranty: Option<WarrantyRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default, alias = "orderId", alias = "order_id")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyListResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub warranties: Vec<WarrantyRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decodes a body whose meaning does not depend on the HTTP status. A body
/// that cannot be read is blamed on the status when the status was an error.
fn decode_any_status<T: for<'de> Deserialize<'de>>(
    status: u16,
    body: &[u8],
) -> Result<T, ApiError> {
    decode_object(body).map_err(|error| {
        if is_success_status(status) {
            ApiError::Decode(error)
        } else {
            ApiError::Status { status, message: None }
        }
    })
}

fn decode_success_only<T: for<'de> Deserialize<'de>>(
    status: u16,
    body: &[u8],
) -> Result<T, ApiError> {
    if !is_success_status(status) {
        let message = serde_json::from_slice::<serde_json::Value>(body).ok().and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });
        return Err(ApiError::Status { status, message });
    }

    decode_object(body).map_err(ApiError::Decode)
}

/// Every backend answer is a JSON object. Derived struct decoding would also
/// accept a sequence, so the top-level shape is checked first.
fn decode_object<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T, String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|error| error.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|error| error.to_string())
}

pub fn decode_check(status: u16, body: &[u8]) -> Result<WarrantyCheckOutcome, ApiError> {
    let response: CheckResponse = decode_any_status(status, body)?;
    Ok(check_outcome(response))
}

pub fn check_outcome(response: CheckResponse) -> WarrantyCheckOutcome {
    let success = response.success.unwrap_or(false);
    let found = response.found.unwrap_or(false);
    let requires_passcode = response.requires_passcode.unwrap_or(false);

    if success && requires_passcode {
        WarrantyCheckOutcome::PasscodeRequired { status: response.status }
    } else if !found {
        WarrantyCheckOutcome::NotFound
    } else if !requires_passcode {
        WarrantyCheckOutcome::Inactive { message: response.message }
    } else {
        WarrantyCheckOutcome::Unavailable { message: response.message }
    }
}

pub fn decode_verify(status: u16, body: &[u8]) -> Result<WarrantyVerifyOutcome, ApiError> {
    let response: VerifyResponse = decode_any_status(status, body)?;
    verify_outcome(response)
}

pub fn verify_outcome(response: VerifyResponse) -> Result<WarrantyVerifyOutcome, ApiError> {
    if response.success.unwrap_or(false) {
        return response
            .warranty
            .map(WarrantyVerifyOutcome::Verified)
            .ok_or_else(|| ApiError::Decode("verify succeeded without a warranty record".into()));
    }

    Ok(WarrantyVerifyOutcome::Rejected {
        message: Some(response.message.unwrap_or_else(|| DEFAULT_VERIFY_FAILURE.to_string())),
    })
}

pub fn decode_order(status: u16, body: &[u8]) -> Result<OrderReceipt, ApiError> {
    let response: OrderResponse = decode_success_only(status, body)?;

    if response.success == Some(false) || response.ok == Some(false) {
        let reason = response
            .error
            .or(response.message)
            .unwrap_or_else(|| "order was not accepted".to_string());
        return Err(ApiError::Rejected(reason));
    }

    let order_id = response.id.and_then(|id| match id {
        serde_json::Value::String(id) => Some(id),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    });

    Ok(OrderReceipt { order_id, message: response.message })
}

pub fn decode_warranty_list(status: u16, body: &[u8]) -> Result<Vec<WarrantyRecord>, ApiError> {
    let response: WarrantyListResponse = decode_success_only(status, body)?;

    if response.success == Some(false) {
        return Err(ApiError::Rejected(
            response.error.unwrap_or_else(|| "Failed to load warranties".to_string()),
        ));
    }

    Ok(response.warranties)
}

/// Create and update share this shape. A non-2xx answer with a readable body
/// still surfaces the server's `error` text.
pub fn decode_save(status: u16, body: &[u8]) -> Result<(), ApiError> {
    let response: SaveResponse = decode_any_status(status, body)?;

    if response.success.unwrap_or(false) {
        return Ok(());
    }

    Err(ApiError::Rejected(response.error.unwrap_or_else(|| DEFAULT_SAVE_FAILURE.to_string())))
}

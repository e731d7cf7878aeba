pub mod catalog;
pub mod config;
pub mod doctor;
pub mod order;
pub mod warranties;
pub mod warranty;

use serde::Serialize;
use serde_json::Value;
use storefront_client::HttpStorefrontApi;
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_core::errors::{ErrorClass, InterfaceError};

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_VALIDATION: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;
pub const EXIT_TRANSIENT: u8 = 5;
pub const EXIT_UNEXPECTED: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with(command, message, Value::Null)
    }

    pub fn success_with(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).ok().filter(|value| !value.is_null());
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure whose class and exit code follow the error taxonomy.
    pub fn classified(command: &str, class: ErrorClass, message: impl Into<String>) -> Self {
        Self::failure(command, class.as_str(), message, exit_code_for(class))
    }

    pub fn interface(command: &str, error: &InterfaceError) -> Self {
        Self::classified(command, error.class(), error.message())
    }

    pub fn config_failure(command: &str, message: impl Into<String>) -> Self {
        Self::failure(command, "config_validation", message, EXIT_CONFIG)
    }
}

pub fn exit_code_for(class: ErrorClass) -> u8 {
    match class {
        ErrorClass::Validation => EXIT_VALIDATION,
        ErrorClass::NotFound => EXIT_NOT_FOUND,
        ErrorClass::Transient => EXIT_TRANSIENT,
        ErrorClass::Unexpected => EXIT_UNEXPECTED,
    }
}

/// Loads configuration and builds the HTTP backend for network commands.
pub(crate) fn connect(command: &str) -> Result<(AppConfig, HttpStorefrontApi), CommandResult> {
    let config = AppConfig::load(LoadOptions::default())
        .map_err(|error| CommandResult::config_failure(command, error.to_string()))?;
    let api = HttpStorefrontApi::from_config(&config.api)
        .map_err(|error| CommandResult::config_failure(command, error.to_string()))?;
    Ok((config, api))
}

pub(crate) fn runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    current_thread_runtime()
        .map_err(|message| CommandResult::classified(command, ErrorClass::Unexpected, message))
}

/// Sync commands drive the async backend on a current-thread runtime.
pub(crate) fn current_thread_runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| format!("failed to initialize async runtime: {error}"))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

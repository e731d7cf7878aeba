use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::domain::product::ProductId;
use crate::flows::FlowTransitionError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<FlowTransitionError> for ApplicationError {
    fn from(value: FlowTransitionError) -> Self {
        Self::Domain(DomainError::FlowTransition(value))
    }
}

/// How a failure is presented: field-scoped validation, a lookup miss, or a
/// retryable failure of the backend or of the response it sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Validation,
    NotFound,
    Transient,
    Unexpected,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Transient => "transient",
            Self::Unexpected => "unexpected",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::BadRequest { .. } => ErrorClass::Validation,
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::ServiceUnavailable { .. } => ErrorClass::Transient,
            Self::Internal { .. } => ErrorClass::Unexpected,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let unassigned = || "unassigned".to_owned();
        match value {
            ApplicationError::Domain(DomainError::UnknownProduct(id)) => Self::NotFound {
                message: format!("product {id} is not in the catalog"),
                correlation_id: unassigned(),
            },
            ApplicationError::Domain(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Api(ApiError::Status { status: 404, message }) => Self::NotFound {
                message: message.unwrap_or_else(|| "resource not found".to_owned()),
                correlation_id: unassigned(),
            },
            ApplicationError::Api(ApiError::Status { status, message })
                if (400..500).contains(&status) =>
            {
                Self::BadRequest {
                    message: message.unwrap_or_else(|| format!("server answered {status}")),
                    correlation_id: unassigned(),
                }
            }
            ApplicationError::Api(ApiError::Rejected(message)) => {
                Self::BadRequest { message, correlation_id: unassigned() }
            }
            ApplicationError::Api(error @ (ApiError::Transport(_) | ApiError::Status { .. })) => {
                let message = error.to_string();
                Self::ServiceUnavailable { message, correlation_id: unassigned() }
            }
            ApplicationError::Api(ApiError::Decode(message)) => {
                Self::Internal { message, correlation_id: unassigned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::ApiError;
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, DomainError, ErrorClass, InterfaceError};
    use crate::flows::{FlowTransitionError, FlowType};

    #[test]
    fn flow_error_maps_to_bad_request_interface_error() {
        let interface = ApplicationError::from(FlowTransitionError::RequestInFlight {
            flow: FlowType::Order,
        })
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.class(), ErrorClass::Validation);
    }

    #[test]
    fn bad_request_keeps_the_transition_detail() {
        let interface = ApplicationError::from(FlowTransitionError::InvalidTransition {
            flow: FlowType::Warranty,
            state: "Result".to_owned(),
            event: "CheckRequested".to_owned(),
        })
        .into_interface("req-2");

        assert_eq!(interface.class(), ErrorClass::Validation);
        assert!(interface.message().contains("Result"));
    }

    #[test]
    fn transport_and_server_errors_are_transient() {
        let transport = ApplicationError::from(ApiError::Transport("connection reset".to_owned()))
            .into_interface("req-3");
        assert!(matches!(transport, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(transport.message(), "request could not be delivered: connection reset");

        let server = ApplicationError::from(ApiError::Status { status: 503, message: None })
            .into_interface("req-3");
        assert_eq!(server.class(), ErrorClass::Transient);
    }

    #[test]
    fn lookups_and_rejections_keep_their_class() {
        let missing = ApplicationError::from(DomainError::UnknownProduct(ProductId(99)))
            .into_interface("req-4");
        assert_eq!(missing.class(), ErrorClass::NotFound);
        assert_eq!(missing.message(), "product 99 is not in the catalog");

        let gone = ApplicationError::from(ApiError::Status {
            status: 404,
            message: Some("Warranty not found".to_owned()),
        })
        .into_interface("req-4");
        assert_eq!(gone.class(), ErrorClass::NotFound);

        let rejected = ApplicationError::from(ApiError::Rejected("duplicate".to_owned()))
            .into_interface("req-4");
        assert_eq!(rejected.class(), ErrorClass::Validation);
    }

    #[test]
    fn decode_errors_are_unexpected() {
        let decode =
            ApplicationError::from(ApiError::Decode("eof".to_owned())).into_interface("req-5");
        assert!(matches!(decode, InterfaceError::Internal { .. }));
        assert_eq!(decode.class(), ErrorClass::Unexpected);
        assert_eq!(decode.class().as_str(), "unexpected");
    }
}

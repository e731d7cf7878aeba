use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowType {
    Order,
    Warranty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStep {
    Configuring,
    CollectingDetails,
    Reviewing,
    Confirmed,
}

impl OrderStep {
    /// One-based position shown in the wizard's progress indicator.
    pub fn number(&self) -> u8 {
        match self {
            Self::Configuring => 1,
            Self::CollectingDetails => 2,
            Self::Reviewing => 3,
            Self::Confirmed => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    ConfigurationChanged,
    Continue,
    DetailsEdited,
    ReviewRequested,
    Back,
    OrderAccepted,
    OrderFailed,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarrantyStep {
    AwaitingSerial,
    AwaitingPasscode,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarrantyEvent {
    SerialEdited,
    PasscodeRequired,
    LookupFailed,
    PasscodeEdited,
    PasscodeCancelled,
    VerificationFailed,
    Verified,
    Restart,
}

macro_rules! debug_display {
    ($($name:ty),+) => {
        $(impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        })+
    };
}

debug_display!(FlowType, OrderStep, OrderEvent, WarrantyStep, WarrantyEvent);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlowContext {
    pub missing_required_fields: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    RecomputePrice,
    ClearFieldError,
    PresentSummary,
    SetErrorMessage,
    ClearErrorMessage,
    ResetDraft,
    RotateSession,
    RememberStatus,
    ClearPasscode,
    ClearSerial,
    BuildReport,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome<S, E> {
    pub from: S,
    pub to: S,
    pub event: E,
    pub actions: Vec<FlowAction>,
}

use std::fmt;

use thiserror::Error;

use crate::flows::states::{
    FlowAction, FlowContext, FlowType, OrderEvent, OrderStep, TransitionOutcome, WarrantyEvent,
    WarrantyStep,
};

pub trait FlowDefinition {
    type State: Copy + fmt::Debug + fmt::Display;
    type Event: Copy + fmt::Debug + fmt::Display;

    fn flow_type(&self) -> FlowType;
    fn initial_state(&self) -> Self::State;
    fn transition(
        &self,
        current: &Self::State,
        event: &Self::Event,
        context: &FlowContext,
    ) -> Result<TransitionOutcome<Self::State, Self::Event>, FlowTransitionError>;
}

#[derive(Clone, Debug, Default)]
pub struct OrderFlow;

impl FlowDefinition for OrderFlow {
    type State = OrderStep;
    type Event = OrderEvent;

    fn flow_type(&self) -> FlowType {
        FlowType::Order
    }

    fn initial_state(&self) -> OrderStep {
        OrderStep::Configuring
    }

    fn transition(
        &self,
        current: &OrderStep,
        event: &OrderEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome<OrderStep, OrderEvent>, FlowTransitionError> {
        transition_order(current, event, context)
    }
}

#[derive(Clone, Debug, Default)]
pub struct WarrantyFlow;

impl FlowDefinition for WarrantyFlow {
    type State = WarrantyStep;
    type Event = WarrantyEvent;

    fn flow_type(&self) -> FlowType {
        FlowType::Warranty
    }

    fn initial_state(&self) -> WarrantyStep {
        WarrantyStep::AwaitingSerial
    }

    fn transition(
        &self,
        current: &WarrantyStep,
        event: &WarrantyEvent,
        _context: &FlowContext,
    ) -> Result<TransitionOutcome<WarrantyStep, WarrantyEvent>, FlowTransitionError> {
        transition_warranty(current, event)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow.flow_type()
    }

    pub fn initial_state(&self) -> F::State {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: &F::State,
        event: &F::Event,
        context: &FlowContext,
    ) -> Result<TransitionOutcome<F::State, F::Event>, FlowTransitionError> {
        let result = self.flow.transition(current, event, context);
        match &result {
            Ok(outcome) => tracing::debug!(
                event_name = "flow.transition_applied",
                flow = %self.flow_type(),
                from = %outcome.from,
                to = %outcome.to,
                trigger = %outcome.event,
                "flow transition applied"
            ),
            Err(error) => tracing::debug!(
                event_name = "flow.transition_rejected",
                flow = %self.flow_type(),
                error = %error,
                "flow transition rejected"
            ),
        }
        result
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("missing required fields before transition from {state}: {missing_fields:?}")]
    MissingRequiredFields { state: String, missing_fields: Vec<String> },
    #[error("invalid transition from {state} using event {event}")]
    InvalidTransition { flow: FlowType, state: String, event: String },
    #[error("a {flow} request is already in flight")]
    RequestInFlight { flow: FlowType },
}

impl FlowTransitionError {
    fn invalid<S: fmt::Display, E: fmt::Display>(flow: FlowType, state: &S, event: &E) -> Self {
        Self::InvalidTransition { flow, state: state.to_string(), event: event.to_string() }
    }
}

fn transition_order(
    current: &OrderStep,
    event: &OrderEvent,
    context: &FlowContext,
) -> Result<TransitionOutcome<OrderStep, OrderEvent>, FlowTransitionError> {
    use FlowAction::{
        ClearErrorMessage, ClearFieldError, PresentSummary, RecomputePrice, ResetDraft,
        RotateSession, SetErrorMessage,
    };
    use OrderEvent::{
        Back, ConfigurationChanged, Continue, DetailsEdited, OrderAccepted, OrderFailed,
        ReviewRequested, Reset,
    };
    use OrderStep::{CollectingDetails, Configuring, Confirmed, Reviewing};

    let (to, actions) = match (current, event) {
        (Configuring, ConfigurationChanged) => (Configuring, vec![RecomputePrice]),
        (Configuring, Continue) => (CollectingDetails, Vec::new()),
        (CollectingDetails, DetailsEdited) => (CollectingDetails, vec![ClearFieldError]),
        (CollectingDetails, ReviewRequested) => {
            if !context.missing_required_fields.is_empty() {
                return Err(FlowTransitionError::MissingRequiredFields {
                    state: current.to_string(),
                    missing_fields: context.missing_required_fields.clone(),
                });
            }
            (Reviewing, vec![PresentSummary])
        }
        (CollectingDetails, Back) => (Configuring, Vec::new()),
        (Reviewing, Back) => (CollectingDetails, vec![ClearErrorMessage]),
        (Reviewing, OrderAccepted) => (Confirmed, vec![ClearErrorMessage]),
        (Reviewing, OrderFailed) => (Reviewing, vec![SetErrorMessage]),
        (_, Reset) => (Configuring, vec![ResetDraft, RotateSession]),
        _ => return Err(FlowTransitionError::invalid(FlowType::Order, current, event)),
    };

    Ok(TransitionOutcome { from: *current, to, event: *event, actions })
}

fn transition_warranty(
    current: &WarrantyStep,
    event: &WarrantyEvent,
) -> Result<TransitionOutcome<WarrantyStep, WarrantyEvent>, FlowTransitionError> {
    use FlowAction::{
        BuildReport, ClearErrorMessage, ClearPasscode, ClearSerial, RememberStatus, RotateSession,
        SetErrorMessage,
    };
    use WarrantyEvent::{
        LookupFailed, PasscodeCancelled, PasscodeEdited, PasscodeRequired, Restart, SerialEdited,
        VerificationFailed, Verified,
    };
    use WarrantyStep::{AwaitingPasscode, AwaitingSerial};

    let (to, actions) = match (current, event) {
        (AwaitingSerial, SerialEdited) => (AwaitingSerial, vec![ClearErrorMessage]),
        (AwaitingSerial, PasscodeRequired) => {
            (AwaitingPasscode, vec![RememberStatus, ClearErrorMessage])
        }
        (AwaitingSerial, LookupFailed) => (AwaitingSerial, vec![SetErrorMessage]),
        (AwaitingPasscode, PasscodeEdited) => (AwaitingPasscode, vec![ClearErrorMessage]),
        (AwaitingPasscode, PasscodeCancelled) => {
            (AwaitingSerial, vec![ClearPasscode, ClearErrorMessage])
        }
        (AwaitingPasscode, VerificationFailed) => (AwaitingPasscode, vec![SetErrorMessage]),
        (AwaitingPasscode, Verified) => {
            (WarrantyStep::Result, vec![BuildReport, ClearErrorMessage])
        }
        (_, Restart) => (
            AwaitingSerial,
            vec![ClearSerial, ClearPasscode, ClearErrorMessage, RotateSession],
        ),
        _ => return Err(FlowTransitionError::invalid(FlowType::Warranty, current, event)),
    };

    Ok(TransitionOutcome { from: *current, to, event: *event, actions })
}

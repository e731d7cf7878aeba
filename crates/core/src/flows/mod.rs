pub mod engine;
pub mod order;
pub mod session;
pub mod states;
pub mod warranty;

pub use engine::{FlowDefinition, FlowEngine, FlowTransitionError, OrderFlow, WarrantyFlow};
pub use order::{OrderSubmission, OrderWizard, ORDER_FAILURE_MESSAGE};
pub use session::{RequestTicket, ResponseDisposition, SessionGuard};
pub use states::{
    FlowAction, FlowContext, FlowType, OrderEvent, OrderStep, TransitionOutcome, WarrantyEvent,
    WarrantyStep,
};
pub use warranty::{
    format_display_date, remaining_days, PasscodeVerification, WarrantyLookup, WarrantyReport,
    WarrantyWizard,
};

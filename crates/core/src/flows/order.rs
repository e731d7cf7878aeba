use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::{ApiError, OrderReceipt, StorefrontApi};
use crate::domain::order::{
    Color, CustomerDetails, CustomerField, OrderConfiguration, OrderRequest, RamSize, StorageSize,
};
use crate::domain::product::Product;
use crate::flows::engine::{FlowEngine, FlowTransitionError, OrderFlow};
use crate::flows::session::{RequestTicket, ResponseDisposition, SessionGuard};
use crate::flows::states::{FlowAction, FlowContext, FlowType, OrderEvent, OrderStep};
use crate::validation::{validate_customer, FieldErrors};

pub const ORDER_FAILURE_MESSAGE: &str = "An error occurred, please try again.";

/// An order request that has been handed to the backend and not yet answered.
#[derive(Debug)]
pub struct OrderSubmission {
    ticket: RequestTicket,
    request: OrderRequest,
}

impl OrderSubmission {
    pub fn request(&self) -> &OrderRequest {
        &self.request
    }

    pub fn session_id(&self) -> Uuid {
        self.ticket.session_id()
    }
}

/// Configure, collect details, review, confirm. One wizard per open order
/// dialog; closing it resets the draft.
#[derive(Debug)]
pub struct OrderWizard {
    engine: FlowEngine<OrderFlow>,
    step: OrderStep,
    product: Arc<Product>,
    configuration: OrderConfiguration,
    customer: CustomerDetails,
    field_errors: FieldErrors,
    error_message: Option<String>,
    receipt: Option<OrderReceipt>,
    guard: SessionGuard,
}

impl OrderWizard {
    pub fn new(product: Arc<Product>) -> Self {
        let engine = FlowEngine::new(OrderFlow);
        let step = engine.initial_state();
        let wizard = Self {
            engine,
            step,
            product,
            configuration: OrderConfiguration::default(),
            customer: CustomerDetails::default(),
            field_errors: FieldErrors::default(),
            error_message: None,
            receipt: None,
            guard: SessionGuard::new(),
        };
        tracing::info!(
            event_name = "order.session_opened",
            session_id = %wizard.guard.session_id(),
            product_id = %wizard.product.id,
            "order wizard opened"
        );
        wizard
    }

    pub fn step(&self) -> OrderStep {
        self.step
    }

    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn configuration(&self) -> OrderConfiguration {
        self.configuration
    }

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn receipt(&self) -> Option<&OrderReceipt> {
        self.receipt.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn session_id(&self) -> Uuid {
        self.guard.session_id()
    }

    pub fn final_price(&self) -> u32 {
        self.configuration.final_price(self.product.price)
    }

    pub fn select_color(&mut self, color: Color) -> Result<u32, FlowTransitionError> {
        self.reconfigure(|configuration| configuration.color = color)
    }

    pub fn select_ram(&mut self, ram: RamSize) -> Result<u32, FlowTransitionError> {
        self.reconfigure(|configuration| configuration.ram = ram)
    }

    pub fn select_storage(&mut self, storage: StorageSize) -> Result<u32, FlowTransitionError> {
        self.reconfigure(|configuration| configuration.storage = storage)
    }

    pub fn continue_to_details(&mut self) -> Result<(), FlowTransitionError> {
        self.apply(OrderEvent::Continue, &FlowContext::default()).map(|_| ())
    }

    pub fn back(&mut self) -> Result<(), FlowTransitionError> {
        if self.guard.is_busy() {
            return Err(FlowTransitionError::RequestInFlight { flow: FlowType::Order });
        }
        self.apply(OrderEvent::Back, &FlowContext::default()).map(|_| ())
    }

    pub fn update_customer(
        &mut self,
        field: CustomerField,
        value: impl Into<String>,
    ) -> Result<(), FlowTransitionError> {
        let actions = self.apply(OrderEvent::DetailsEdited, &FlowContext::default())?;
        self.customer.set(field, value);
        if actions.contains(&FlowAction::ClearFieldError) {
            self.field_errors.clear_field(field);
        }
        Ok(())
    }

    /// Validates the customer details and moves to the summary when they pass.
    /// Field messages stay available through [`Self::field_errors`].
    pub fn review(&mut self) -> Result<(), FlowTransitionError> {
        if self.step == OrderStep::CollectingDetails {
            self.field_errors = validate_customer(&self.customer);
        }

        let context = FlowContext {
            missing_required_fields: self
                .field_errors
                .fields()
                .iter()
                .map(|field| field.key().to_string())
                .collect(),
        };

        if let Err(error) = self.apply(OrderEvent::ReviewRequested, &context) {
            if matches!(error, FlowTransitionError::MissingRequiredFields { .. }) {
                tracing::info!(
                    event_name = "order.validation_failed",
                    session_id = %self.guard.session_id(),
                    invalid_fields = ?context.missing_required_fields,
                    "customer details failed validation"
                );
            }
            return Err(error);
        }
        Ok(())
    }

    /// Marks the wizard as submitting and builds the request body. The caller
    /// sends it and hands the answer to [`Self::complete_submission`].
    pub fn begin_submission(
        &self,
        now: DateTime<Utc>,
    ) -> Result<OrderSubmission, FlowTransitionError> {
        if self.step != OrderStep::Reviewing {
            return Err(FlowTransitionError::InvalidTransition {
                flow: FlowType::Order,
                state: self.step.to_string(),
                event: "SubmitOrder".to_string(),
            });
        }

        let ticket = self
            .guard
            .begin()
            .ok_or(FlowTransitionError::RequestInFlight { flow: FlowType::Order })?;
        let request =
            OrderRequest::new(&self.product, self.configuration, self.customer.clone(), now);

        tracing::info!(
            event_name = "order.submission_started",
            session_id = %ticket.session_id(),
            product_id = %self.product.id,
            final_price = request.product.final_price,
            "submitting order"
        );
        Ok(OrderSubmission { ticket, request })
    }

    pub fn complete_submission(
        &mut self,
        submission: OrderSubmission,
        result: Result<OrderReceipt, ApiError>,
    ) -> Result<ResponseDisposition, FlowTransitionError> {
        let OrderSubmission { ticket, .. } = submission;
        let admitted = self.guard.admits(&ticket);
        let ticket_session = ticket.session_id();
        drop(ticket);

        if !admitted {
            tracing::info!(
                event_name = "order.stale_response_discarded",
                session_id = %ticket_session,
                current_session_id = %self.guard.session_id(),
                "discarding order response from a closed session"
            );
            return Ok(ResponseDisposition::Discarded);
        }

        match result {
            Ok(receipt) => {
                self.apply(OrderEvent::OrderAccepted, &FlowContext::default())?;
                tracing::info!(
                    event_name = "order.confirmed",
                    session_id = %ticket_session,
                    order_id = receipt.order_id.as_deref().unwrap_or("unknown"),
                    "order confirmed"
                );
                self.receipt = Some(receipt);
            }
            Err(error) => {
                let actions = self.apply(OrderEvent::OrderFailed, &FlowContext::default())?;
                tracing::warn!(
                    event_name = "order.submission_failed",
                    session_id = %ticket_session,
                    error = %error,
                    "order submission failed"
                );
                if actions.contains(&FlowAction::SetErrorMessage) {
                    self.error_message = Some(order_failure_message(&error));
                }
            }
        }

        Ok(ResponseDisposition::Applied)
    }

    /// Submits the reviewed order and applies the answer. A failed call
    /// leaves the wizard on the summary with a retryable error.
    pub async fn confirm<A>(
        &mut self,
        api: &A,
        now: DateTime<Utc>,
    ) -> Result<ResponseDisposition, FlowTransitionError>
    where
        A: StorefrontApi + ?Sized,
    {
        let submission = self.begin_submission(now)?;
        let result = api.submit_order(submission.request()).await;
        self.complete_submission(submission, result)
    }

    /// Closes the dialog: the draft returns to its defaults and any response
    /// still in flight will be discarded.
    pub fn close(&mut self) {
        let previous = self.guard.session_id();
        if let Err(error) = self.apply(OrderEvent::Reset, &FlowContext::default()) {
            tracing::warn!(event_name = "order.reset_failed", error = %error, "reset rejected");
            return;
        }
        tracing::info!(
            event_name = "order.session_closed",
            session_id = %previous,
            next_session_id = %self.guard.session_id(),
            "order wizard closed"
        );
    }

    fn reconfigure(
        &mut self,
        change: impl FnOnce(&mut OrderConfiguration),
    ) -> Result<u32, FlowTransitionError> {
        let actions = self.apply(OrderEvent::ConfigurationChanged, &FlowContext::default())?;
        change(&mut self.configuration);
        let price = self.final_price();
        if actions.contains(&FlowAction::RecomputePrice) {
            tracing::debug!(
                event_name = "order.price_recomputed",
                session_id = %self.guard.session_id(),
                final_price = price,
                "final price recomputed"
            );
        }
        Ok(price)
    }

    fn apply(
        &mut self,
        event: OrderEvent,
        context: &FlowContext,
    ) -> Result<Vec<FlowAction>, FlowTransitionError> {
        let outcome = self.engine.apply(&self.step, &event, context)?;
        self.step = outcome.to;

        for action in &outcome.actions {
            match action {
                FlowAction::ResetDraft => self.reset_draft(),
                FlowAction::RotateSession => self.guard.rotate(),
                FlowAction::ClearErrorMessage => self.error_message = None,
                _ => {}
            }
        }
        Ok(outcome.actions)
    }

    fn reset_draft(&mut self) {
        self.configuration = OrderConfiguration::default();
        self.customer = CustomerDetails::default();
        self.field_errors = FieldErrors::default();
        self.error_message = None;
        self.receipt = None;
    }
}

fn order_failure_message(error: &ApiError) -> String {
    match error.server_message() {
        Some(message) => format!("Failed to submit order: {message}. Please try again."),
        None => ORDER_FAILURE_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::{OrderWizard, ORDER_FAILURE_MESSAGE};
    use crate::api::{ApiError, InMemoryStorefrontApi, OrderReceipt};
    use crate::domain::order::{Color, CustomerField, OrderConfiguration, RamSize, StorageSize};
    use crate::domain::product::{Category, DeviceType, Product, ProductId};
    use crate::flows::engine::FlowTransitionError;
    use crate::flows::session::ResponseDisposition;
    use crate::flows::states::OrderStep;

    fn product(price: u32) -> Arc<Product> {
        Arc::new(Product {
            id: ProductId(1),
            name: "SNI Phantom X1".to_string(),
            category: Category::Gaming,
            device_type: DeviceType::Laptop,
            price,
            specs: Default::default(),
            features: Vec::new(),
            rating: 4.9,
            reviews: 127,
            is_pre_order: None,
        })
    }

    fn fill_customer(wizard: &mut OrderWizard) {
        for (field, value) in [
            (CustomerField::FirstName, "Ada"),
            (CustomerField::LastName, "Lovelace"),
            (CustomerField::Address, "12 Analytical Way"),
            (CustomerField::City, "London"),
            (CustomerField::ZipCode, "94105"),
            (CustomerField::Mobile, "+14155551234"),
        ] {
            wizard.update_customer(field, value).expect("details are editable");
        }
    }

    fn reviewing_wizard() -> OrderWizard {
        let mut wizard = OrderWizard::new(product(1_000));
        wizard.continue_to_details().expect("configuring -> details");
        fill_customer(&mut wizard);
        wizard.review().expect("details -> reviewing");
        wizard
    }

    #[test]
    fn final_price_tracks_selections() {
        let mut wizard = OrderWizard::new(product(1_000));
        assert_eq!(wizard.final_price(), 1_350);

        assert_eq!(wizard.select_ram(RamSize::Gb64).expect("ram"), 2_150);
        assert_eq!(wizard.select_storage(StorageSize::Gb256).expect("storage"), 2_000);
        assert_eq!(wizard.select_color(Color::DarkGreen).expect("color"), 2_000);
    }

    #[test]
    fn selections_are_locked_after_continue() {
        let mut wizard = OrderWizard::new(product(1_000));
        wizard.continue_to_details().expect("continue");

        let error = wizard.select_ram(RamSize::Gb8).expect_err("locked");
        assert!(matches!(error, FlowTransitionError::InvalidTransition { .. }));
        assert_eq!(wizard.configuration().ram, RamSize::Gb16);
    }

    #[test]
    fn empty_mobile_blocks_review() {
        let mut wizard = OrderWizard::new(product(1_000));
        wizard.continue_to_details().expect("continue");
        fill_customer(&mut wizard);
        wizard.update_customer(CustomerField::Mobile, "").expect("edit");

        let error = wizard.review().expect_err("mobile is required");
        assert!(matches!(error, FlowTransitionError::MissingRequiredFields { .. }));
        assert_eq!(wizard.step(), OrderStep::CollectingDetails);
        assert_eq!(
            wizard.field_errors().get(CustomerField::Mobile),
            Some("Mobile number is required")
        );

        wizard.update_customer(CustomerField::Mobile, "+14155551234").expect("edit");
        assert!(wizard.field_errors().is_empty(), "editing clears that field's error");
        wizard.review().expect("valid details");
        assert_eq!(wizard.step(), OrderStep::Reviewing);
    }

    #[test]
    fn back_keeps_entered_data() {
        let mut wizard = reviewing_wizard();
        wizard.back().expect("reviewing -> details");
        assert_eq!(wizard.step(), OrderStep::CollectingDetails);
        assert_eq!(wizard.customer().first_name, "Ada");

        wizard.back().expect("details -> configuring");
        assert_eq!(wizard.step(), OrderStep::Configuring);
        assert_eq!(wizard.customer().mobile, "+14155551234");
    }

    #[tokio::test]
    async fn confirm_posts_order_and_reaches_confirmed() {
        let api = InMemoryStorefrontApi::new();
        let mut wizard = reviewing_wizard();

        let disposition = wizard.confirm(&api, Utc::now()).await.expect("confirm");
        assert_eq!(disposition, ResponseDisposition::Applied);
        assert_eq!(wizard.step(), OrderStep::Confirmed);
        assert_eq!(
            wizard.receipt().and_then(|receipt| receipt.order_id.as_deref()),
            Some("ORD-0001")
        );

        let orders = api.orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].product.final_price, 1_350);
        assert_eq!(orders[0].customer.city, "London");
    }

    #[tokio::test]
    async fn network_failure_keeps_review_step_and_allows_retry() {
        let api = InMemoryStorefrontApi::new();
        api.fail_next(ApiError::Transport("connection refused".to_string())).await;
        let mut wizard = reviewing_wizard();

        wizard.confirm(&api, Utc::now()).await.expect("failure is applied, not raised");
        assert_eq!(wizard.step(), OrderStep::Reviewing);
        assert_eq!(wizard.error_message(), Some(ORDER_FAILURE_MESSAGE));
        assert!(!wizard.is_submitting());

        wizard.confirm(&api, Utc::now()).await.expect("retry");
        assert_eq!(wizard.step(), OrderStep::Confirmed);
        assert_eq!(wizard.error_message(), None);
    }

    #[tokio::test]
    async fn server_rejection_surfaces_its_message() {
        let api = InMemoryStorefrontApi::new();
        api.fail_next(ApiError::Rejected("out of stock".to_string())).await;
        let mut wizard = reviewing_wizard();

        wizard.confirm(&api, Utc::now()).await.expect("applied");
        assert_eq!(
            wizard.error_message(),
            Some("Failed to submit order: out of stock. Please try again.")
        );
    }

    #[test]
    fn one_submission_at_a_time() {
        let mut wizard = reviewing_wizard();
        let submission = wizard.begin_submission(Utc::now()).expect("first submission");
        assert!(wizard.is_submitting());

        assert!(matches!(
            wizard.begin_submission(Utc::now()),
            Err(FlowTransitionError::RequestInFlight { .. })
        ));
        assert!(matches!(wizard.back(), Err(FlowTransitionError::RequestInFlight { .. })));

        wizard
            .complete_submission(submission, Ok(OrderReceipt::default()))
            .expect("complete");
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn late_response_after_close_is_discarded() {
        let mut wizard = reviewing_wizard();
        let submission = wizard.begin_submission(Utc::now()).expect("submission");
        let old_session = submission.session_id();

        wizard.close();
        assert_ne!(wizard.session_id(), old_session);
        assert!(!wizard.is_submitting());

        let disposition = wizard
            .complete_submission(submission, Err(ApiError::Transport("late".to_string())))
            .expect("stale response is not an error");
        assert_eq!(disposition, ResponseDisposition::Discarded);
        assert_eq!(wizard.step(), OrderStep::Configuring);
        assert_eq!(wizard.error_message(), None);
    }

    #[tokio::test]
    async fn closing_after_confirmation_restores_defaults() {
        let api = InMemoryStorefrontApi::new();
        let mut wizard = OrderWizard::new(product(1_000));
        wizard.select_color(Color::Grey).expect("color");
        wizard.continue_to_details().expect("continue");
        fill_customer(&mut wizard);
        wizard.review().expect("review");
        wizard.confirm(&api, Utc::now()).await.expect("confirm");

        wizard.close();
        assert_eq!(wizard.step(), OrderStep::Configuring);
        assert_eq!(wizard.configuration(), OrderConfiguration::default());
        assert_eq!(wizard.customer().first_name, "");
        assert!(wizard.receipt().is_none());
    }

    #[test]
    fn submission_requires_review_step() {
        let wizard = OrderWizard::new(product(1_000));
        assert!(matches!(
            wizard.begin_submission(Utc::now()),
            Err(FlowTransitionError::InvalidTransition { .. })
        ));
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::wire::DEFAULT_VERIFY_FAILURE;
use crate::api::{ApiError, StorefrontApi, WarrantyCheckOutcome, WarrantyVerifyOutcome};
use crate::domain::warranty::{parse_timestamp, WarrantyRecord, WarrantyStatus};
use crate::flows::engine::{FlowEngine, FlowTransitionError, WarrantyFlow};
use crate::flows::session::{RequestTicket, ResponseDisposition, SessionGuard};
use crate::flows::states::{FlowAction, FlowContext, FlowType, WarrantyEvent, WarrantyStep};
use crate::validation::{is_valid_serial, DEFAULT_MIN_SERIAL_LENGTH};

pub const SERIAL_NOT_FOUND_MESSAGE: &str = "Serial number not found. Please check and try again.";
pub const CHECK_FAILURE_MESSAGE: &str =
    "An error occurred while checking warranty. Please try again.";
pub const VERIFY_FAILURE_MESSAGE: &str =
    "An error occurred while verifying passcode. Please try again.";
pub const COVERAGE_LABEL: &str = "3-Year Premium Warranty";

const MILLIS_PER_DAY: i64 = 86_400_000;
const MISSING: &str = "N/A";

/// Whole days until `end`, rounded up. Negative once coverage has lapsed.
pub fn remaining_days(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (end - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// `Mon D, YYYY`, or `N/A` when the backend sent nothing usable.
pub fn format_display_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|timestamp| timestamp.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// What the result step shows for a verified warranty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WarrantyReport {
    pub serial_number: String,
    pub windows_key: String,
    pub nic_number: String,
    pub purchase_date: String,
    pub expiry_date: String,
    pub status: Option<WarrantyStatus>,
    pub remaining_days: Option<i64>,
    pub coverage: &'static str,
}

impl WarrantyReport {
    pub fn from_record(record: &WarrantyRecord, now: DateTime<Utc>) -> Self {
        let end = record.warranty_end_date.as_deref().and_then(parse_timestamp);
        Self {
            serial_number: record.serial_number.clone(),
            windows_key: record.windows_key.clone().unwrap_or_else(|| MISSING.to_string()),
            nic_number: record.nic_number.clone().unwrap_or_else(|| MISSING.to_string()),
            purchase_date: format_display_date(record.warranty_start_date.as_deref()),
            expiry_date: format_display_date(record.warranty_end_date.as_deref()),
            status: record.warranty_status,
            remaining_days: end.map(|end| remaining_days(end, now)),
            coverage: COVERAGE_LABEL,
        }
    }

    pub fn remaining_label(&self) -> String {
        match self.remaining_days {
            Some(days) if days >= 0 => format!("Days Until Expiry: {days} days"),
            Some(days) => format!("Days Since Expired: {} days ago", days.unsigned_abs()),
            None => format!("Days Until Expiry: {MISSING}"),
        }
    }
}

#[derive(Debug)]
pub struct WarrantyLookup {
    ticket: RequestTicket,
    serial_number: String,
}

impl WarrantyLookup {
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }
}

#[derive(Debug)]
pub struct PasscodeVerification {
    ticket: RequestTicket,
    serial_number: String,
    passcode: String,
}

impl PasscodeVerification {
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn passcode(&self) -> &str {
        &self.passcode
    }
}

/// Serial lookup, then passcode verification, then the coverage report.
#[derive(Debug)]
pub struct WarrantyWizard {
    engine: FlowEngine<WarrantyFlow>,
    step: WarrantyStep,
    min_serial_length: usize,
    serial_number: String,
    passcode: String,
    status: Option<WarrantyStatus>,
    error_message: Option<String>,
    report: Option<WarrantyReport>,
    guard: SessionGuard,
}

impl Default for WarrantyWizard {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SERIAL_LENGTH)
    }
}

impl WarrantyWizard {
    pub fn new(min_serial_length: usize) -> Self {
        let engine = FlowEngine::new(WarrantyFlow);
        let step = engine.initial_state();
        Self {
            engine,
            step,
            min_serial_length,
            serial_number: String::new(),
            passcode: String::new(),
            status: None,
            error_message: None,
            report: None,
            guard: SessionGuard::new(),
        }
    }

    pub fn step(&self) -> WarrantyStep {
        self.step
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn passcode(&self) -> &str {
        &self.passcode
    }

    /// Status remembered from the lookup while the passcode is requested.
    pub fn status(&self) -> Option<WarrantyStatus> {
        self.status
    }

    pub fn status_banner(&self) -> Option<String> {
        self.status.map(|status| format!("Warranty Found ({status})"))
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn report(&self) -> Option<&WarrantyReport> {
        self.report.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn session_id(&self) -> Uuid {
        self.guard.session_id()
    }

    pub fn min_serial_length(&self) -> usize {
        self.min_serial_length
    }

    pub fn can_check(&self) -> bool {
        self.step == WarrantyStep::AwaitingSerial
            && !self.guard.is_busy()
            && is_valid_serial(&self.serial_number, self.min_serial_length)
    }

    pub fn set_serial(
        &mut self,
        serial_number: impl Into<String>,
    ) -> Result<(), FlowTransitionError> {
        self.apply(WarrantyEvent::SerialEdited)?;
        self.serial_number = serial_number.into();
        Ok(())
    }

    pub fn set_passcode(
        &mut self,
        passcode: impl Into<String>,
    ) -> Result<(), FlowTransitionError> {
        self.apply(WarrantyEvent::PasscodeEdited)?;
        self.passcode = passcode.into();
        Ok(())
    }

    pub fn begin_check(&self) -> Result<WarrantyLookup, FlowTransitionError> {
        self.require_step(WarrantyStep::AwaitingSerial, "CheckSerial")?;
        if !is_valid_serial(&self.serial_number, self.min_serial_length) {
            return Err(FlowTransitionError::MissingRequiredFields {
                state: self.step.to_string(),
                missing_fields: vec!["serial_number".to_string()],
            });
        }

        let ticket = self.begin_request()?;
        let serial_number = self.serial_number.trim().to_string();
        tracing::info!(
            event_name = "warranty.check_started",
            session_id = %ticket.session_id(),
            serial_number = %serial_number,
            "checking warranty"
        );
        Ok(WarrantyLookup { ticket, serial_number })
    }

    pub fn complete_check(
        &mut self,
        lookup: WarrantyLookup,
        result: Result<WarrantyCheckOutcome, ApiError>,
    ) -> Result<ResponseDisposition, FlowTransitionError> {
        let WarrantyLookup { ticket, serial_number } = lookup;
        if !self.settle(ticket, "check") {
            return Ok(ResponseDisposition::Discarded);
        }

        let failure = match result {
            Ok(WarrantyCheckOutcome::PasscodeRequired { status }) => {
                let actions = self.apply(WarrantyEvent::PasscodeRequired)?;
                if actions.contains(&FlowAction::RememberStatus) {
                    self.status = status;
                }
                None
            }
            Ok(WarrantyCheckOutcome::NotFound) => Some(SERIAL_NOT_FOUND_MESSAGE.to_string()),
            Ok(WarrantyCheckOutcome::Inactive { message }) => Some(message.unwrap_or_else(|| {
                format!("Warranty is not active for serial number {serial_number}")
            })),
            Ok(WarrantyCheckOutcome::Unavailable { message }) => {
                Some(message.unwrap_or_else(|| CHECK_FAILURE_MESSAGE.to_string()))
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "warranty.check_failed",
                    session_id = %self.guard.session_id(),
                    error = %error,
                    "warranty check failed"
                );
                Some(CHECK_FAILURE_MESSAGE.to_string())
            }
        };

        if let Some(message) = failure {
            self.fail(WarrantyEvent::LookupFailed, message)?;
        }
        Ok(ResponseDisposition::Applied)
    }

    pub async fn check<A>(&mut self, api: &A) -> Result<ResponseDisposition, FlowTransitionError>
    where
        A: StorefrontApi + ?Sized,
    {
        let lookup = self.begin_check()?;
        let result = api.check_warranty(lookup.serial_number()).await;
        self.complete_check(lookup, result)
    }

    /// Leaves the passcode step. The entered serial number is kept.
    pub fn cancel_passcode(&mut self) -> Result<(), FlowTransitionError> {
        if self.guard.is_busy() {
            return Err(FlowTransitionError::RequestInFlight { flow: FlowType::Warranty });
        }
        let actions = self.apply(WarrantyEvent::PasscodeCancelled)?;
        self.perform_clears(&actions);
        Ok(())
    }

    pub fn begin_verify(&self) -> Result<PasscodeVerification, FlowTransitionError> {
        self.require_step(WarrantyStep::AwaitingPasscode, "VerifyPasscode")?;
        if self.passcode.trim().is_empty() {
            return Err(FlowTransitionError::MissingRequiredFields {
                state: self.step.to_string(),
                missing_fields: vec!["passcode".to_string()],
            });
        }

        let ticket = self.begin_request()?;
        tracing::info!(
            event_name = "warranty.verify_started",
            session_id = %ticket.session_id(),
            serial_number = %self.serial_number.trim(),
            "verifying warranty passcode"
        );
        Ok(PasscodeVerification {
            ticket,
            serial_number: self.serial_number.trim().to_string(),
            passcode: self.passcode.clone(),
        })
    }

    pub fn complete_verify(
        &mut self,
        verification: PasscodeVerification,
        result: Result<WarrantyVerifyOutcome, ApiError>,
        now: DateTime<Utc>,
    ) -> Result<ResponseDisposition, FlowTransitionError> {
        if !self.settle(verification.ticket, "verify") {
            return Ok(ResponseDisposition::Discarded);
        }

        match result {
            Ok(WarrantyVerifyOutcome::Verified(record)) => {
                let actions = self.apply(WarrantyEvent::Verified)?;
                if actions.contains(&FlowAction::BuildReport) {
                    let report = WarrantyReport::from_record(&record, now);
                    tracing::info!(
                        event_name = "warranty.verified",
                        session_id = %self.guard.session_id(),
                        serial_number = %report.serial_number,
                        remaining_days = ?report.remaining_days,
                        "warranty verified"
                    );
                    self.report = Some(report);
                }
            }
            Ok(WarrantyVerifyOutcome::Rejected { message }) => {
                let message = message.unwrap_or_else(|| DEFAULT_VERIFY_FAILURE.to_string());
                self.fail(WarrantyEvent::VerificationFailed, message)?;
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "warranty.verify_failed",
                    session_id = %self.guard.session_id(),
                    error = %error,
                    "warranty verification failed"
                );
                self.fail(WarrantyEvent::VerificationFailed, VERIFY_FAILURE_MESSAGE.to_string())?;
            }
        }
        Ok(ResponseDisposition::Applied)
    }

    pub async fn verify<A>(
        &mut self,
        api: &A,
        now: DateTime<Utc>,
    ) -> Result<ResponseDisposition, FlowTransitionError>
    where
        A: StorefrontApi + ?Sized,
    {
        let verification = self.begin_verify()?;
        let result =
            api.verify_warranty(verification.serial_number(), verification.passcode()).await;
        self.complete_verify(verification, result, now)
    }

    /// Starts over from an empty serial field, discarding anything in flight.
    pub fn restart(&mut self) {
        let previous = self.guard.session_id();
        match self.apply(WarrantyEvent::Restart) {
            Ok(actions) => {
                self.perform_clears(&actions);
                self.report = None;
                tracing::info!(
                    event_name = "warranty.session_restarted",
                    session_id = %previous,
                    next_session_id = %self.guard.session_id(),
                    "warranty lookup restarted"
                );
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "warranty.restart_failed",
                    error = %error,
                    "restart rejected"
                );
            }
        }
    }

    fn require_step(&self, expected: WarrantyStep, event: &str) -> Result<(), FlowTransitionError> {
        if self.step == expected {
            return Ok(());
        }
        Err(FlowTransitionError::InvalidTransition {
            flow: FlowType::Warranty,
            state: self.step.to_string(),
            event: event.to_string(),
        })
    }

    fn begin_request(&self) -> Result<RequestTicket, FlowTransitionError> {
        self.guard.begin().ok_or(FlowTransitionError::RequestInFlight { flow: FlowType::Warranty })
    }

    /// Releases the ticket and reports whether its response still applies.
    fn settle(&self, ticket: RequestTicket, request: &'static str) -> bool {
        let admitted = self.guard.admits(&ticket);
        if !admitted {
            tracing::info!(
                event_name = "warranty.stale_response_discarded",
                request,
                session_id = %ticket.session_id(),
                current_session_id = %self.guard.session_id(),
                "discarding warranty response from a restarted session"
            );
        }
        drop(ticket);
        admitted
    }

    fn fail(&mut self, event: WarrantyEvent, message: String) -> Result<(), FlowTransitionError> {
        let actions = self.apply(event)?;
        if actions.contains(&FlowAction::SetErrorMessage) {
            self.error_message = Some(message);
        }
        Ok(())
    }

    fn perform_clears(&mut self, actions: &[FlowAction]) {
        for action in actions {
            match action {
                FlowAction::ClearPasscode => {
                    self.passcode.clear();
                    self.status = None;
                }
                FlowAction::ClearSerial => self.serial_number.clear(),
                _ => {}
            }
        }
    }

    fn apply(&mut self, event: WarrantyEvent) -> Result<Vec<FlowAction>, FlowTransitionError> {
        let outcome = self.engine.apply(&self.step, &event, &FlowContext::default())?;
        self.step = outcome.to;

        for action in &outcome.actions {
            match action {
                FlowAction::ClearErrorMessage => self.error_message = None,
                FlowAction::RotateSession => self.guard.rotate(),
                _ => {}
            }
        }
        Ok(outcome.actions)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{
        format_display_date, remaining_days, WarrantyReport, WarrantyWizard,
        CHECK_FAILURE_MESSAGE, COVERAGE_LABEL, SERIAL_NOT_FOUND_MESSAGE, VERIFY_FAILURE_MESSAGE,
    };
    use crate::api::wire::decode_check;
    use crate::api::{ApiError, InMemoryStorefrontApi, WarrantyCheckOutcome, WarrantyVerifyOutcome};
    use crate::domain::warranty::{WarrantyRecord, WarrantyStatus};
    use crate::flows::engine::FlowTransitionError;
    use crate::flows::session::ResponseDisposition;
    use crate::flows::states::WarrantyStep;

    fn record(serial: &str, end: chrono::DateTime<Utc>) -> WarrantyRecord {
        WarrantyRecord {
            id: None,
            serial_number: serial.to_string(),
            warranty_start_date: Some("2024-01-15T00:00:00.000Z".to_string()),
            warranty_end_date: Some(end.to_rfc3339()),
            windows_key: Some("VK7JG-NPHTM".to_string()),
            nic_number: Some("NIC-42".to_string()),
            passcode: Some("2468".to_string()),
            warranty_status: None,
        }
    }

    fn wizard_with_serial(serial: &str) -> WarrantyWizard {
        let mut wizard = WarrantyWizard::default();
        wizard.set_serial(serial).expect("serial is editable");
        wizard
    }

    #[test]
    fn remaining_days_rounds_up_and_goes_negative() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid date");
        assert_eq!(remaining_days(now + Duration::days(10), now), 10);
        assert_eq!(remaining_days(now - Duration::days(5), now), -5);
        assert_eq!(remaining_days(now + Duration::hours(1), now), 1);
        assert_eq!(remaining_days(now - Duration::hours(36), now), -1);
        assert_eq!(remaining_days(now, now), 0);
    }

    #[test]
    fn display_dates() {
        assert_eq!(format_display_date(Some("2024-01-05T00:00:00.000Z")), "Jan 5, 2024");
        assert_eq!(format_display_date(Some("2027-11-20")), "Nov 20, 2027");
        assert_eq!(format_display_date(None), "N/A");
        assert_eq!(format_display_date(Some("garbage")), "N/A");
    }

    #[test]
    fn report_from_record() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().expect("valid date");
        let mut source = record("SNI-1", now + Duration::days(10));
        source.windows_key = None;
        let report = WarrantyReport::from_record(&source, now);

        assert_eq!(report.purchase_date, "Jan 15, 2024");
        assert_eq!(report.windows_key, "N/A");
        assert_eq!(report.remaining_days, Some(10));
        assert_eq!(report.coverage, COVERAGE_LABEL);
        assert_eq!(report.remaining_label(), "Days Until Expiry: 10 days");

        source.warranty_end_date = Some("unknown".to_string());
        let report = WarrantyReport::from_record(&source, now);
        assert_eq!(report.remaining_days, None);
        assert_eq!(report.expiry_date, "N/A");
    }

    #[test]
    fn serial_shorter_than_minimum_cannot_be_checked() {
        let wizard = wizard_with_serial(" SN ");
        assert!(!wizard.can_check());
        assert!(matches!(
            wizard.begin_check(),
            Err(FlowTransitionError::MissingRequiredFields { .. })
        ));

        let mut strict = WarrantyWizard::new(8);
        strict.set_serial("SNI-001").expect("edit");
        assert!(!strict.can_check());
        strict.set_serial("SNI-0001").expect("edit");
        assert!(strict.can_check());
    }

    #[test]
    fn passcode_required_response_moves_to_passcode_step() {
        let mut wizard = wizard_with_serial("SNI-LP-001");
        let lookup = wizard.begin_check().expect("lookup");
        let outcome =
            decode_check(200, br#"{"success":true,"requires_passcode":true,"status":"Active"}"#);

        wizard.complete_check(lookup, outcome).expect("applied");
        assert_eq!(wizard.step(), WarrantyStep::AwaitingPasscode);
        assert_eq!(wizard.status(), Some(WarrantyStatus::Active));
        assert_eq!(wizard.status_banner().as_deref(), Some("Warranty Found (Active)"));
    }

    #[test]
    fn not_found_response_keeps_serial_step() {
        let mut wizard = wizard_with_serial("SNI-LP-404");
        let lookup = wizard.begin_check().expect("lookup");

        wizard
            .complete_check(lookup, decode_check(200, br#"{"success":true,"found":false}"#))
            .expect("applied");
        assert_eq!(wizard.step(), WarrantyStep::AwaitingSerial);
        assert_eq!(wizard.error_message(), Some(SERIAL_NOT_FOUND_MESSAGE));
        assert!(!wizard.is_loading());

        wizard.set_serial("SNI-LP-405").expect("edit");
        assert_eq!(wizard.error_message(), None, "editing clears the message");
    }

    #[test]
    fn inactive_and_unavailable_outcomes_stay_on_serial_step() {
        let mut wizard = wizard_with_serial("SNI-NEW");
        let lookup = wizard.begin_check().expect("lookup");
        wizard
            .complete_check(lookup, Ok(WarrantyCheckOutcome::Inactive { message: None }))
            .expect("applied");
        assert_eq!(
            wizard.error_message(),
            Some("Warranty is not active for serial number SNI-NEW")
        );

        let lookup = wizard.begin_check().expect("lookup");
        wizard
            .complete_check(lookup, Ok(WarrantyCheckOutcome::Unavailable { message: None }))
            .expect("applied");
        assert_eq!(wizard.step(), WarrantyStep::AwaitingSerial);
        assert_eq!(wizard.error_message(), Some(CHECK_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn transport_failure_on_check_is_retryable() {
        let api = InMemoryStorefrontApi::new();
        api.fail_next(ApiError::Transport("dns".to_string())).await;
        let mut wizard = wizard_with_serial("SNI-1");

        wizard.check(&api).await.expect("failure is applied");
        assert_eq!(wizard.step(), WarrantyStep::AwaitingSerial);
        assert_eq!(wizard.error_message(), Some(CHECK_FAILURE_MESSAGE));
        assert!(wizard.can_check());
    }

    #[tokio::test]
    async fn full_lookup_reports_remaining_days() {
        let now = Utc::now();
        let api = InMemoryStorefrontApi::with_warranties([
            record("SNI-ACTIVE", now + Duration::days(10)),
            record("SNI-EXPIRED", now - Duration::days(5)),
        ])
        .await;

        let mut active = wizard_with_serial("  SNI-ACTIVE ");
        active.check(&api).await.expect("check");
        assert_eq!(active.status(), Some(WarrantyStatus::Active));
        active.set_passcode("2468").expect("passcode");
        active.verify(&api, now).await.expect("verify");

        assert_eq!(active.step(), WarrantyStep::Result);
        let report = active.report().expect("report");
        assert_eq!(report.remaining_days, Some(10));
        assert_eq!(report.status, Some(WarrantyStatus::Active));

        let mut expired = wizard_with_serial("SNI-EXPIRED");
        expired.check(&api).await.expect("check");
        assert_eq!(expired.status_banner().as_deref(), Some("Warranty Found (Expired)"));
        expired.set_passcode("2468").expect("passcode");
        expired.verify(&api, now).await.expect("verify");
        let report = expired.report().expect("report");
        assert_eq!(report.remaining_days, Some(-5));
        assert_eq!(report.remaining_label(), "Days Since Expired: 5 days ago");
    }

    #[tokio::test]
    async fn wrong_passcode_keeps_passcode_step() {
        let api = InMemoryStorefrontApi::with_warranties([record(
            "SNI-ACTIVE",
            Utc::now() + Duration::days(30),
        )])
        .await;
        let mut wizard = wizard_with_serial("SNI-ACTIVE");
        wizard.check(&api).await.expect("check");
        wizard.set_passcode("0000").expect("passcode");

        wizard.verify(&api, Utc::now()).await.expect("verify");
        assert_eq!(wizard.step(), WarrantyStep::AwaitingPasscode);
        assert_eq!(wizard.error_message(), Some("Invalid passcode. Please try again."));

        api.fail_next(ApiError::Decode("truncated".to_string())).await;
        wizard.verify(&api, Utc::now()).await.expect("verify");
        assert_eq!(wizard.error_message(), Some(VERIFY_FAILURE_MESSAGE));
        assert!(!wizard.is_loading());
    }

    #[test]
    fn cancel_clears_passcode_and_status() {
        let mut wizard = wizard_with_serial("SNI-1");
        let lookup = wizard.begin_check().expect("lookup");
        let expired =
            WarrantyCheckOutcome::PasscodeRequired { status: Some(WarrantyStatus::Expired) };
        wizard.complete_check(lookup, Ok(expired)).expect("applied");
        wizard.set_passcode("1234").expect("passcode");

        wizard.cancel_passcode().expect("cancel");
        assert_eq!(wizard.step(), WarrantyStep::AwaitingSerial);
        assert_eq!(wizard.passcode(), "");
        assert_eq!(wizard.status(), None);
        assert_eq!(wizard.serial_number(), "SNI-1");
    }

    #[test]
    fn empty_passcode_is_not_sent() {
        let mut wizard = wizard_with_serial("SNI-1");
        let lookup = wizard.begin_check().expect("lookup");
        wizard
            .complete_check(lookup, Ok(WarrantyCheckOutcome::PasscodeRequired { status: None }))
            .expect("applied");

        assert!(matches!(
            wizard.begin_verify(),
            Err(FlowTransitionError::MissingRequiredFields { .. })
        ));
    }

    #[test]
    fn restart_discards_late_verification() {
        let mut wizard = wizard_with_serial("SNI-1");
        let lookup = wizard.begin_check().expect("lookup");
        wizard
            .complete_check(lookup, Ok(WarrantyCheckOutcome::PasscodeRequired { status: None }))
            .expect("applied");
        wizard.set_passcode("2468").expect("passcode");
        let verification = wizard.begin_verify().expect("verification");
        assert!(wizard.is_loading());
        assert!(matches!(
            wizard.begin_verify(),
            Err(FlowTransitionError::RequestInFlight { .. })
        ));

        wizard.restart();
        assert_eq!(wizard.step(), WarrantyStep::AwaitingSerial);
        assert_eq!(wizard.serial_number(), "");
        assert!(!wizard.is_loading());

        let late = Ok(WarrantyVerifyOutcome::Verified(record("SNI-1", Utc::now())));
        let disposition =
            wizard.complete_verify(verification, late, Utc::now()).expect("not an error");
        assert_eq!(disposition, ResponseDisposition::Discarded);
        assert_eq!(wizard.step(), WarrantyStep::AwaitingSerial);
        assert!(wizard.report().is_none());
    }

    #[test]
    fn result_step_is_terminal_until_restart() {
        let mut wizard = wizard_with_serial("SNI-1");
        let lookup = wizard.begin_check().expect("lookup");
        wizard
            .complete_check(lookup, Ok(WarrantyCheckOutcome::PasscodeRequired { status: None }))
            .expect("applied");
        wizard.set_passcode("2468").expect("passcode");
        let verification = wizard.begin_verify().expect("verification");
        wizard
            .complete_verify(
                verification,
                Ok(WarrantyVerifyOutcome::Verified(record("SNI-1", Utc::now()))),
                Utc::now(),
            )
            .expect("applied");

        assert_eq!(wizard.step(), WarrantyStep::Result);
        assert!(wizard.set_serial("SNI-2").is_err());
        assert!(wizard.begin_check().is_err());

        wizard.restart();
        assert_eq!(wizard.step(), WarrantyStep::AwaitingSerial);
        assert!(wizard.report().is_none());
    }
}

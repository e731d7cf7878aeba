use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::api::{ApiError, StorefrontApi, WarrantyCheckOutcome, WarrantyVerifyOutcome};
use storefront_core::errors::{ApplicationError, ErrorClass};
use storefront_core::flows::{FlowTransitionError, WarrantyReport, WarrantyStep, WarrantyWizard};

use crate::commands::{connect, runtime, CommandResult};

const COMMAND: &str = "warranty_check";

#[derive(Debug, Serialize)]
struct PendingPasscode<'a> {
    serial_number: &'a str,
    status: Option<String>,
    session_id: String,
}

#[derive(Debug, Serialize)]
struct VerifiedWarranty<'a> {
    #[serde(flatten)]
    report: &'a WarrantyReport,
    remaining: String,
}

pub fn run(serial_number: &str, passcode: Option<&str>) -> CommandResult {
    let (config, api) = match connect(COMMAND) {
        Ok(connected) => connected,
        Err(result) => return result,
    };
    let runtime = match runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(lookup(
        &api,
        config.warranty.min_serial_length,
        serial_number,
        passcode,
        Utc::now(),
    ))
}

/// Walks the warranty wizard: serial check, then passcode verification when a
/// passcode was supplied.
pub async fn lookup<A>(
    api: &A,
    min_serial_length: usize,
    serial_number: &str,
    passcode: Option<&str>,
    now: DateTime<Utc>,
) -> CommandResult
where
    A: StorefrontApi + ?Sized,
{
    let mut wizard = WarrantyWizard::new(min_serial_length);
    match drive(&mut wizard, api, serial_number, passcode, now).await {
        Ok(result) | Err(result) => result,
    }
}

async fn drive<A>(
    wizard: &mut WarrantyWizard,
    api: &A,
    serial_number: &str,
    passcode: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandResult>
where
    A: StorefrontApi + ?Sized,
{
    let session_id = wizard.session_id().to_string();
    let flow_error = |error: FlowTransitionError| {
        let interface = ApplicationError::from(error).into_interface(session_id.clone());
        CommandResult::interface(COMMAND, &interface)
    };

    wizard.set_serial(serial_number).map_err(flow_error)?;
    let lookup = wizard.begin_check().map_err(flow_error)?;
    let checked = api.check_warranty(lookup.serial_number()).await;
    let class = check_failure_class(&checked);
    wizard.complete_check(lookup, checked).map_err(flow_error)?;

    if wizard.step() != WarrantyStep::AwaitingPasscode {
        return Err(failure(wizard, class));
    }

    let Some(passcode) = passcode else {
        let pending = PendingPasscode {
            serial_number: wizard.serial_number(),
            status: wizard.status().map(|status| status.to_string()),
            session_id: session_id.clone(),
        };
        let banner = wizard.status_banner().unwrap_or_else(|| "Warranty Found".to_string());
        return Ok(CommandResult::success_with(
            COMMAND,
            format!("{banner}: passcode required"),
            pending,
        ));
    };

    wizard.set_passcode(passcode).map_err(flow_error)?;
    let verification = wizard.begin_verify().map_err(flow_error)?;
    let verified =
        api.verify_warranty(verification.serial_number(), verification.passcode()).await;
    let class = verify_failure_class(&verified);
    wizard.complete_verify(verification, verified, now).map_err(flow_error)?;

    match wizard.report() {
        Some(report) if wizard.step() == WarrantyStep::Result => {
            let payload = VerifiedWarranty { report, remaining: report.remaining_label() };
            let message = report
                .status
                .map(|status| format!("Warranty {status}"))
                .unwrap_or_else(|| "Warranty verified".to_string());
            Ok(CommandResult::success_with(COMMAND, message, payload))
        }
        _ => Err(failure(wizard, class)),
    }
}

fn failure(wizard: &WarrantyWizard, class: ErrorClass) -> CommandResult {
    let message = wizard.error_message().unwrap_or("An error occurred, please try again.");
    CommandResult::classified(COMMAND, class, message)
}

fn check_failure_class(result: &Result<WarrantyCheckOutcome, ApiError>) -> ErrorClass {
    match result {
        Ok(WarrantyCheckOutcome::NotFound | WarrantyCheckOutcome::Inactive { .. }) => {
            ErrorClass::NotFound
        }
        Ok(WarrantyCheckOutcome::Unavailable { .. }) => ErrorClass::Transient,
        Ok(WarrantyCheckOutcome::PasscodeRequired { .. }) => ErrorClass::Unexpected,
        Err(error) => api_class(error),
    }
}

fn verify_failure_class(result: &Result<WarrantyVerifyOutcome, ApiError>) -> ErrorClass {
    match result {
        Ok(WarrantyVerifyOutcome::Rejected { .. }) => ErrorClass::Validation,
        Ok(WarrantyVerifyOutcome::Verified(_)) => ErrorClass::Unexpected,
        Err(error) => api_class(error),
    }
}

fn api_class(error: &ApiError) -> ErrorClass {
    ApplicationError::from(error.clone()).into_interface("cli").class()
}

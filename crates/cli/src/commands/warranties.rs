use serde::Serialize;
use storefront_core::admin::{filter_warranties, StatusFilter, WarrantyQuery, WarrantyStats};
use storefront_core::api::StorefrontApi;
use storefront_core::domain::warranty::WarrantyRecord;
use storefront_core::errors::{ApplicationError, ErrorClass};

use crate::commands::{connect, runtime, CommandResult};

const COMMAND: &str = "warranties";

#[derive(Debug, Serialize)]
struct Directory {
    stats: WarrantyStats,
    warranties: Vec<WarrantyRecord>,
}

pub fn run(status: &str, search: &str) -> CommandResult {
    let (config, api) = match connect(COMMAND) {
        Ok(connected) => connected,
        Err(result) => return result,
    };
    if !config.api.has_admin_token() {
        return CommandResult::config_failure(
            COMMAND,
            "api.admin_token is required (set STOREFRONT_API_ADMIN_TOKEN)",
        );
    }
    let runtime = match runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(list(&api, status, search))
}

/// Lists the admin directory, filtered by status and serial/NIC search. Stats
/// cover the whole directory.
pub async fn list<A>(api: &A, status: &str, search: &str) -> CommandResult
where
    A: StorefrontApi + ?Sized,
{
    let Some(status) = StatusFilter::parse(status) else {
        return CommandResult::classified(
            COMMAND,
            ErrorClass::Validation,
            format!("unknown status filter `{status}` (expected All|Active|Expired|Inactive)"),
        );
    };

    let records = match api.list_warranties().await {
        Ok(records) => records,
        Err(error) => {
            let interface = ApplicationError::from(error).into_interface("cli");
            return CommandResult::interface(COMMAND, &interface);
        }
    };

    let query = WarrantyQuery { status, search: search.to_string() };
    let warranties: Vec<WarrantyRecord> = filter_warranties(&records, &query)
        .into_iter()
        .cloned()
        .map(|mut record| {
            record.passcode = None;
            record
        })
        .collect();
    let directory = Directory { stats: WarrantyStats::from_records(&records), warranties };

    let message =
        format!("Showing {} of {} warranties", directory.warranties.len(), records.len());
    CommandResult::success_with(COMMAND, message, directory)
}

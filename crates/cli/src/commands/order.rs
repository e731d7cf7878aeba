use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use storefront_core::api::{ApiError, OrderReceipt, StorefrontApi};
use storefront_core::catalog::Catalog;
use storefront_core::domain::order::{Color, CustomerField, RamSize, StorageSize};
use storefront_core::domain::product::ProductId;
use storefront_core::errors::{ApplicationError, DomainError, ErrorClass};
use storefront_core::flows::{FlowTransitionError, OrderStep, OrderWizard};

use crate::commands::{connect, runtime, CommandResult};

const COMMAND: &str = "order";

#[derive(Clone, Debug, Default, Args)]
pub struct OrderInput {
    #[arg(long, help = "Catalog id of the product to order")]
    pub product: u32,
    #[arg(long, default_value = "black", help = "black | grey | darkGreen")]
    pub color: String,
    #[arg(long, default_value = "16GB", help = "8GB | 16GB | 32GB | 64GB")]
    pub ram: String,
    #[arg(long, default_value = "512GB", help = "256GB | 512GB | 1TB | 2TB")]
    pub storage: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub mobile: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long)]
    pub zip_code: String,
}

impl OrderInput {
    fn customer_fields(&self) -> [(CustomerField, &str); 7] {
        [
            (CustomerField::FirstName, self.first_name.as_str()),
            (CustomerField::LastName, self.last_name.as_str()),
            (CustomerField::Address, self.address.as_str()),
            (CustomerField::City, self.city.as_str()),
            (CustomerField::Mobile, self.mobile.as_str()),
            (CustomerField::Email, self.email.as_str()),
            (CustomerField::ZipCode, self.zip_code.as_str()),
        ]
    }
}

#[derive(Debug, Serialize)]
struct PlacedOrder<'a> {
    order_id: Option<&'a str>,
    product: &'a str,
    final_price: u32,
    session_id: String,
}

pub fn run(input: &OrderInput) -> CommandResult {
    let (_, api) = match connect(COMMAND) {
        Ok(connected) => connected,
        Err(result) => return result,
    };
    let runtime = match runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(place(&api, &Catalog::storefront(), input, Utc::now()))
}

/// Configures, reviews and submits one order through the order wizard.
pub async fn place<A>(
    api: &A,
    catalog: &Catalog,
    input: &OrderInput,
    now: DateTime<Utc>,
) -> CommandResult
where
    A: StorefrontApi + ?Sized,
{
    let Some(product) = catalog.find(ProductId(input.product)) else {
        let interface = ApplicationError::from(DomainError::UnknownProduct(ProductId(
            input.product,
        )))
        .into_interface("cli");
        return CommandResult::interface(COMMAND, &interface);
    };

    let (Some(color), Some(ram), Some(storage)) = (
        Color::parse(&input.color),
        RamSize::parse(&input.ram),
        StorageSize::parse(&input.storage),
    ) else {
        return CommandResult::classified(
            COMMAND,
            ErrorClass::Validation,
            format!(
                "unsupported configuration: color `{}`, ram `{}`, storage `{}`",
                input.color, input.ram, input.storage
            ),
        );
    };

    let mut wizard = OrderWizard::new(product);
    let session_id = wizard.session_id().to_string();
    let flow_error = |error: FlowTransitionError| {
        let interface = ApplicationError::from(error).into_interface(session_id.clone());
        CommandResult::interface(COMMAND, &interface)
    };

    let configured = wizard
        .select_color(color)
        .and_then(|_| wizard.select_ram(ram))
        .and_then(|_| wizard.select_storage(storage))
        .and_then(|_| wizard.continue_to_details());
    if let Err(error) = configured {
        return flow_error(error);
    }

    for (field, value) in input.customer_fields() {
        if let Err(error) = wizard.update_customer(field, value) {
            return flow_error(error);
        }
    }

    if let Err(error) = wizard.review() {
        if wizard.field_errors().is_empty() {
            return flow_error(error);
        }
        let details: Vec<String> = wizard
            .field_errors()
            .iter()
            .map(|(field, message)| format!("{}: {message}", field.key()))
            .collect();
        return CommandResult::classified(COMMAND, ErrorClass::Validation, details.join("; "));
    }

    let submission = match wizard.begin_submission(now) {
        Ok(submission) => submission,
        Err(error) => return flow_error(error),
    };
    let result = api.submit_order(submission.request()).await;
    let class = submission_failure_class(&result);
    if let Err(error) = wizard.complete_submission(submission, result) {
        return flow_error(error);
    }

    match wizard.receipt() {
        Some(receipt) if wizard.step() == OrderStep::Confirmed => {
            let placed = PlacedOrder {
                order_id: receipt.order_id.as_deref(),
                product: &wizard.product().name,
                final_price: wizard.final_price(),
                session_id,
            };
            let message = receipt
                .message
                .clone()
                .unwrap_or_else(|| "Order placed successfully".to_string());
            CommandResult::success_with(COMMAND, message, placed)
        }
        _ => {
            let message = wizard.error_message().unwrap_or("An error occurred, please try again.");
            CommandResult::classified(COMMAND, class, message)
        }
    }
}

fn submission_failure_class(result: &Result<OrderReceipt, ApiError>) -> ErrorClass {
    match result {
        Ok(_) => ErrorClass::Unexpected,
        Err(error) => ApplicationError::from(error.clone()).into_interface("cli").class(),
    }
}

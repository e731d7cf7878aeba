pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use storefront_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "SNI storefront operator CLI",
    long_about = "Search the catalog, look up warranties, place orders and inspect storefront configuration.",
    after_help = "Examples:\n  storefront catalog --category Gaming --price '$1,000 - $2,000'\n  storefront warranty check SNI-LP-2024-001 --passcode 1234\n  storefront doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Filter the product catalog and print the matching products")]
    Catalog {
        #[arg(long, default_value = "", help = "Text matched against names, specs and features")]
        search: String,
        #[arg(long, default_value = "All", help = "Category label, e.g. Gaming")]
        category: String,
        #[arg(long = "device", default_value = "All", help = "laptop | pc | ipod")]
        device_type: String,
        #[arg(long, help = "Price bucket label, e.g. \"Under $500\" or \"$3,000+\"")]
        price: Option<String>,
        #[arg(long, help = "Load the catalog from a JSON file")]
        file: Option<PathBuf>,
    },
    #[command(subcommand, about = "Warranty lookups")]
    Warranty(WarrantyCommand),
    #[command(about = "Configure and submit an order for one product")]
    Order(commands::order::OrderInput),
    #[command(about = "List the admin warranty directory (requires an admin token)")]
    Warranties {
        #[arg(long, default_value = "All", help = "All | Active | Expired | Inactive")]
        status: String,
        #[arg(long, default_value = "", help = "Substring of a serial or NIC number")]
        search: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, admin token readiness and backend reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Send a probe request to the configured backend")]
        probe: bool,
    },
}

#[derive(Debug, Subcommand)]
enum WarrantyCommand {
    #[command(about = "Check a serial number and, with a passcode, show the coverage report")]
    Check {
        serial_number: String,
        #[arg(long)]
        passcode: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    if let Err(error) = init_logging(&logging) {
        eprintln!("logging disabled: {error:#}");
    }

    let result = match cli.command {
        Command::Catalog { search, category, device_type, price, file } => {
            let query = commands::catalog::CatalogQuery { search, category, device_type, price };
            commands::catalog::run(&query, file.as_deref())
        }
        Command::Warranty(WarrantyCommand::Check { serial_number, passcode }) => {
            commands::warranty::run(&serial_number, passcode.as_deref())
        }
        Command::Order(input) => commands::order::run(&input),
        Command::Warranties { status, search } => commands::warranties::run(&status, &search),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json, probe } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json, probe) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a single JSON payload.
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(anyhow::Error::msg)
}

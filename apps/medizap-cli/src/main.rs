//! # MediZap CLI Entry Point
//!
//! Command-line access to the medicine inventory and the shopping cart.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        medizap (this binary)                            │
//! │                                                                         │
//! │  main.rs ─────► logging, config, database, dispatch                    │
//! │  config.rs ───► AppConfig (env + --db flag)                            │
//! │  commands/ ───► medicines ..., cart ...                                │
//! │  error.rs ────► ApiError { code, message }                             │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │              MedicineCatalog / CartAggregator (medizap-core)           │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │              SqliteStore (medizap-db) ──► medizap.db                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Parse arguments
//! 3. Load configuration, create the data directory
//! 4. Connect to database & run migrations
//! 5. Run the command, print JSON on stdout
//!
//! On failure the `ApiError` is printed as JSON and the exit code is 1.

mod commands;
mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::cart::CartCommand;
use commands::medicine::MedicineCommand;
use commands::Services;
use config::AppConfig;
use error::ApiError;
use medizap_db::{Database, DbConfig};

/// MediZap - medicine inventory and cart
#[derive(Parser)]
#[command(name = "medizap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Database file path (overrides MEDIZAP_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the medicine inventory
    #[command(subcommand)]
    Medicines(MedicineCommand),

    /// Manage the shopping cart
    #[command(subcommand)]
    Cart(CartCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let pretty = cli.pretty;

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = ?err.code, message = %err.message, "Command failed");
            match render(&serde_json::to_value(&err).unwrap_or_default(), pretty) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Runs the parsed command and returns the rendered JSON.
async fn run(cli: Cli) -> Result<String, ApiError> {
    let config = AppConfig::load(cli.db)?;
    config.ensure_db_dir()?;
    info!(path = %config.db_path.display(), "Using database");

    let db = Database::new(
        DbConfig::new(&config.db_path).max_connections(config.max_connections),
    )
    .await?;

    let services = Services::new(db.store());
    let result = match cli.command {
        Commands::Medicines(command) => commands::medicine::run(command, &services).await,
        Commands::Cart(command) => commands::cart::run(command, &services).await,
    };

    db.close().await;
    render(&result?, cli.pretty)
}

fn render(value: &serde_json::Value, pretty: bool) -> Result<String, ApiError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=medizap=trace` - Show trace for medizap crates only
/// - Default: `info,medizap=debug,sqlx=warn`
///
/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,medizap=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! CLI application for receipt ingestion and expense reporting.

mod commands;
mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use commands::{batch, forecast, ingest, report, summary, transactions, CommandContext};

/// expensr - ingest receipt OCR text, report expenses, forecast cash flow
#[derive(Parser)]
#[command(name = "expensr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the store snapshot file
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Organization id scoping every command
    #[arg(short, long, global = true)]
    org: Option<Uuid>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a single OCR text file
    Ingest(ingest::IngestArgs),

    /// Ingest multiple OCR text files
    Batch(batch::BatchArgs),

    /// List transactions with filters
    Transactions(transactions::TransactionsArgs),

    /// Show summary KPIs and the 90-day category breakdown
    Summary(summary::SummaryArgs),

    /// Monthly report by category
    Report(report::ReportArgs),

    /// Weekly cash-flow forecast
    Forecast(forecast::ForecastArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = CommandContext::new(cli.store, cli.org);

    match cli.command {
        Commands::Ingest(args) => ingest::run(args, &ctx),
        Commands::Batch(args) => batch::run(args, &ctx),
        Commands::Transactions(args) => transactions::run(args, &ctx),
        Commands::Summary(args) => summary::run(args, &ctx),
        Commands::Report(args) => report::run(args, &ctx),
        Commands::Forecast(args) => forecast::run(args, &ctx),
    }
}

//! Report command - monthly totals by category.

use chrono::{Datelike, Utc};
use clap::Args;
use console::style;

use expensr_core::aggregate;
use expensr_store::ExpenseStore;

use super::{category_names, CommandContext, OutputFormat};
use crate::store;

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Calendar year (2020..=2030)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: ReportArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let db = store::open(&ctx.store_path)?;
    let year = args.year.unwrap_or_else(|| Utc::now().year());

    let txs = db.transactions(ctx.org)?;
    let categories = category_names(&db, ctx.org)?;
    let rows = aggregate::monthly_report(&txs, &categories, year)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["month", "category", "total"])?;
            for row in &rows {
                wtr.write_record([
                    row.month.format("%Y-%m").to_string(),
                    row.category.clone(),
                    row.total.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No transactions in {year}.");
                return Ok(());
            }
            println!("{}", style(format!("Monthly report {year}")).bold());
            for row in &rows {
                println!(
                    "  {}  {:<24} {:>12}",
                    row.month.format("%Y-%m"),
                    row.category,
                    row.total
                );
            }
        }
    }

    Ok(())
}

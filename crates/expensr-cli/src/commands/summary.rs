//! Summary command - KPIs and the 90-day category breakdown.

use chrono::Utc;
use clap::Args;
use console::style;

use expensr_core::aggregate;
use expensr_store::ExpenseStore;

use super::{category_names, CommandContext, OutputFormat};
use crate::store;

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: SummaryArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let db = store::open(&ctx.store_path)?;

    let txs = db.transactions(ctx.org)?;
    let categories = category_names(&db, ctx.org)?;
    let summary = aggregate::summary(&txs, &categories, Utc::now().date_naive());

    match args.format {
        OutputFormat::Json | OutputFormat::Csv => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!("{}", style("Summary").bold());
            println!("  total expense:   {}", summary.total_expense);
            println!("  receipts:        {}", summary.receipt_count);
            println!("  avg per receipt: {}", summary.avg_per_receipt.round_dp(2));
            match &summary.top_category {
                Some(top) => {
                    println!("  top category:    {} ({})", top.category, top.total)
                }
                None => println!("  top category:    -"),
            }
            if !summary.by_category_90d.is_empty() {
                println!("{}", style("Last 90 days by category").bold());
                for row in &summary.by_category_90d {
                    println!("  {:<24} {:>12}", row.category, row.total);
                }
            }
        }
    }

    Ok(())
}

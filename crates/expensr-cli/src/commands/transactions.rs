//! Transactions command - filtered, paginated listing.

use anyhow::Context;
use clap::Args;
use console::style;

use expensr_core::extract::normalize_date;
use expensr_store::{ExpenseStore, Page, TxFilter};

use super::{CommandContext, OutputFormat};
use crate::store;

/// Arguments for the transactions command.
#[derive(Args)]
pub struct TransactionsArgs {
    /// Inclusive start date (e.g. 2024-01-01)
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive end date
    #[arg(long)]
    pub to: Option<String>,

    /// Category name substring, case-insensitive
    #[arg(long)]
    pub category: Option<String>,

    /// Vendor name substring, case-insensitive
    #[arg(long)]
    pub vendor: Option<String>,

    /// Page size (clamped to 1..=100)
    #[arg(long, default_value_t = Page::DEFAULT_LIMIT)]
    pub limit: u32,

    /// Page offset
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

fn parse_date(raw: &str) -> anyhow::Result<chrono::NaiveDate> {
    normalize_date(raw).with_context(|| format!("unrecognized date: {raw}"))
}

pub fn run(args: TransactionsArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let db = store::open(&ctx.store_path)?;

    let filter = TxFilter {
        from: args.from.as_deref().map(parse_date).transpose()?,
        to: args.to.as_deref().map(parse_date).transpose()?,
        category: args.category.clone(),
        vendor: args.vendor.clone(),
    };
    let page = Page::new(args.limit, args.offset);

    let (items, total) = db.query_transactions(ctx.org, &filter, page)?;

    match args.format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "items": items,
                "total": total,
                "limit": page.limit,
                "offset": page.offset,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record([
                "id",
                "date",
                "amount",
                "currency",
                "vendor",
                "category",
                "description",
                "type",
            ])?;
            for item in &items {
                wtr.write_record([
                    item.id.to_string(),
                    item.effective_date.to_string(),
                    item.amount.to_string(),
                    item.currency.clone(),
                    item.vendor_name.clone().unwrap_or_default(),
                    item.category_name.clone().unwrap_or_default(),
                    item.description.clone(),
                    item.kind.as_str().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No transactions match.");
                return Ok(());
            }
            for item in &items {
                println!(
                    "{}  {:>10} {}  {:<24} {:<18} {}",
                    item.effective_date,
                    item.amount,
                    item.currency,
                    item.vendor_name.as_deref().unwrap_or("-"),
                    item.category_name.as_deref().unwrap_or("-"),
                    style(item.kind.as_str()).dim(),
                );
            }
            println!(
                "{}",
                style(format!(
                    "showing {} of {} (offset {})",
                    items.len(),
                    total,
                    page.offset
                ))
                .dim()
            );
        }
    }

    Ok(())
}

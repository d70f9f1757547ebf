//! Forecast command - weekly cash-flow projection.

use chrono::Utc;
use clap::Args;
use console::style;

use expensr_core::aggregate;
use expensr_core::forecast::{project_with_cache, ForecastStatus};
use expensr_core::ExpensrConfig;
use expensr_store::ExpenseStore;

use super::{CommandContext, OutputFormat};
use crate::store;

/// Arguments for the forecast command.
#[derive(Args)]
pub struct ForecastArgs {
    /// Recompute even when a fresh cached forecast exists
    #[arg(long)]
    pub refresh: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: ForecastArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let db = store::open(&ctx.store_path)?;

    let txs = db.transactions(ctx.org)?;
    let history = aggregate::weekly_cash_flow(&txs);

    let mut config = ExpensrConfig::default().forecast;
    if args.refresh {
        // A zero freshness window forces recomputation.
        config.cache_max_age_hours = 0;
    }

    let forecast = project_with_cache(&db, ctx.org, &history, &config, Utc::now())?;
    store::save(&db, &ctx.store_path)?;

    match args.format {
        OutputFormat::Json | OutputFormat::Csv => {
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        }
        OutputFormat::Text => match &forecast.status {
            ForecastStatus::InsufficientData { required, available } => {
                println!(
                    "{}",
                    style(format!(
                        "Insufficient data for forecasting: {available} of {required} \
                         required weeks of history"
                    ))
                    .yellow()
                );
            }
            ForecastStatus::Ok => {
                println!("{}", style("Weekly net cash flow").bold());
                for point in &forecast.series {
                    match (point.observed_net, point.forecast_net) {
                        (Some(net), _) => println!("  {}  {:>12}", point.week, net),
                        (_, Some(net)) => println!(
                            "  {}  {:>12}  {}",
                            point.week,
                            net,
                            style("forecast").cyan()
                        ),
                        _ => {}
                    }
                }
            }
        },
    }

    Ok(())
}

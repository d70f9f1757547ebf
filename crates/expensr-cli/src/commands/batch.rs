//! Batch command - ingest multiple OCR text files.

use std::fs;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use uuid::Uuid;

use expensr_core::{ExpensrConfig, IngestRequest, Ingestor};

use super::ingest::KindArg;
use super::CommandContext;
use crate::store;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of OCR text files (e.g. "receipts/*.txt")
    #[arg(required = true)]
    pub pattern: String,

    /// Transaction direction for every file
    #[arg(short, long, value_enum, default_value = "expense")]
    pub kind: KindArg,

    /// Uploading user id (anonymous when omitted)
    #[arg(short, long)]
    pub user: Option<Uuid>,
}

pub fn run(args: BatchArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let db = store::open(&ctx.store_path)?;

    let paths: Vec<_> = glob::glob(&args.pattern)?.filter_map(Result::ok).collect();
    if paths.is_empty() {
        anyhow::bail!("no files match pattern: {}", args.pattern);
    }

    let mut config = ExpensrConfig::default();
    config.identity.allow_anonymous = true;
    let ingestor = Ingestor::new(&db, &db, config);

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut ingested = 0usize;
    let mut failed = 0usize;

    for path in &paths {
        pb.set_message(path.display().to_string());

        let outcome = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| {
                ingestor
                    .ingest(IngestRequest {
                        organization_id: ctx.org,
                        uploaded_by: args.user,
                        file: None,
                        ocr_text: text,
                        kind: args.kind.into(),
                    })
                    .map_err(anyhow::Error::from)
            });

        match outcome {
            Ok(_) => ingested += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ingestion failed");
                failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    store::save(&db, &ctx.store_path)?;

    println!(
        "{} {} ingested, {} failed",
        style("Batch complete:").bold(),
        style(ingested).green(),
        if failed > 0 {
            style(failed).red()
        } else {
            style(failed).dim()
        }
    );

    Ok(())
}

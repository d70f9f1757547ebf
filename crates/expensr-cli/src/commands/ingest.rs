//! Ingest command - process a single OCR text file.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use uuid::Uuid;

use expensr_core::{ExpensrConfig, FileUpload, IngestRequest, Ingestor};
use expensr_store::TxKind;

use super::{CommandContext, OutputFormat};
use crate::store;

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// OCR text file to ingest
    #[arg(required = true)]
    pub input: PathBuf,

    /// Transaction direction
    #[arg(short, long, value_enum, default_value = "expense")]
    pub kind: KindArg,

    /// Uploading user id (anonymous when omitted)
    #[arg(short, long)]
    pub user: Option<Uuid>,

    /// Attach the original scanned file
    #[arg(long)]
    pub attach: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KindArg {
    Expense,
    Income,
}

impl From<KindArg> for TxKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Expense => TxKind::Expense,
            KindArg::Income => TxKind::Income,
        }
    }
}

pub fn run(args: IngestArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let db = store::open(&ctx.store_path)?;

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let file = match &args.attach {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("attachment")
                .to_string();
            Some(FileUpload { bytes, filename })
        }
        None => None,
    };

    // A local operator tool has no session layer; unattributed ingestions
    // fall back to the per-org placeholder principal.
    let mut config = ExpensrConfig::default();
    config.identity.allow_anonymous = true;

    let ingestor = Ingestor::new(&db, &db, config);
    let receipt = ingestor.ingest(IngestRequest {
        organization_id: ctx.org,
        uploaded_by: args.user,
        file,
        ocr_text: text,
        kind: args.kind.into(),
    })?;

    store::save(&db, &ctx.store_path)?;

    match args.format {
        OutputFormat::Json | OutputFormat::Csv => {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        OutputFormat::Text => {
            println!("{}", style("Ingested").green().bold());
            println!(
                "  vendor:    {}",
                receipt.fields.vendor.as_deref().unwrap_or("-")
            );
            println!(
                "  date:      {}",
                receipt
                    .fields
                    .invoice_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  invoice #: {}",
                receipt.fields.invoice_number.as_deref().unwrap_or("-")
            );
            println!(
                "  total:     {} {}",
                receipt.fields.currency, receipt.fields.total_amount
            );
            println!("  category:  {}", receipt.category);
            println!("  tx id:     {}", receipt.transaction_id);
            if let Some(url) = &receipt.blob_url {
                println!("  blob:      {url}");
            }
        }
    }

    Ok(())
}

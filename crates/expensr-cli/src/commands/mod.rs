//! CLI subcommands.

pub mod batch;
pub mod forecast;
pub mod ingest;
pub mod report;
pub mod summary;
pub mod transactions;

use std::collections::HashMap;
use std::path::PathBuf;

use uuid::Uuid;

use expensr_store::{ExpenseStore, MemoryStore};

use crate::store::default_store_path;

/// Shared command context resolved from global flags.
pub struct CommandContext {
    pub store_path: PathBuf,
    pub org: Uuid,
}

impl CommandContext {
    pub fn new(store_path: Option<PathBuf>, org: Option<Uuid>) -> Self {
        Self {
            store_path: store_path.unwrap_or_else(default_store_path),
            org: org.unwrap_or_else(Uuid::nil),
        }
    }
}

/// Output format shared by the reporting commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Category id → name map for one organization.
pub fn category_names(store: &MemoryStore, org: Uuid) -> anyhow::Result<HashMap<Uuid, String>> {
    Ok(store
        .categories(org)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

/// Vendor id → name map for one organization.
pub fn vendor_names(store: &MemoryStore, org: Uuid) -> anyhow::Result<HashMap<Uuid, String>> {
    Ok(store
        .vendors(org)?
        .into_iter()
        .map(|v| (v.id, v.name))
        .collect())
}

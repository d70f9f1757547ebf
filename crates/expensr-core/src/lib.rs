//! Core library for the expensr ingestion and reporting pipeline.
//!
//! This crate provides:
//! - OCR text normalization for storage
//! - Receipt field extraction (vendor, date, invoice number, amount, currency)
//! - Two-tier expense classification (AI collaborator + keyword fallback)
//! - Transaction aggregation (summary KPIs, monthly report, weekly cash flow)
//! - Trend-adjusted moving-average cash-flow forecasting
//! - The ingestion orchestrator tying extraction, classification, and
//!   persistence together

pub mod aggregate;
pub mod ai;
pub mod classify;
pub mod error;
pub mod extract;
pub mod forecast;
pub mod ingest;
pub mod insight;
pub mod models;
pub mod normalize;

pub use classify::{CategoryLabel, ClassifierStack};
pub use error::{ExpensrError, Result};
pub use extract::ReceiptParser;
pub use forecast::{Forecast, ForecastPoint, ForecastStatus};
pub use ingest::{FileUpload, IngestReceipt, IngestRequest, Ingestor};
pub use models::config::ExpensrConfig;
pub use models::fields::ParsedFields;
pub use normalize::normalize;

//! Row types exchanged with the store collaborators.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum stored length for vendor and category names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum stored length for transaction descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Expense,
    Income,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Expense => "expense",
            TxKind::Income => "income",
        }
    }
}

/// Outcome of a duplicate-tolerant get-or-create operation.
///
/// Uniqueness of (organization, name) is advisory, not enforced by the
/// backend, so two racing calls may both insert. The tagged outcome lets
/// callers observe which path was taken; none of the paths is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// A new row was inserted on the first attempt.
    Created,
    /// An existing row was found, before or after a failed insert.
    Existing,
    /// The insert collided, the retry lookup still missed, and a row was
    /// inserted under a fresh id. A duplicate may now exist.
    CreatedAfterRetry,
}

/// An ingested document: the uploaded file reference plus its OCR text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Original filename, clamped to 255 chars.
    pub name: String,
    /// Reference URL returned by the blob store, when a file was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_url: Option<String>,
    /// Normalized OCR text as stored.
    pub raw_text: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A vendor row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A category row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted transaction. Insert-only: never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<Uuid>,
    pub category_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    pub kind: TxKind,
    pub created_at: DateTime<Utc>,
}

impl TransactionRow {
    /// The date a transaction is bucketed under: the invoice date when one
    /// was extracted, else the ingestion date.
    pub fn effective_date(&self) -> NaiveDate {
        self.invoice_date.unwrap_or_else(|| self.created_at.date_naive())
    }
}

/// A transaction joined with its vendor and category names, as returned by
/// the listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: Uuid,
    pub effective_date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub description: String,
    pub kind: TxKind,
}

/// A cached forecast result.
///
/// The series is stored as opaque JSON so the cache does not depend on the
/// core's series types; it is returned as-is while fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredForecast {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Number of projected periods.
    pub horizon: u32,
    /// Period granularity, e.g. "week".
    pub granularity: String,
    pub series: serde_json::Value,
    pub computed_at: DateTime<Utc>,
}

//! Structured fields extracted from receipt OCR text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accounting fields parsed from a single receipt or invoice.
///
/// Derived deterministically from the raw OCR text and consumed into a
/// transaction within the ingestion call that produced it. Every field is
/// best-effort: a sub-parser that finds nothing yields the documented
/// default, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    /// Vendor name from near the top of the receipt, ≤ 100 chars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Invoice date in canonical form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Invoice/receipt/reference number, ≤ 100 chars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Grand total: the largest money-like figure found. Zero when none.
    pub total_amount: Decimal,

    /// Resolved 3-letter currency code (default: MYR).
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "MYR".to_string()
}

impl Default for ParsedFields {
    fn default() -> Self {
        Self {
            vendor: None,
            invoice_date: None,
            invoice_number: None,
            total_amount: Decimal::ZERO,
            currency: default_currency(),
        }
    }
}

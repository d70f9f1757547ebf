//! Receipt parser combining the individual field rules.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::fields::ParsedFields;

use super::amounts::extract_total;
use super::currency::extract_currency;
use super::dates::DateRule;
use super::invoice_no::InvoiceNumberRule;
use super::vendor::VendorRule;
use super::FieldRule;

/// Deterministic receipt field parser.
///
/// Runs on the raw, line-structured OCR text (the vendor rule needs line
/// boundaries); persistence-side normalization happens separately. Total:
/// any sub-rule that finds nothing degrades to its documented default.
pub struct ReceiptParser {
    default_currency: String,
    vendor_rule: VendorRule,
}

impl ReceiptParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            default_currency: config.default_currency.clone(),
            vendor_rule: VendorRule::new().with_scan_lines(config.vendor_scan_lines),
        }
    }

    /// Parse vendor, invoice date, invoice number, total amount, and
    /// currency out of receipt text.
    pub fn parse(&self, text: &str) -> ParsedFields {
        if text.trim().is_empty() {
            return ParsedFields {
                currency: self.default_currency.clone(),
                ..ParsedFields::default()
            };
        }

        let fields = ParsedFields {
            vendor: self.vendor_rule.extract(text),
            invoice_date: DateRule::new().extract(text),
            invoice_number: InvoiceNumberRule::new().extract(text),
            total_amount: extract_total(text),
            currency: extract_currency(text, &self.default_currency),
        };

        debug!(
            vendor = fields.vendor.as_deref().unwrap_or("-"),
            total = %fields.total_amount,
            currency = %fields.currency,
            "parsed receipt fields"
        );

        fields
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

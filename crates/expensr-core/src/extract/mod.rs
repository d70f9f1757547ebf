//! Rule-based field extractors for receipt OCR text.

pub mod amounts;
pub mod currency;
pub mod dates;
pub mod invoice_no;
pub mod parser;
pub mod patterns;
pub mod vendor;

pub use amounts::{extract_total, validate_amount, AmountRule};
pub use currency::extract_currency;
pub use dates::{normalize_date, DateRule};
pub use invoice_no::InvoiceNumberRule;
pub use parser::ReceiptParser;
pub use vendor::{vendor_keywords, VendorRule};

/// Trait for field extraction rules.
///
/// Every rule is total: malformed or absent input yields `None` / an empty
/// vector, never an error.
pub trait FieldRule {
    /// The type of value this rule produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

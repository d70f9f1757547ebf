//! Vendor name extraction.

use super::patterns::{DIGIT_GROUPS_ONLY, PHONE_LIKE, WORD};
use super::FieldRule;

/// Words that disqualify a line from being a vendor name. Receipt
/// boilerplate shows up anywhere; the vendor name does not contain it.
const STOP_WORDS: [&str; 24] = [
    "total", "subtotal", "tax", "invoice", "receipt", "amount", "cashier", "date", "time",
    "thank", "you", "welcome", "payment", "change", "balance", "gst", "vat", "service", "charge",
    "www", "http", "email", "phone", "tel",
];

/// Generic receipt words excluded from classification keywords.
const GENERIC_WORDS: [&str; 25] = [
    "RECEIPT", "INVOICE", "BILL", "TOTAL", "SUBTOTAL", "TAX", "GST", "VAT", "PAYMENT", "CASH",
    "CARD", "CREDIT", "DEBIT", "CHANGE", "BALANCE", "DATE", "TIME", "CASHIER", "THANK", "YOU",
    "WELCOME", "CUSTOMER", "SERVICE", "CHARGE", "AMOUNT",
];

const MIN_LINE_LEN: usize = 3;
const MAX_LINE_LEN: usize = 60;
const MAX_VENDOR_LEN: usize = 100;
const MAX_KEYWORDS: usize = 10;

/// Default number of leading non-blank lines scanned.
pub const DEFAULT_SCAN_LINES: usize = 15;

/// Vendor name extraction rule.
///
/// The vendor name is assumed to appear near the top of the receipt: the
/// first of the leading non-blank lines that survives cleaning and the
/// boilerplate/numeric filters wins.
pub struct VendorRule {
    scan_lines: usize,
}

impl VendorRule {
    pub fn new() -> Self {
        Self {
            scan_lines: DEFAULT_SCAN_LINES,
        }
    }

    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }

    fn candidate(line: &str) -> Option<String> {
        let clean: String = line
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '&' | '-' | '.' | ','))
            .collect();
        let clean = clean.trim().to_string();

        let len = clean.chars().count();
        if len < MIN_LINE_LEN || len > MAX_LINE_LEN {
            return None;
        }

        let lower = clean.to_lowercase();
        if STOP_WORDS.iter().any(|w| lower.contains(w)) {
            return None;
        }

        // Mostly numbers, or address/phone shaped.
        if DIGIT_GROUPS_ONLY.is_match(&clean) || PHONE_LIKE.is_match(&clean) {
            return None;
        }
        let digits = clean.chars().filter(|c| c.is_ascii_digit()).count();
        if digits * 2 > len {
            return None;
        }

        Some(clean.chars().take(MAX_VENDOR_LEN).collect())
    }
}

impl Default for VendorRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for VendorRule {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(self.scan_lines)
            .filter_map(Self::candidate)
            .collect()
    }
}

/// Distinct meaningful words from the text, for classification context.
///
/// Upper-cased alphabetic words of at least 3 chars, minus generic receipt
/// vocabulary, first 10 in order of appearance.
pub fn vendor_keywords(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    let mut keywords: Vec<String> = Vec::new();
    for m in WORD.find_iter(&upper) {
        let word = m.as_str();
        if GENERIC_WORDS.contains(&word) {
            continue;
        }
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }
    keywords
}

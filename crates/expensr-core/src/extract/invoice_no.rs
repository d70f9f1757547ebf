//! Invoice/receipt number extraction.

use regex::Regex;

use super::patterns::{INVOICE_NUMBER, RECEIPT_NUMBER, REFERENCE_NUMBER};
use super::FieldRule;

/// Minimum accepted token length; shorter captures are label noise.
const MIN_TOKEN_LEN: usize = 3;

/// Maximum stored token length.
const MAX_TOKEN_LEN: usize = 100;

fn patterns() -> [&'static Regex; 3] {
    [&INVOICE_NUMBER, &RECEIPT_NUMBER, &REFERENCE_NUMBER]
}

/// Document number extraction rule.
///
/// Label-prefixed patterns ("invoice no", "receipt #", "ref:") are tried in
/// order; the first whose captured token is at least 3 characters wins.
pub struct InvoiceNumberRule;

impl InvoiceNumberRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberRule {
    fn default() -> Self {
        Self::new()
    }
}

fn accept(token: &str) -> Option<String> {
    let token = token.trim();
    if token.chars().count() >= MIN_TOKEN_LEN {
        Some(token.chars().take(MAX_TOKEN_LEN).collect())
    } else {
        None
    }
}

impl FieldRule for InvoiceNumberRule {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        for pattern in patterns() {
            if let Some(caps) = pattern.captures(text) {
                if let Some(token) = accept(&caps[1]) {
                    return Some(token);
                }
            }
        }
        None
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        for pattern in patterns() {
            for caps in pattern.captures_iter(text) {
                if let Some(token) = accept(&caps[1]) {
                    if !results.contains(&token) {
                        results.push(token);
                    }
                }
            }
        }
        results
    }
}

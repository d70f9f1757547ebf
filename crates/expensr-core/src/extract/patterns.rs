//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Money pattern: 1-3 leading digits, optional comma thousands groups,
    // exactly two decimal places (e.g. "1,234.56", "9.90").
    pub static ref AMOUNT: Regex = Regex::new(
        r"\d{1,3}(?:,\d{3})*\.\d{2}"
    ).unwrap();

    // Positional date patterns, matched against text with all whitespace
    // removed. Tried in declaration order; separators -, /, .
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(20\d{2}|19\d{2})[-/.](0?[1-9]|1[0-2])[-/.](0?[1-9]|[12]\d|3[01])\b"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(0?[1-9]|[12]\d|3[01])[-/.](0?[1-9]|1[0-2])[-/.](20\d{2}|19\d{2})\b"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(0?[1-9]|1[0-2])[-/.](0?[1-9]|[12]\d|3[01])[-/.](20\d{2}|19\d{2})\b"
    ).unwrap();

    // Label-prefixed document number patterns, tried in declaration order.
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:invoice|inv|bill)\s*(?:no\.?|#|num(?:ber)?)?\s*[:\-]?\s*([A-Za-z0-9\-/]+)"
    ).unwrap();

    pub static ref RECEIPT_NUMBER: Regex = Regex::new(
        r"(?i)receipt\s*(?:no\.?|#)?\s*[:\-]?\s*([A-Za-z0-9\-/]+)"
    ).unwrap();

    pub static ref REFERENCE_NUMBER: Regex = Regex::new(
        r"(?i)ref(?:erence)?\s*(?:no\.?|#)?\s*[:\-]?\s*([A-Za-z0-9\-/]+)"
    ).unwrap();

    // Vendor line rejection: mostly-numeric lines and phone-like digit
    // groups are never vendor names.
    pub static ref DIGIT_GROUPS_ONLY: Regex = Regex::new(
        r"^\d+[\d\s\-]*$"
    ).unwrap();

    pub static ref PHONE_LIKE: Regex = Regex::new(
        r"\d{3,}[-\s]\d{3,}"
    ).unwrap();

    // Currency codes as standalone words, checked against upper-cased text.
    pub static ref CODE_USD: Regex = Regex::new(r"\bUSD\b").unwrap();
    pub static ref CODE_EUR: Regex = Regex::new(r"\bEUR\b|€").unwrap();
    pub static ref CODE_GBP: Regex = Regex::new(r"\bGBP\b|£").unwrap();
    pub static ref CODE_SGD: Regex = Regex::new(r"\bSGD\b|S\$").unwrap();
    pub static ref CODE_MYR: Regex = Regex::new(r"\bMYR\b|RM\b").unwrap();
    pub static ref CODE_THB: Regex = Regex::new(r"\bTHB\b|฿").unwrap();
    pub static ref CODE_INR: Regex = Regex::new(r"\bINR\b|₹").unwrap();
    pub static ref CODE_JPY: Regex = Regex::new(r"\bJPY\b|¥").unwrap();

    // Alphabetic words for classification context keywords.
    pub static ref WORD: Regex = Regex::new(r"\b[A-Za-z]{3,}\b").unwrap();
}

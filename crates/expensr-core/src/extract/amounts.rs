//! Amount extraction for receipts.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT;
use super::FieldRule;

/// Money amount extraction rule.
pub struct AmountRule;

impl AmountRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for AmountRule {
    type Output = Decimal;

    /// The grand total is assumed to be the largest money-like figure on
    /// the receipt.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().max()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT
            .find_iter(text)
            .filter_map(|m| Decimal::from_str(&m.as_str().replace(',', "")).ok())
            .collect()
    }
}

/// Extract the receipt total: the maximum matched amount, zero when the
/// text contains no money-like figure.
pub fn extract_total(text: &str) -> Decimal {
    AmountRule::new().extract(text).unwrap_or(Decimal::ZERO)
}

/// Parse free-form amount input into a non-negative decimal.
///
/// Currency symbols and separators are stripped; anything unparseable or
/// negative resolves to zero.
pub fn validate_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&cleaned)
        .ok()
        .filter(|d| !d.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

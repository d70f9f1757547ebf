//! Currency detection.

use regex::Regex;

use super::patterns::{
    CODE_EUR, CODE_GBP, CODE_INR, CODE_JPY, CODE_MYR, CODE_SGD, CODE_THB, CODE_USD,
};

/// Detect the receipt currency from symbols/codes in priority order,
/// falling back to `fallback` when nothing matches.
///
/// The scan runs over the upper-cased text. A bare `$` counts as USD only
/// when not immediately followed by a digit, so amounts written with a
/// regional dollar prefix ("S$5.00") are left for the later entries.
pub fn extract_currency(text: &str, fallback: &str) -> String {
    if text.is_empty() {
        return fallback.to_string();
    }

    let upper = text.to_uppercase();

    let priority: [(&Regex, &str); 8] = [
        (&CODE_USD, "USD"),
        (&CODE_EUR, "EUR"),
        (&CODE_GBP, "GBP"),
        (&CODE_SGD, "SGD"),
        (&CODE_MYR, "MYR"),
        (&CODE_THB, "THB"),
        (&CODE_INR, "INR"),
        (&CODE_JPY, "JPY"),
    ];

    for (pattern, code) in priority {
        let hit = match code {
            "USD" => pattern.is_match(&upper) || has_bare_dollar(&upper),
            _ => pattern.is_match(&upper),
        };
        if hit {
            return code.to_string();
        }
    }

    fallback.to_string()
}

/// A dollar sign not immediately followed by a digit. The `regex` crate has
/// no lookahead, so this is a manual scan.
fn has_bare_dollar(text: &str) -> bool {
    text.char_indices().any(|(i, c)| {
        c == '$'
            && !text[i + 1..]
                .chars()
                .next()
                .is_some_and(|next| next.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_detection() {
        assert_eq!(extract_currency("Total USD 12.00", "MYR"), "USD");
        assert_eq!(extract_currency("total: 12.00 eur", "MYR"), "EUR");
        assert_eq!(extract_currency("£3.20 cappuccino", "MYR"), "GBP");
        assert_eq!(extract_currency("Betrag 12,00 €", "MYR"), "EUR");
    }

    #[test]
    fn test_regional_symbols() {
        assert_eq!(extract_currency("RM 124.50", "MYR"), "MYR");
        assert_eq!(extract_currency("S$5.00 kopi", "MYR"), "SGD");
        assert_eq!(extract_currency("฿ 150.00", "MYR"), "THB");
        assert_eq!(extract_currency("¥1200", "MYR"), "JPY");
    }

    #[test]
    fn test_bare_dollar_is_usd() {
        assert_eq!(extract_currency("Total: $ 12.00", "MYR"), "USD");
        // `$` directly before a digit is not claimed by USD; with nothing
        // else present the fallback applies.
        assert_eq!(extract_currency("Total: $12.00", "MYR"), "MYR");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(extract_currency("no currency here", "MYR"), "MYR");
        assert_eq!(extract_currency("", "SGD"), "SGD");
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        assert_eq!(extract_currency("USD equivalent of RM 50.00", "MYR"), "USD");
    }
}

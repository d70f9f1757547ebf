//! Date extraction for receipts.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE_DMY, DATE_MDY, DATE_YMD};
use super::FieldRule;

/// Field order of a positional date pattern.
#[derive(Clone, Copy)]
enum DateOrder {
    Ymd,
    Dmy,
    Mdy,
}

fn patterns() -> [(&'static Regex, DateOrder); 3] {
    [
        (&DATE_YMD, DateOrder::Ymd),
        (&DATE_DMY, DateOrder::Dmy),
        (&DATE_MDY, DateOrder::Mdy),
    ]
}

fn capture_date(caps: &regex::Captures<'_>, order: DateOrder) -> Option<NaiveDate> {
    let (y, m, d) = match order {
        DateOrder::Ymd => (&caps[1], &caps[2], &caps[3]),
        DateOrder::Dmy => (&caps[3], &caps[2], &caps[1]),
        DateOrder::Mdy => (&caps[3], &caps[1], &caps[2]),
    };
    let year: i32 = y.parse().unwrap_or(0);
    let month: u32 = m.parse().unwrap_or(0);
    let day: u32 = d.parse().unwrap_or(0);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Invoice date extraction rule.
///
/// Matches against a copy of the text with spaces removed, so dates broken
/// across OCR tokens ("2024 - 01 - 15") still parse. Line breaks are kept:
/// the patterns are word-boundary anchored and need them as token
/// boundaries. Patterns are tried in a fixed order; the first whose match
/// is a valid calendar date wins.
pub struct DateRule;

impl DateRule {
    pub fn new() -> Self {
        Self
    }

    fn compact(text: &str) -> String {
        text.chars().filter(|c| *c != ' ').collect()
    }
}

impl Default for DateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for DateRule {
    type Output = NaiveDate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let compact = Self::compact(text);
        for (pattern, order) in patterns() {
            if let Some(caps) = pattern.captures(&compact) {
                if let Some(date) = capture_date(&caps, order) {
                    return Some(date);
                }
            }
        }
        None
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let compact = Self::compact(text);
        let mut results: Vec<NaiveDate> = Vec::new();
        for (pattern, order) in patterns() {
            for caps in pattern.captures_iter(&compact) {
                if let Some(date) = capture_date(&caps, order) {
                    if !results.contains(&date) {
                        results.push(date);
                    }
                }
            }
        }
        results
    }
}

/// Normalize a stand-alone date string to a calendar date.
///
/// Used for CLI/query filter input rather than receipt text; accepts the
/// common separator variants and returns `None` when nothing parses.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 8] = [
        "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y", "%Y/%m/%d", "%d.%m.%Y",
        "%m.%d.%Y",
    ];

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '/' | '-' | '.'))
        .collect();

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}

//! OCR text normalization for storage.

/// Default maximum stored text length, in chars.
pub const DEFAULT_MAX_CHARS: usize = 3500;

/// Clean raw OCR text for persistence and downstream display.
///
/// Strips C0/C1 control characters (keeping tab, newline, and carriage
/// return for the whitespace collapse to consume), collapses whitespace
/// runs to a single space, trims, and truncates to `max_chars`.
///
/// Total and idempotent: `normalize(normalize(s, n), n) == normalize(s, n)`.
pub fn normalize(raw: &str, max_chars: usize) -> String {
    let filtered: String = raw.chars().filter(|c| !is_stripped_control(*c)).collect();
    let collapsed = filtered.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(max_chars).collect();
    // Truncation can land on a space; trim again so the result is stable.
    truncated.trim_end().to_string()
}

fn is_stripped_control(c: char) -> bool {
    matches!(c,
        '\u{00}'..='\u{08}'
        | '\u{0b}'
        | '\u{0c}'
        | '\u{0e}'..='\u{1f}'
        | '\u{7f}'..='\u{84}'
        | '\u{86}'..='\u{9f}')
}

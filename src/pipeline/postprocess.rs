//! Post-processing: deterministic cleanup of model-generated summaries.
//!
//! Even well-prompted models wrap answers in code fences, prefix them with a
//! "Summary:" label, or break them over several lines. Partial summaries are
//! joined with a single space and drawn on one line of the output PDF, so
//! every partial must come back as one clean run of prose.
//!
//! ## Rule Order
//!
//! Fences are stripped before labels so the label check sees the first real
//! line; whitespace is collapsed last so earlier rules can rely on line
//! structure.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a raw model answer.
///
/// Rules (applied in order):
/// 1. Strip outer code fences
/// 2. Normalise line endings (CRLF → LF)
/// 3. Strip a leading "Summary:"-style label
/// 4. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 5. Collapse all whitespace runs, including newlines, to one space and trim
pub fn clean_summary(input: &str) -> String {
    let s = strip_fences(input);
    let s = normalise_line_endings(&s);
    let s = strip_leading_label(&s);
    let s = remove_invisible_chars(&s);
    collapse_whitespace(&s)
}

// ── Rule 1: Strip outer fences ───────────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\r?\n(.*)\n```\s*$").unwrap());

fn strip_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Strip leading label ──────────────────────────────────────────────

static RE_LEADING_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*|#+\s*)?(?:here is (?:a|the) )?summary(?: of the (?:text|fragment))?\s*(?:\*\*)?\s*:\s*(?:\*\*)?\s*")
        .unwrap()
});

fn strip_leading_label(input: &str) -> String {
    RE_LEADING_LABEL.replace(input, "").to_string()
}

// ── Rule 4: Remove invisible Unicode characters ──────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 5: Collapse whitespace ──────────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

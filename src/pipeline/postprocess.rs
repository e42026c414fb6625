//! Post-processing: deterministic cleanup of text recovered from the page.
//!
//! ## Why is post-processing necessary?
//!
//! PDF text layers are written for *printing*, not for reading back. What
//! comes out of the glyph stream routinely carries artefacts that would look
//! wrong in an editable document:
//!
//! - Typographic ligatures (`ﬁ`, `ﬂ`) stored as single code points
//! - Zero-width spaces, soft hyphens and BOMs left by the producing tool
//! - Words broken across lines with a trailing hyphen
//! - Runs of spaces where the layout engine justified a line
//!
//! Each rule below is a pure `&str → String` function, independently
//! testable. Numeric cell typing for workbooks lives here too since it is
//! the same kind of string rule.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply the text rules to one paragraph or cell.
///
/// Rules (applied in order):
/// 1. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 2. Expand typographic ligatures
/// 3. Replace control characters with spaces
/// 4. Collapse runs of whitespace and trim
pub fn clean_text(input: &str) -> String {
    let s = remove_invisible_chars(input);
    let s = expand_ligatures(&s);
    let s = replace_control_chars(&s);
    collapse_whitespace(&s)
}

// ── Rule 1: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 2: Expand ligatures ────────────────────────────────────────────────

fn expand_ligatures(input: &str) -> String {
    if !input.chars().any(|c| ('\u{FB00}'..='\u{FB06}').contains(&c)) {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => out.push_str("st"),
            other => out.push(other),
        }
    }
    out
}

// ── Rule 3: Control characters ──────────────────────────────────────────────

fn replace_control_chars(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

// ── Rule 4: Collapse whitespace ─────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input.trim(), " ").to_string()
}

// ── Line joining ────────────────────────────────────────────────────────────

/// Append `next` to the paragraph text `acc`.
///
/// A line ending in a hyphen that directly follows a letter is a word split
/// by the line break. When the next line starts lowercase the hyphen is a
/// soft break and is dropped; otherwise it belongs to a compound and is kept.
/// In both cases the halves are joined without a space.
pub fn join_line(acc: &str, next: &str) -> String {
    let next = next.trim();
    if acc.is_empty() {
        return next.to_string();
    }
    if next.is_empty() {
        return acc.to_string();
    }

    let mut chars = acc.chars().rev();
    let split_word = chars.next() == Some('-') && chars.next().is_some_and(char::is_alphabetic);

    if !split_word {
        format!("{} {}", acc, next)
    } else if next.chars().next().is_some_and(char::is_lowercase) {
        format!("{}{}", &acc[..acc.len() - 1], next)
    } else {
        format!("{}{}", acc, next)
    }
}

// ── Numeric cells ───────────────────────────────────────────────────────────

static RE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<open>\()?(?P<sign>[-+])?(?P<digits>\d{1,3}(?:,\d{3})+|\d+)(?P<frac>\.\d+)?(?P<close>\))?$")
        .unwrap()
});

/// Parse a cell that holds a plain number.
///
/// Accepts thousands separators (`1,234`), a leading sign and accounting
/// negatives (`(42.50)`). Anything else, including percentages, currency
/// and leading-zero identifiers like `007`, stays text.
pub fn parse_number(cell: &str) -> Option<f64> {
    let s = cell.trim();
    let caps = RE_NUMBER.captures(s)?;
    if caps.name("open").is_some() != caps.name("close").is_some() {
        return None;
    }
    let digits = caps.name("digits")?.as_str();
    if digits.len() > 1 && digits.starts_with('0') && caps.name("frac").is_none() {
        return None;
    }

    let mut plain = digits.replace(',', "");
    if let Some(frac) = caps.name("frac") {
        plain.push_str(frac.as_str());
    }
    let value: f64 = plain.parse().ok()?;

    let negative = caps.name("open").is_some() || caps.name("sign").is_some_and(|m| m.as_str() == "-");
    Some(if negative { -value } else { value })
}

// ── Tests ────────────────────────────────────────────────────────────────────

//! Dependency-stack footer codec
//!
//! Parses and rewrites the machine-generated footer embedded in PR bodies.
//! The footer is a block delimited by [`FOOTER_TITLE`] and [`FOOTER_NOTE`]
//! holding one `"<position>. #<number>"` line per PR in the stack, ordered
//! trunk-ward ancestor first. Pure text transforms; no I/O.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

/// Title marker opening the footer block
pub const FOOTER_TITLE: &str = "\n#### Dependency stack\n\n";

/// Note marker closing the footer block
pub const FOOTER_NOTE: &str =
    "\nThis stack was auto-generated by [shale](https://github.com/shale-dev/shale).\n";

/// Marker appended to the entry for the PR the footer lives on
pub const STACK_THIS_PR: &str = "👈";

/// Extract the dependency stack from a PR body.
///
/// Scans for substrings of the exact shape `<digits>. #<digits>` (one or
/// more digits, a period, a single space, `#`, one or more digits) and
/// returns them in order of appearance. Returns `None` for an absent or
/// empty body, or when no entries match. Near-matches (`"12.#34"`,
/// `"a. #1"`) are not accepted.
pub fn extract_stack(body: Option<&str>) -> Option<Vec<String>> {
    let body = body?;
    if body.is_empty() {
        return None;
    }

    let bytes = body.as_bytes();
    let mut entries = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = match_entry_at(bytes, i) {
            // Entries are pure ASCII, so the byte range is valid UTF-8.
            entries.push(body[i..end].to_string());
            i = end;
        } else {
            i += 1;
        }
    }

    if entries.is_empty() { None } else { Some(entries) }
}

/// Match one `<digits>. #<digits>` entry starting at `start`, returning the
/// exclusive end offset.
fn match_entry_at(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = eat_digits(bytes, start)?;
    if bytes.get(i) != Some(&b'.') {
        return None;
    }
    i += 1;
    if bytes.get(i) != Some(&b' ') {
        return None;
    }
    i += 1;
    if bytes.get(i) != Some(&b'#') {
        return None;
    }
    i += 1;
    eat_digits(bytes, i)
}

fn eat_digits(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    (i > start).then_some(i)
}

/// Parse the PR number out of a footer entry
pub fn entry_pr_number(entry: &str) -> Result<u64> {
    entry
        .split('#')
        .nth(1)
        .map(str::trim)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::Parse(format!("malformed footer entry: {entry:?}")))
}

/// Format a footer entry from a 1-based position and a PR number
pub fn format_entry(position: usize, pr_number: u64) -> String {
    format!("{position}. #{pr_number}")
}

/// Serialize a dependency stack into a footer block.
///
/// Renders the title marker, one line per entry (the entry for `own_pr`
/// gets a trailing marker), and the note marker. A `None` stack renders an
/// empty-stack notice instead of entries.
pub fn render_footer(stack: Option<&[String]>, own_pr: u64) -> String {
    let mut out = String::from(FOOTER_TITLE);
    match stack {
        Some(entries) if !entries.is_empty() => {
            for entry in entries {
                if entry_pr_number(entry).is_ok_and(|n| n == own_pr) {
                    let _ = writeln!(out, "{entry} {STACK_THIS_PR}");
                } else {
                    let _ = writeln!(out, "{entry}");
                }
            }
        }
        _ => out.push_str("This PR is not part of a stack.\n"),
    }
    out.push_str(FOOTER_NOTE);
    out
}

/// Splice a rendered footer into a PR body.
///
/// Replaces the region from the title marker through the note marker
/// (tolerating surrounding whitespace) with `footer`; if no such region
/// exists the footer is appended to the body unchanged. When a user has
/// hand-edited the markers themselves the block is not recognized and a
/// second footer ends up appended; known rough edge, kept deliberately.
pub fn splice_footer(body: Option<&str>, footer: &str) -> String {
    let Some(body) = body else {
        return footer.to_string();
    };
    if body.is_empty() {
        return footer.to_string();
    }

    let re = footer_block_re();
    if re.is_match(body) {
        re.replace(body, regex::NoExpand(footer)).into_owned()
    } else {
        format!("{body}{footer}")
    }
}

fn footer_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"\s*{}\s*[\s\S]*\s*{}\s*",
            regex::escape(FOOTER_TITLE.trim()),
            regex::escape(FOOTER_NOTE.trim()),
        );
        Regex::new(&pattern).expect("footer markers form a valid pattern")
    })
}

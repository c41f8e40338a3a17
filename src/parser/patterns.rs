//! Cached regex patterns for plain-text tool output.
//!
//! Uses LazyLock to compile patterns once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Matches the trailing module attribution line, e.g. "\n(KJV)"
pub static ATTRIBUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\([^)]+\)\s*$").unwrap());

/// Matches a verse reference prefix at the start of a line, e.g. "Genesis 1:1: "
/// Group 1 is the reference without the trailing colon.
pub static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)([A-Za-z0-9 ]+\s+\d+:\d+):\s*").unwrap());

/// Matches the verse number at the end of a reference
pub static VERSE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":(\d+)$").unwrap());

/// Matches a bare verse reference standing in for missing text,
/// e.g. "II Chronicles 19:2:", "1 John 3:16", "Song of Songs 1:1:"
pub static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[1-4]\s+|I{1,3}V?\s+)?[A-Za-z]+(?:\s+(?:of\s+)?[A-Za-z]+)*\s+\d+:\d+:?$")
        .unwrap()
});

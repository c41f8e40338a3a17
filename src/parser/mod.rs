//! Parser for plain-text verse output of the retrieval tool.
//!
//! The tool prints one verse per reference prefix, optionally wrapped over
//! several lines, followed by a module attribution:
//!
//! ```text
//! Genesis 1:1: In the beginning God created the heaven and the earth.
//! Genesis 1:2: And the earth was without form, and void;
//! and darkness was upon the face of the deep.
//!
//! (KJV)
//! ```
//!
//! # Example
//!
//! ```
//! use versify::parser::parse_output;
//!
//! let raw = "Genesis 1:1: In the beginning God created the heaven and the earth.\n\n(KJV)";
//! let verses = parse_output(raw, "Gen", 1);
//! assert_eq!(verses.len(), 1);
//! assert_eq!(verses[0].number, 1);
//! assert!(verses[0].text.starts_with("In the beginning"));
//! ```

mod patterns;

use serde::{Deserialize, Serialize};
use tracing::trace;

use patterns::{ATTRIBUTION_RE, MARKER_RE, PLACEHOLDER_RE, VERSE_NUMBER_RE};

/// Bodies shorter than this (after trimming) carry no verse text.
const MIN_VERSE_CHARS: usize = 5;

/// A single verse of a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub number: u32,
    /// Verse text with all whitespace runs collapsed to single spaces.
    pub text: String,
}

/// Configuration for verse parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Drop verses whose body is only a reference echoed back by the tool.
    pub filter_placeholders: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            filter_placeholders: true,
        }
    }
}

/// Splits raw tool output into verses.
#[derive(Debug, Clone, Default)]
pub struct VerseParser {
    config: ParserConfig,
}

impl VerseParser {
    /// Create a parser with placeholder filtering enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse the output for one chapter (or verse) lookup.
    ///
    /// Verses are returned in the order they appear. Numbers are taken as
    /// printed: gaps and duplicates are kept. Empty or attribution-only
    /// output yields no verses.
    pub fn parse(&self, raw: &str, book_id: &str, chapter: u32) -> Vec<Verse> {
        let text = ATTRIBUTION_RE.replace(raw.trim(), "");
        let markers: Vec<_> = MARKER_RE.captures_iter(&text).collect();

        let mut verses = Vec::with_capacity(markers.len());
        for (i, caps) in markers.iter().enumerate() {
            let (Some(marker), Some(reference)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let body_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let body = text[marker.end()..body_end].trim();

            let Some(number) = verse_number(reference.as_str().trim()) else {
                continue;
            };
            if body.is_empty() {
                continue;
            }
            if self.config.filter_placeholders && is_placeholder(body) {
                trace!(book = book_id, chapter, verse = number, "skipping placeholder verse");
                continue;
            }

            verses.push(Verse {
                number,
                text: normalize_whitespace(body),
            });
        }

        verses
    }
}

/// Parse tool output with the default (hardened) configuration.
pub fn parse_output(raw: &str, book_id: &str, chapter: u32) -> Vec<Verse> {
    VerseParser::new().parse(raw, book_id, chapter)
}

/// Whether a verse body is a stand-in for missing text rather than content.
///
/// When a verse does not exist in a module the tool may print an empty body,
/// a fragment of punctuation, or just another reference such as
/// `II Chronicles 19:2:`.
pub fn is_placeholder(text: &str) -> bool {
    let text = text.trim();
    text.chars().count() < MIN_VERSE_CHARS || PLACEHOLDER_RE.is_match(text)
}

fn verse_number(reference: &str) -> Option<u32> {
    VERSE_NUMBER_RE
        .captures(reference)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

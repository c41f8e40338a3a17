//! Canon definitions and their resolution into flat book lists.
//!
//! A versification describes which books, in which order and with how many
//! chapters, make up one canonical tradition. Definitions are YAML documents
//! that may `extend` a parent canon and splice `additional_books` into the
//! parent's list:
//!
//! ```yaml
//! name: Catholic
//! tradition: christian
//! extends: protestant
//! book_count: 73
//! additional_books:
//!   - { id: Tob, name: "Tobit", chapters: 14, testament: DC, insert_after: Neh }
//! ```
//!
//! # Example
//!
//! ```
//! use versify::versification::{Versifications, flatten};
//!
//! let mut canons = Versifications::bundled();
//! let catholic = canons.load("catholic")?;
//! let books = flatten(&catholic);
//! assert_eq!(books.first().map(|b| b.id.as_str()), Some("Gen"));
//! assert_eq!(books.len(), 73);
//! # Ok::<(), versify::Error>(())
//! ```

mod flatten;
mod loader;
mod source;

pub use flatten::{BookUnit, flatten};
pub use loader::{Versifications, splice_books};
pub use source::{BundledSource, CanonSource, ChainSource, DirSource};
pub(crate) use source::is_plain_name;

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Broad religious tradition a canon belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tradition {
    Christian,
    Jewish,
    Islamic,
    #[serde(other)]
    Other,
}

/// Section of the canon a book belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Testament {
    /// Old Testament (also used for the Tanakh).
    #[default]
    #[serde(rename = "OT")]
    Old,
    /// New Testament.
    #[serde(rename = "NT")]
    New,
    /// Deuterocanonical / apocryphal books.
    #[serde(rename = "DC")]
    Deuterocanonical,
}

impl Testament {
    /// The short tag used in canon definitions and output documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Testament::Old => "OT",
            Testament::New => "NT",
            Testament::Deuterocanonical => "DC",
        }
    }
}

impl fmt::Display for Testament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the text of a canon is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    #[default]
    Books,
    Surah,
}

/// A named canonical tradition as declared in its definition document.
///
/// After [`Versifications::load`] the `books` field holds the fully resolved
/// list, parent books included. Every other field is the canon's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonDefinition {
    /// Display name ("Protestant", "Ethiopian Orthodox", ...).
    pub name: String,
    pub tradition: Tradition,
    /// Name of the parent canon whose books this one builds on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Expected number of top-level books.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_count: Option<u32>,
    #[serde(default)]
    pub structure: Structure,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub books: Vec<BookEntry>,
    /// Books spliced into the parent's list when resolving `extends`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_books: Vec<BookEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surahs: Vec<Surah>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_surahs: Option<u32>,
}

impl CanonDefinition {
    /// Parse a single definition document without resolving inheritance.
    pub fn from_yaml(name: &str, text: &str) -> crate::Result<Self> {
        serde_yaml::from_str(text).map_err(|source| crate::Error::Parse {
            what: format!("versification {name}"),
            source,
        })
    }

    /// Number of top-level books that are not folded into another book.
    pub fn top_level_count(&self) -> usize {
        self.books.iter().filter(|b| b.merge_with.is_none()).count()
    }
}

/// One book (or composite group of books) in a canon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    /// Short stable code ("Gen", "1Macc").
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testament: Option<Testament>,
    /// Component books of a composite entry such as "The Twelve".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_books: Option<Vec<SubBook>>,
    /// Id of the book this entry's content is folded into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_with: Option<String>,
    /// Id of the book after which this entry is spliced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_after: Option<String>,
}

/// A component of a composite [`BookEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBook {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testament: Option<Testament>,
}

/// A surah of the Quran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surah {
    pub number: u32,
    pub name: String,
    pub ayat: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_book_entry_defaults() {
        let canon = CanonDefinition::from_yaml(
            "mini",
            "name: Mini\ntradition: christian\nbooks:\n  - { id: Gen, name: Genesis, chapters: 50 }\n",
        )
        .unwrap();

        assert_eq!(canon.structure, Structure::Books);
        assert_eq!(canon.extends, None);
        let gen_entry = &canon.books[0];
        assert_eq!(gen_entry.chapters.map(NonZeroU32::get), Some(50));
        assert_eq!(gen_entry.testament, None);
        assert!(gen_entry.merge_with.is_none());
    }

    #[test]
    fn test_unknown_tradition_is_other() {
        let canon =
            CanonDefinition::from_yaml("x", "name: X\ntradition: zoroastrian\n").unwrap();
        assert_eq!(canon.tradition, Tradition::Other);
    }

    #[test]
    fn test_rejects_unknown_testament() {
        let err = CanonDefinition::from_yaml(
            "bad",
            "name: Bad\ntradition: christian\nbooks:\n  - { id: X, chapters: 1, testament: XX }\n",
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::Parse { .. }));
    }

    #[test]
    fn test_rejects_zero_chapters() {
        let result = CanonDefinition::from_yaml(
            "bad",
            "name: Bad\ntradition: christian\nbooks:\n  - { id: X, chapters: 0 }\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_testament_tags() {
        assert_eq!(Testament::Old.to_string(), "OT");
        assert_eq!(Testament::New.as_str(), "NT");
        assert_eq!(
            serde_json::to_string(&Testament::Deuterocanonical).unwrap(),
            "\"DC\""
        );
    }
}

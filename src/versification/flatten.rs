//! Flattening a resolved canon into addressable book units.

use std::num::NonZeroU32;

use serde::Serialize;

use super::{CanonDefinition, Testament};

/// A single book that can be queried chapter by chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookUnit {
    pub id: String,
    /// Display name, also used to build tool references ("Song of Solomon 2").
    pub name: String,
    /// Number of chapters, always at least 1.
    pub chapters: u32,
    pub testament: Testament,
}

/// Expand a resolved canon into its ordered list of books.
///
/// - Entries folded into another book (`merge_with`) are skipped.
/// - Composite entries are replaced by their sub-books, which inherit the
///   parent's testament unless they declare their own. An unnamed sub-book is
///   named after its id and one without a chapter count has a single chapter.
/// - Entries without a chapter count are structural and skipped.
///
/// Order follows the resolved definition exactly.
pub fn flatten(canon: &CanonDefinition) -> Vec<BookUnit> {
    let mut units = Vec::with_capacity(canon.books.len());

    for book in &canon.books {
        if book.merge_with.is_some() {
            continue;
        }

        let testament = book.testament.unwrap_or_default();

        if let Some(sub_books) = &book.sub_books {
            units.extend(sub_books.iter().map(|sub| BookUnit {
                id: sub.id.clone(),
                name: sub.name.clone().unwrap_or_else(|| sub.id.clone()),
                chapters: sub.chapters.map_or(1, NonZeroU32::get),
                testament: sub.testament.unwrap_or(testament),
            }));
            continue;
        }

        let Some(chapters) = book.chapters else {
            continue;
        };

        units.push(BookUnit {
            id: book.id.clone(),
            name: book.name.clone().unwrap_or_else(|| book.id.clone()),
            chapters: chapters.get(),
            testament,
        });
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(yaml: &str) -> CanonDefinition {
        CanonDefinition::from_yaml("test", yaml).unwrap()
    }

    #[test]
    fn test_skips_merged_and_structural_entries() {
        let c = canon(
            "name: T\ntradition: christian\nbooks:\n  - { id: Torah, name: Torah }\n  - { id: Gen, name: Genesis, chapters: 50 }\n  - { id: GenGr, name: Greek Genesis, chapters: 3, merge_with: Gen }\n",
        );
        let units = flatten(&c);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, "Gen");
        assert_eq!(units[0].chapters, 50);
        assert_eq!(units[0].testament, Testament::Old);
    }

    #[test]
    fn test_expands_sub_books() {
        let c = canon(
            r#"name: T
tradition: jewish
books:
  - id: Twelve
    name: The Twelve
    testament: OT
    sub_books:
      - { id: Hos, name: Hosea, chapters: 14 }
      - { id: Joel }
      - { id: Amos, chapters: 9, testament: DC }
  - { id: Rev, name: Revelation, chapters: 22, testament: NT }
"#,
        );
        let units = flatten(&c);
        let ids: Vec<_> = units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["Hos", "Joel", "Amos", "Rev"]);

        assert_eq!(units[0].name, "Hosea");
        assert_eq!(units[1].name, "Joel");
        assert_eq!(units[1].chapters, 1);
        assert_eq!(units[1].testament, Testament::Old);
        assert_eq!(units[2].testament, Testament::Deuterocanonical);
        assert_eq!(units[3].testament, Testament::New);
    }

    #[test]
    fn test_merged_composite_is_skipped_entirely() {
        let c = canon(
            "name: T\ntradition: christian\nbooks:\n  - id: Extra\n    merge_with: Gen\n    sub_books:\n      - { id: X, chapters: 1 }\n",
        );
        assert!(flatten(&c).is_empty());
    }

    #[test]
    fn test_surah_canon_has_no_books() {
        let c = canon("name: Q\ntradition: islamic\nstructure: surah\nsurahs:\n  - { number: 1, name: Al-Fatihah, ayat: 7 }\n");
        assert!(flatten(&c).is_empty());
    }
}

//! Extraction of whole modules through a [`TextSource`].
//!
//! Books come from the module's versification, chapters are fetched one
//! lookup at a time and parsed into verses. Anything the module lacks is
//! silently left out: empty chapters are dropped, and books with no
//! chapters are dropped.

use tracing::{debug, error, info, warn};

use crate::Result;
use crate::config::Config;
use crate::output::{
    BibleMeta, Book, Chapter, Metadata, RunMeta, ScriptureContent, write_outputs,
};
use crate::parser::VerseParser;
use crate::registry::ModuleEntry;
use crate::retrieve::TextSource;
use crate::versification::{BookUnit, CanonDefinition, Versifications, flatten};

/// How far past the expected count [`Extractor::discover_chapters`] probes.
const DISCOVERY_SLACK: u32 = 5;

/// Result of a full run: the metadata document and per-module content.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub metadata: Metadata,
    /// Content keyed by output id, in registry order.
    pub contents: Vec<(String, ScriptureContent)>,
}

impl Extraction {
    pub fn book_count(&self) -> usize {
        self.contents.iter().map(|(_, c)| c.books.len()).sum()
    }

    pub fn verse_count(&self) -> usize {
        self.contents.iter().map(|(_, c)| c.verse_count()).sum()
    }
}

/// Drives the retrieval tool over modules, books and chapters.
pub struct Extractor<S> {
    source: S,
    parser: VerseParser,
}

impl<S: TextSource> Extractor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: VerseParser::new(),
        }
    }

    pub fn with_parser(mut self, parser: VerseParser) -> Self {
        self.parser = parser;
        self
    }

    /// Tool output for a lookup, or an empty string if the lookup failed.
    fn fetch(&self, module: &str, reference: &str) -> String {
        match self.source.fetch(module, reference) {
            Ok(output) => output,
            Err(e) => {
                warn!("{e}");
                String::new()
            }
        }
    }

    /// Whether the module answers a lookup of its first verse at all.
    pub fn module_available(&self, module: &str) -> bool {
        !self.fetch(module, "Gen 1:1").trim().is_empty()
    }

    /// Whether `book` has a first verse in the module.
    pub fn book_exists(&self, module: &str, book: &BookUnit) -> bool {
        let output = self.fetch(module, &format!("{} 1:1", book.name));
        has_content(&output, module)
    }

    /// Number of chapters the module actually has for `book`, probing from
    /// `expected` a few chapters beyond it.
    pub fn discover_chapters(&self, module: &str, book: &BookUnit, expected: u32) -> u32 {
        for chapter in expected..expected + DISCOVERY_SLACK {
            let output = self.fetch(module, &format!("{} {}:1", book.name, chapter));
            if !has_content(&output, module) {
                return chapter.saturating_sub(1);
            }
        }
        expected
    }

    pub fn extract_chapter(&self, module: &str, book: &BookUnit, chapter: u32) -> Chapter {
        let output = self.fetch(module, &format!("{} {}", book.name, chapter));
        Chapter {
            number: chapter,
            verses: self.parser.parse(&output, &book.id, chapter),
        }
    }

    /// Every chapter of `book` that has verses, or `None` if none does.
    pub fn extract_book(&self, module: &str, book: &BookUnit) -> Option<Book> {
        let chapters: Vec<_> = (1..=book.chapters)
            .map(|n| self.extract_chapter(module, book, n))
            .filter(|c| !c.verses.is_empty())
            .collect();

        if chapters.is_empty() {
            return None;
        }
        Some(Book {
            id: book.id.clone(),
            name: book.name.clone(),
            testament: book.testament,
            chapters,
        })
    }

    /// Extract every book of `canon` present in the module.
    pub fn extract_scripture(
        &self,
        entry: &ModuleEntry,
        canon: &CanonDefinition,
    ) -> ScriptureContent {
        info!(
            "Extracting {} using {} versification...",
            entry.module, canon.name
        );

        let mut books = Vec::new();
        for unit in flatten(canon) {
            if !self.book_exists(&entry.module, &unit) {
                debug!(module = %entry.module, book = %unit.name, "not in module");
                continue;
            }
            match self.extract_book(&entry.module, &unit) {
                Some(book) => {
                    debug!(
                        module = %entry.module,
                        book = %unit.name,
                        chapters = book.chapters.len(),
                        "extracted"
                    );
                    books.push(book);
                }
                None => debug!(module = %entry.module, book = %unit.name, "no content"),
            }
        }

        ScriptureContent {
            content: entry.description.clone(),
            books,
            sections: Vec::new(),
        }
    }

    /// Extract each selected module, skipping unavailable ones and ones
    /// whose versification cannot be loaded.
    pub fn run<'a, I>(&self, modules: I, canons: &mut Versifications) -> Extraction
    where
        I: IntoIterator<Item = (u32, &'a ModuleEntry)>,
    {
        let mut metadata = Metadata {
            bibles: Vec::new(),
            meta: RunMeta::now(),
        };
        let mut contents = Vec::new();

        for (weight, entry) in modules {
            if !self.module_available(&entry.module) {
                warn!("Module {} not available, skipping", entry.module);
                continue;
            }

            let canon = match canons.load(&entry.versification) {
                Ok(canon) => canon,
                Err(e) => {
                    error!("Cannot extract {}: {e}", entry.module);
                    continue;
                }
            };

            metadata.bibles.push(bible_meta(entry, weight));
            let content = self.extract_scripture(entry, &canon);
            info!(
                "{}: {} books, {} verses",
                entry.module,
                content.books.len(),
                content.verse_count()
            );
            contents.push((entry.id.clone(), content));
        }

        Extraction { metadata, contents }
    }
}

/// Run a complete extraction as configured and write the output documents.
///
/// Fails before writing anything with
/// [`Error::UnknownModule`](crate::Error::UnknownModule) when a requested
/// module is not registered, and with
/// [`Error::ToolUnavailable`](crate::Error::ToolUnavailable) when the
/// retrieval tool cannot be started.
pub fn extract_to_dir(config: &Config) -> Result<Extraction> {
    let registry = config.registry()?;
    let selected = registry.select(&config.modules)?;

    let tool = config.diatheke();
    tool.probe()?;

    let mut canons = config.versifications();
    let extraction = Extractor::new(tool).run(selected, &mut canons);

    write_outputs(
        &config.output_dir,
        &extraction.metadata,
        &extraction.contents,
    )?;
    info!(
        "Extracted {} Bibles with {} books and {} total verses",
        extraction.contents.len(),
        extraction.book_count(),
        extraction.verse_count()
    );

    Ok(extraction)
}

fn bible_meta(entry: &ModuleEntry, weight: u32) -> BibleMeta {
    BibleMeta {
        id: entry.id.clone(),
        title: entry.title.clone(),
        description: entry.description.clone(),
        abbrev: entry.abbrev.clone(),
        language: entry.language.clone(),
        versification: entry.versification.clone(),
        features: entry.features.clone(),
        tags: entry.tags.clone(),
        weight,
    }
}

/// Non-blank output that is more than the module's own attribution line.
fn has_content(output: &str, module: &str) -> bool {
    let output = output.trim();
    !output.is_empty() && !output.starts_with(&format!("({module})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versification::Testament;
    use crate::{Error, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Answers lookups from a table; anything else gets only the attribution.
    #[derive(Default)]
    struct FakeTool {
        responses: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTool {
        fn respond(mut self, reference: &str, output: &str) -> Self {
            self.responses.insert(reference.to_string(), output.to_string());
            self
        }
    }

    impl TextSource for FakeTool {
        fn fetch(&self, module: &str, reference: &str) -> Result<String> {
            self.calls.borrow_mut().push(reference.to_string());
            if reference.starts_with("timeout") {
                return Err(Error::Timeout {
                    module: module.to_string(),
                    reference: reference.to_string(),
                    after: std::time::Duration::from_secs(30),
                });
            }
            Ok(self
                .responses
                .get(reference)
                .cloned()
                .unwrap_or_else(|| format!("({module})")))
        }
    }

    fn jude() -> BookUnit {
        BookUnit {
            id: "Jude".to_string(),
            name: "Jude".to_string(),
            chapters: 1,
            testament: Testament::New,
        }
    }

    #[test]
    fn test_has_content() {
        assert!(!has_content("", "KJV"));
        assert!(!has_content("  \n(KJV)\n", "KJV"));
        assert!(has_content("Jude 1:1: Jude, the servant.\n(KJV)", "KJV"));
    }

    #[test]
    fn test_extract_chapter_uses_book_name() {
        let tool = FakeTool::default().respond(
            "Jude 1",
            "Jude 1:1: Jude, the servant of Jesus Christ.\nJude 1:2: Mercy unto you, and peace.\n(KJV)",
        );
        let extractor = Extractor::new(&tool);
        let chapter = extractor.extract_chapter("KJV", &jude(), 1);
        assert_eq!(chapter.number, 1);
        assert_eq!(chapter.verses.len(), 2);
        assert_eq!(tool.calls.borrow().as_slice(), ["Jude 1"]);
    }

    #[test]
    fn test_failed_lookup_is_empty() {
        let tool = FakeTool::default();
        let extractor = Extractor::new(&tool);
        let unit = BookUnit {
            name: "timeout".to_string(),
            ..jude()
        };
        assert!(!extractor.book_exists("KJV", &unit));
        assert!(extractor.extract_chapter("KJV", &unit, 1).verses.is_empty());
        assert!(extractor.extract_book("KJV", &unit).is_none());
        // Attribution-only output for a book the module lacks
        assert!(extractor.extract_book("KJV", &jude()).is_none());
    }

    #[test]
    fn test_discover_chapters() {
        let tool = FakeTool::default()
            .respond("Jude 1:1", "Jude 1:1: text here\n(KJV)")
            .respond("Jude 2:1", "Jude 2:1: text here\n(KJV)");
        let extractor = Extractor::new(&tool);
        assert_eq!(extractor.discover_chapters("KJV", &jude(), 1), 2);
        assert_eq!(extractor.discover_chapters("KJV", &jude(), 3), 2);

        let always = FakeTool::default()
            .respond("Jude 1:1", "x 1:1: yes")
            .respond("Jude 2:1", "x 2:1: yes")
            .respond("Jude 3:1", "x 3:1: yes")
            .respond("Jude 4:1", "x 4:1: yes")
            .respond("Jude 5:1", "x 5:1: yes");
        assert_eq!(Extractor::new(&always).discover_chapters("KJV", &jude(), 1), 1);
    }
}

//! Loading canon definitions and resolving `extends` chains.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::source::{BundledSource, CanonSource};
use super::{BookEntry, CanonDefinition};
use crate::{Error, Result};

/// Loader and cache of resolved canon definitions.
///
/// Definitions are resolved lazily the first time a name is requested and
/// kept for the lifetime of the loader, so a run that extracts many modules
/// with the same versification parses each document once.
pub struct Versifications {
    source: Box<dyn CanonSource>,
    cache: HashMap<String, CanonDefinition>,
}

impl Versifications {
    pub fn new(source: impl CanonSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: HashMap::new(),
        }
    }

    /// Loader over the canons compiled into the crate.
    pub fn bundled() -> Self {
        Self::new(BundledSource)
    }

    /// Load `name`, resolving its inheritance chain.
    ///
    /// Fails with [`Error::NotFound`] if neither the canon nor one of its
    /// ancestors has a definition, and with [`Error::InheritanceCycle`] if the
    /// `extends` chain loops back on itself.
    pub fn load(&mut self, name: &str) -> Result<CanonDefinition> {
        let mut chain = Vec::new();
        self.resolve(name, &mut chain)
    }

    /// Whether `name` has already been resolved.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    fn resolve(&mut self, name: &str, chain: &mut Vec<String>) -> Result<CanonDefinition> {
        if let Some(canon) = self.cache.get(name) {
            return Ok(canon.clone());
        }

        if chain.iter().any(|n| n == name) {
            chain.push(name.to_string());
            return Err(Error::InheritanceCycle(chain.join(" -> ")));
        }

        let text = self
            .source
            .read(name)?
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let mut canon = CanonDefinition::from_yaml(name, &text)?;

        if let Some(parent_name) = canon.extends.clone() {
            chain.push(name.to_string());
            let parent = self.resolve(&parent_name, chain)?;
            chain.pop();
            canon.books = splice_books(&parent.books, &canon.additional_books);
        }

        if let Some(expected) = canon.book_count {
            let actual = canon.top_level_count();
            if actual != expected as usize {
                warn!(
                    canon = name,
                    expected, actual, "book_count does not match resolved book list"
                );
            }
        }

        debug!(canon = name, books = canon.books.len(), "resolved versification");
        self.cache.insert(name.to_string(), canon.clone());
        Ok(canon)
    }
}

/// Merge a child canon's additional books into its parent's list.
///
/// Each addition is placed immediately after the book named by its
/// `insert_after`. When several additions share an anchor they keep their
/// declared order: each one goes after the anchor and after every addition
/// already placed there. Additions without an anchor, or whose anchor is not
/// in the list, are appended. The parent list is never modified.
pub fn splice_books(parent: &[BookEntry], additions: &[BookEntry]) -> Vec<BookEntry> {
    let mut books = parent.to_vec();
    let mut last_at_anchor: HashMap<&str, &str> = HashMap::new();

    for addition in additions {
        let Some(anchor) = addition.insert_after.as_deref() else {
            books.push(addition.clone());
            continue;
        };

        let after = last_at_anchor.get(anchor).copied().unwrap_or(anchor);
        match books.iter().position(|b| b.id == after) {
            Some(index) => {
                books.insert(index + 1, addition.clone());
                last_at_anchor.insert(anchor, &addition.id);
            }
            None => {
                warn!(
                    book = %addition.id,
                    insert_after = anchor,
                    "insert_after target not found, appending"
                );
                books.push(addition.clone());
            }
        }
    }

    books
}

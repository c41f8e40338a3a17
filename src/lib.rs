//! # versify
//!
//! Extracts scripture text from SWORD modules into JSON documents for a
//! static site, book by book according to each module's canon.
//!
//! ## Overview
//!
//! - [`versification`]: canon definitions (Protestant, Catholic, Ethiopian
//!   Orthodox, Tanakh, Quran) with `extends` inheritance, flattened into an
//!   ordered list of books.
//! - [`parser`]: splits the plain-text output of `diatheke` into verses.
//! - [`retrieve`]: runs the external tool with a per-lookup timeout.
//! - [`extract`]: walks modules, books and chapters.
//! - [`output`]: the `bibles.json` / `bibles_auxiliary/*.json` documents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use versify::{Config, extract_to_dir};
//!
//! let config = Config {
//!     modules: vec!["KJV".to_string()],
//!     ..Config::default()
//! };
//! let extraction = extract_to_dir(&config)?;
//! println!("{} verses", extraction.verse_count());
//! # Ok::<(), versify::Error>(())
//! ```
//!
//! ## Working with Canons
//!
//! ```
//! use versify::versification::{Versifications, flatten};
//!
//! let mut canons = Versifications::bundled();
//! let books = flatten(&canons.load("protestant")?);
//! assert_eq!(books.len(), 66);
//! assert_eq!(books[0].name, "Genesis");
//! # Ok::<(), versify::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod parser;
pub mod registry;
pub mod retrieve;
pub mod versification;

pub use config::Config;
pub use error::{Error, Result};
pub use extract::{Extraction, Extractor, extract_to_dir};
pub use parser::{Verse, parse_output};
pub use registry::{ModuleEntry, Registry};
pub use retrieve::{Diatheke, TextSource};
pub use versification::{BookUnit, CanonDefinition, Versifications, flatten};

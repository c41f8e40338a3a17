//! Access to the external scripture retrieval tool.
//!
//! The [`TextSource`] trait is the seam between extraction and the process
//! that actually holds the texts. [`Diatheke`] drives the SWORD project's
//! `diatheke` command; tests substitute an in-memory source.

mod diatheke;

pub use diatheke::{DEFAULT_TIMEOUT, Diatheke, PROBE_TIMEOUT};

use crate::Result;

/// Supplier of raw plain-text output for a (module, reference) lookup.
pub trait TextSource {
    /// Fetch the tool output for `reference` ("Genesis 1", "Genesis 1:1")
    /// in `module`. Output for a reference the module lacks is empty or
    /// attribution-only, not an error.
    fn fetch(&self, module: &str, reference: &str) -> Result<String>;
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn fetch(&self, module: &str, reference: &str) -> Result<String> {
        (**self).fetch(module, reference)
    }
}

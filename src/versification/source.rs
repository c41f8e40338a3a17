//! Where canon definition documents come from.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::Result;

/// Supplier of raw canon definition documents, keyed by canon name.
pub trait CanonSource: Send + Sync {
    /// Return the YAML text for `name`, or `None` if this source has no such canon.
    fn read(&self, name: &str) -> Result<Option<String>>;
}

/// The canon definitions compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

const BUNDLED: &[(&str, &str)] = &[
    (
        "protestant",
        include_str!("../../data/versifications/protestant.yaml"),
    ),
    (
        "catholic",
        include_str!("../../data/versifications/catholic.yaml"),
    ),
    (
        "ethiopian",
        include_str!("../../data/versifications/ethiopian.yaml"),
    ),
    ("tanakh", include_str!("../../data/versifications/tanakh.yaml")),
    ("quran", include_str!("../../data/versifications/quran.yaml")),
];

impl BundledSource {
    /// Names of all bundled canons.
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(name, _)| *name)
    }
}

impl CanonSource for BundledSource {
    fn read(&self, name: &str) -> Result<Option<String>> {
        Ok(BUNDLED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| (*text).to_string()))
    }
}

/// Canon definitions stored as `<dir>/<name>.yaml`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Bare file stems only; anything that could escape a directory is rejected.
pub(crate) fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

impl CanonSource for DirSource {
    fn read(&self, name: &str) -> Result<Option<String>> {
        if !is_plain_name(name) {
            return Ok(None);
        }
        let path = self.dir.join(format!("{name}.yaml"));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Tries each source in turn; the first one that knows a canon wins.
#[derive(Default)]
pub struct ChainSource {
    sources: Vec<Box<dyn CanonSource>>,
}

impl ChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl CanonSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CanonSource for ChainSource {
    fn read(&self, name: &str) -> Result<Option<String>> {
        for source in &self.sources {
            if let Some(text) = source.read(name)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

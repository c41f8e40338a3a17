//! Run configuration shared by the library entry point and the CLI.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::Result;
use crate::registry::Registry;
use crate::retrieve::{DEFAULT_TIMEOUT, Diatheke};
use crate::versification::{BundledSource, ChainSource, DirSource, Versifications};

/// Configuration for an extraction run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory receiving `bibles.json` and `bibles_auxiliary/`.
    pub output_dir: PathBuf,
    /// Retrieval tool executable.
    pub tool: PathBuf,
    /// Arguments placed before the tool's own options.
    pub tool_args: Vec<OsString>,
    /// Per-lookup timeout.
    pub timeout: Duration,
    /// Directory of `<name>.yaml` canon definitions overriding the bundled ones.
    pub versification_dir: Option<PathBuf>,
    /// Module registry replacing the bundled one.
    pub registry_path: Option<PathBuf>,
    /// Restrict the run to these SWORD module names (empty = all).
    pub modules: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            tool: PathBuf::from("diatheke"),
            tool_args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            versification_dir: None,
            registry_path: None,
            modules: Vec::new(),
        }
    }
}

impl Config {
    pub fn diatheke(&self) -> Diatheke {
        Diatheke::new()
            .with_program(&self.tool)
            .with_args(self.tool_args.iter().cloned())
            .with_timeout(self.timeout)
    }

    /// Canon loader: the override directory if any, then the bundled canons.
    pub fn versifications(&self) -> Versifications {
        match &self.versification_dir {
            Some(dir) => Versifications::new(
                ChainSource::new()
                    .with(DirSource::new(dir))
                    .with(BundledSource),
            ),
            None => Versifications::bundled(),
        }
    }

    pub fn registry(&self) -> Result<Registry> {
        match &self.registry_path {
            Some(path) => Registry::from_path(path),
            None => Registry::bundled(),
        }
    }
}

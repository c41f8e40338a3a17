//! Registry of SWORD modules to extract and their display metadata.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::versification::is_plain_name;
use crate::{Error, Result};

const BUNDLED_REGISTRY: &str = include_str!("../data/modules.yaml");

/// One scripture module and how it is presented on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// SWORD module name passed to the retrieval tool ("KJV", "Vulgate").
    pub module: String,
    /// Output id, also the auxiliary file stem ("kjv").
    pub id: String,
    pub title: String,
    pub description: String,
    pub abbrev: String,
    /// BCP 47 language tag.
    pub language: String,
    /// Name of the canon used to enumerate books.
    pub versification: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    modules: Vec<ModuleEntry>,
}

/// Ordered list of modules. Position determines the output weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    modules: Vec<ModuleEntry>,
}

impl Registry {
    pub fn new(modules: Vec<ModuleEntry>) -> Self {
        Self { modules }
    }

    /// The registry compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(BUNDLED_REGISTRY)
    }

    /// Parse a registry document. Every id must be usable as a file stem.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(text).map_err(|source| Error::Parse {
            what: "module registry".to_string(),
            source,
        })?;
        if let Some(bad) = file.modules.iter().find(|m| !is_plain_name(&m.id)) {
            return Err(Error::InvalidModuleId(bad.id.clone()));
        }
        Ok(Self::new(file.modules))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    pub fn modules(&self) -> &[ModuleEntry] {
        &self.modules
    }

    pub fn get(&self, module: &str) -> Option<&ModuleEntry> {
        self.modules.iter().find(|m| m.module == module)
    }

    /// Modules paired with their 1-based weight, optionally restricted to
    /// the given module names. Weights stay those of the full registry.
    ///
    /// Fails with [`Error::UnknownModule`] listing every name that is not
    /// registered.
    pub fn select<'a>(&'a self, names: &[String]) -> Result<Vec<(u32, &'a ModuleEntry)>> {
        let unknown: Vec<_> = names
            .iter()
            .filter(|n| self.get(n).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(Error::UnknownModule(unknown));
        }

        Ok(self
            .modules
            .iter()
            .zip(1u32..)
            .filter(|(m, _)| names.is_empty() || names.iter().any(|n| *n == m.module))
            .map(|(m, weight)| (weight, m))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_registry() {
        let registry = Registry::bundled().unwrap();
        assert_eq!(registry.modules().len(), 27);

        let kjv = &registry.modules()[0];
        assert_eq!(kjv.module, "KJV");
        assert_eq!(kjv.id, "kjv");
        assert_eq!(kjv.versification, "protestant");
        assert!(kjv.features.is_empty());

        let kjva = registry.get("KJVA").unwrap();
        assert_eq!(kjva.versification, "catholic");
        assert_eq!(kjva.tags, ["English", "Protestant", "Apocrypha"]);
    }

    #[test]
    fn test_bundled_ids_are_unique() {
        let registry = Registry::bundled().unwrap();
        let mut ids: Vec<_> = registry.modules().iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registry.modules().len());
    }

    #[test]
    fn test_select_keeps_registry_weights() {
        let registry = Registry::bundled().unwrap();

        let all = registry.select(&[]).unwrap();
        assert_eq!(all.len(), 27);
        assert_eq!(all[0].0, 1);

        let picked = registry
            .select(&["DRC".to_string(), "KJV".to_string()])
            .unwrap();
        let picked: Vec<_> = picked.iter().map(|(w, m)| (*w, m.module.as_str())).collect();
        assert_eq!(picked, [(1, "KJV"), (5, "DRC")]);
    }

    #[test]
    fn test_select_rejects_unknown_names() {
        let registry = Registry::bundled().unwrap();
        let err = registry
            .select(&["KJV".to_string(), "KVJ".to_string(), "Nope".to_string()])
            .unwrap_err();
        match err {
            Error::UnknownModule(names) => assert_eq!(names, ["KVJ", "Nope"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_ids_outside_output_dir() {
        for id in ["../../x", "a/b", "..", ""] {
            let yaml = format!(
                "modules:\n  - {{ module: X, id: {id:?}, title: T, description: D, abbrev: X, language: en, versification: protestant }}\n"
            );
            let err = Registry::from_yaml(&yaml).unwrap_err();
            assert!(matches!(err, Error::InvalidModuleId(ref bad) if bad == id), "{id}");
        }
    }

    #[test]
    fn test_invalid_registry() {
        let err = Registry::from_yaml("modules:\n  - module: X\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}

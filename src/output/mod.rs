//! JSON documents consumed by the static site.
//!
//! A run produces:
//!
//! - `bibles.json`: one [`BibleMeta`] per extracted module plus run metadata.
//! - `bibles_auxiliary/<id>.json`: the [`ScriptureContent`] of each module.
//!
//! Every document is written to a temporary file in its target directory and
//! renamed into place, so an interrupted run never leaves a truncated file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::Result;
use crate::parser::Verse;
use crate::versification::Testament;

/// Version of the output document layout.
pub const FORMAT_VERSION: &str = "2.0.0";

pub const METADATA_FILE: &str = "bibles.json";
pub const AUXILIARY_DIR: &str = "bibles_auxiliary";

/// Top-level metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub bibles: Vec<BibleMeta>,
    pub meta: RunMeta,
}

/// Listing entry for one extracted module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleMeta {
    pub id: String,
    pub title: String,
    pub description: String,
    pub abbrev: String,
    pub language: String,
    pub versification: String,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    /// Ordering weight on the site (1-based registry position).
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMeta {
    pub granularity: String,
    /// RFC 3339 UTC timestamp of the run.
    pub generated: String,
    pub version: String,
}

impl RunMeta {
    /// Metadata for a run happening now.
    pub fn now() -> Self {
        Self {
            granularity: "chapter".to_string(),
            generated: chrono::Utc::now().to_rfc3339(),
            version: FORMAT_VERSION.to_string(),
        }
    }
}

/// Full text of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptureContent {
    /// Module description shown above the text.
    pub content: String,
    pub books: Vec<Book>,
    /// Reserved for site-defined groupings; always empty.
    pub sections: Vec<serde_json::Value>,
}

impl ScriptureContent {
    pub fn verse_count(&self) -> usize {
        self.books.iter().map(Book::verse_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub testament: Testament,
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub verses: Vec<Verse>,
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write the metadata and every auxiliary document under `output_dir`.
///
/// Returns the paths written, metadata first.
pub fn write_outputs(
    output_dir: &Path,
    metadata: &Metadata,
    contents: &[(String, ScriptureContent)],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::with_capacity(contents.len() + 1);

    let meta_path = output_dir.join(METADATA_FILE);
    write_json_atomic(&meta_path, metadata)?;
    info!("Wrote {}", meta_path.display());
    written.push(meta_path);

    let aux_dir = output_dir.join(AUXILIARY_DIR);
    fs::create_dir_all(&aux_dir)?;
    for (id, content) in contents {
        let aux_path = aux_dir.join(format!("{id}.json"));
        write_json_atomic(&aux_path, content)?;
        info!("Wrote {}", aux_path.display());
        written.push(aux_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_content() -> ScriptureContent {
        ScriptureContent {
            content: "Test module".to_string(),
            books: vec![Book {
                id: "Gen".to_string(),
                name: "Genesis".to_string(),
                testament: Testament::Old,
                chapters: vec![Chapter {
                    number: 1,
                    verses: vec![
                        Verse {
                            number: 1,
                            text: "Au commencement, Dieu créa les cieux et la terre.".to_string(),
                        },
                        Verse {
                            number: 2,
                            text: "And the earth was without form.".to_string(),
                        },
                    ],
                }],
            }],
            sections: Vec::new(),
        }
    }

    #[test]
    fn test_content_json_shape() {
        let value = serde_json::to_value(sample_content()).unwrap();
        assert_eq!(value["content"], "Test module");
        assert_eq!(value["sections"], serde_json::json!([]));
        let book = &value["books"][0];
        assert_eq!(book["id"], "Gen");
        assert_eq!(book["testament"], "OT");
        assert_eq!(book["chapters"][0]["number"], 1);
        assert_eq!(book["chapters"][0]["verses"][1]["number"], 2);
    }

    #[test]
    fn test_run_meta_now() {
        let meta = RunMeta::now();
        assert_eq!(meta.granularity, "chapter");
        assert_eq!(meta.version, FORMAT_VERSION);
        assert!(chrono::DateTime::parse_from_rfc3339(&meta.generated).is_ok());
    }

    #[test]
    fn test_write_json_atomic_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "stale").unwrap();

        write_json_atomic(&path, &sample_content()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"content\""));
        // Non-ASCII text is written as-is, not escaped
        assert!(text.contains("créa"));
        let back: ScriptureContent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, sample_content());

        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_outputs_layout() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("data");
        let metadata = Metadata {
            bibles: Vec::new(),
            meta: RunMeta::now(),
        };

        let written = write_outputs(
            &out,
            &metadata,
            &[("kjv".to_string(), sample_content())],
        )
        .unwrap();

        assert_eq!(
            written,
            [out.join("bibles.json"), out.join("bibles_auxiliary/kjv.json")]
        );
        assert!(written.iter().all(|p| p.is_file()));
    }
}

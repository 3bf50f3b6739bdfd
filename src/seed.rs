//! Startup seeding from bundled JSON files.
//!
//! Every `*.json` file in the seed directory holds an array of demon-like objects.
//! Files are processed in name order and independently: a file that cannot be read or
//! parsed is logged and skipped, the rest still load. Rows are inserted with
//! insert-if-absent semantics keyed by name, so seeding twice is harmless.

use crate::error::SeedError;
use crate::record::{Alignment, NewRecord};
use crate::store::RecordStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One entry as found in seed files. Image fields come in several spellings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub img_src: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
}

impl SeedEntry {
    /// Normalize into an insert payload. Entries without a name cannot be keyed and yield `None`.
    pub fn normalize(self) -> Option<NewRecord> {
        let name = self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
        Some(NewRecord {
            name,
            description: self.description.unwrap_or_default(),
            race: self.race.unwrap_or_default(),
            alignment: self
                .alignment
                .unwrap_or_else(|| Alignment::Unknown.as_str().to_string()),
            image_url: non_blank(self.img_src)
                .or(non_blank(self.image_url))
                .or(non_blank(self.img))
                .unwrap_or_default(),
        })
    }
}

/// Empty placeholders do not count as an image.
fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Outcome of a seeding pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub files_loaded: usize,
    pub files_failed: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse one seed file's content.
pub fn parse_seed(content: &str) -> Result<Vec<SeedEntry>, serde_json::Error> {
    serde_json::from_str(content)
}

/// `*.json` files in `dir`, sorted by file name. A missing directory yields an empty list.
async fn seed_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load one file. Returns (inserted, skipped).
pub async fn load_file(store: &RecordStore, path: &Path) -> Result<(usize, usize), SeedError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_seed(&content).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut inserted = 0;
    let mut skipped = 0;
    for entry in entries {
        let Some(record) = entry.normalize() else {
            tracing::warn!(file = %path.display(), "seed entry without a name, skipping");
            skipped += 1;
            continue;
        };
        let written = store.insert_if_absent(&record).await.map_err(|e| SeedError::Store {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        if written {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }
    Ok((inserted, skipped))
}

/// Seed the store from every file in `dir`. Per-file failures are logged, never returned.
pub async fn load_dir(store: &RecordStore, dir: &Path) -> SeedReport {
    let mut report = SeedReport::default();
    let files = match seed_files(dir).await {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list seed directory");
            return report;
        }
    };
    if files.is_empty() {
        tracing::info!(dir = %dir.display(), "no seed files found");
    }
    for path in files {
        match load_file(store, &path).await {
            Ok((inserted, skipped)) => {
                tracing::debug!(file = %path.display(), inserted, skipped, "seed file loaded");
                report.files_loaded += 1;
                report.inserted += inserted;
                report.skipped += skipped;
            }
            Err(e) => {
                tracing::warn!(error = %e, "seed file failed");
                report.files_failed += 1;
            }
        }
    }
    report
}

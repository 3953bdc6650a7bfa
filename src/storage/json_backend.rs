use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::debug;

use crate::{core::utils::ensure_dir, errors::StorageError};

use super::{ForecastSnapshot, Result, StorageBackend, SNAPSHOT_SCHEMA_VERSION};

const SNAPSHOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const EXPORT_DIR: &str = "exports";

/// Snapshot store rooted at the application data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    exports_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(crate::core::utils::app_data_dir);
        let exports_dir = root.join(EXPORT_DIR);
        ensure_dir(&exports_dir)?;
        Ok(Self { root, exports_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.exports_dir
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, snapshot: &ForecastSnapshot, name: &str) -> Result<PathBuf> {
        let path = self.snapshot_path(name);
        save_snapshot_to_path(snapshot, &path)?;
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<ForecastSnapshot> {
        load_snapshot_from_path(&self.snapshot_path(name))
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.exports_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

pub fn save_snapshot_to_path(snapshot: &ForecastSnapshot, path: &Path) -> Result<()> {
    write_json(snapshot, path)?;
    debug!(path = %path.display(), "wrote forecast snapshot");
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> Result<ForecastSnapshot> {
    let data = fs::read_to_string(path)?;
    let snapshot: ForecastSnapshot = serde_json::from_str(&data)?;
    if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchema(snapshot.schema_version));
    }
    Ok(snapshot)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "forecast".into()
    } else {
        sanitized
    }
}

/// Writes pretty JSON next to `path` and renames it into place, so readers
/// never see a half-written file.
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

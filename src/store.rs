use std::fmt;
use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::Builder;
use tracing::{debug, warn};

use crate::domain::RecordLocation;
use crate::error::CatalogError;
use crate::record::RecordEntry;

pub const CATALOG_FILE: &str = "catalog.json";
const RECORD_EXTENSION: &str = "json";

/// The on-disk layout: one directory per category under `root`, one JSON
/// file per record, and the aggregated catalog file.
#[derive(Debug, Clone)]
pub struct Store {
    root: Utf8PathBuf,
    catalog_path: Utf8PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Read,
    Parse,
    /// Parsed, but lacks fields the catalog needs.
    Incomplete,
}

/// A record file that was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadFailure {
    pub path: Utf8PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::Read => write!(f, "could not read {}: {}", self.path, self.message),
            FailureKind::Parse => write!(f, "invalid JSON in {}: {}", self.path, self.message),
            FailureKind::Incomplete => {
                write!(f, "{} missing required fields: {}", self.path, self.message)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<RecordEntry>,
    pub failures: Vec<LoadFailure>,
}

impl Store {
    pub fn new(root: Utf8PathBuf) -> Self {
        let catalog_path = root.join(CATALOG_FILE);
        Self { root, catalog_path }
    }

    pub fn new_with_paths(root: Utf8PathBuf, catalog_path: Utf8PathBuf) -> Self {
        Self { root, catalog_path }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn catalog_path(&self) -> &Utf8Path {
        &self.catalog_path
    }

    pub fn root_exists(&self) -> bool {
        self.root.as_std_path().is_dir()
    }

    pub fn ensure_root(&self) -> Result<(), CatalogError> {
        if self.root_exists() {
            Ok(())
        } else {
            Err(CatalogError::MissingRoot(self.root.clone().into_std_path_buf()))
        }
    }

    /// Category directory names, sorted. Hidden directories are skipped.
    pub fn category_dirs(&self) -> Result<Vec<String>, CatalogError> {
        self.ensure_root()?;
        let mut names = Vec::new();
        let entries = read_dir_sorted(&self.root)
            .map_err(|err| CatalogError::Filesystem(format!("read dir {}: {err}", self.root)))?;
        for entry in entries {
            let Some(name) = entry.file_name() else {
                continue;
            };
            if name.starts_with('.') || !entry.as_std_path().is_dir() {
                continue;
            }
            names.push(name.to_string());
        }
        Ok(names)
    }

    /// Record files of one category, sorted by file name. An unreadable
    /// category directory is a `Read` failure for that directory only.
    pub fn record_files(&self, category: &str) -> Result<Vec<RecordLocation>, LoadFailure> {
        let dir = self.root.join(category);
        let paths = read_dir_sorted(&dir).map_err(|err| LoadFailure {
            path: dir.clone(),
            kind: FailureKind::Read,
            message: err.to_string(),
        })?;
        let mut files = Vec::new();
        for path in paths {
            if path.extension() != Some(RECORD_EXTENSION) || !path.as_std_path().is_file() {
                continue;
            }
            if let Some(name) = path.file_name() {
                files.push(RecordLocation::new(category, name));
            }
        }
        Ok(files)
    }

    pub fn record_path(&self, location: &RecordLocation) -> Utf8PathBuf {
        location.resolve(&self.root)
    }

    pub fn read_record(&self, location: &RecordLocation) -> Result<RecordEntry, LoadFailure> {
        let path = self.record_path(location);
        let content = match fs::read_to_string(path.as_std_path()) {
            Ok(content) => content,
            Err(err) => {
                return Err(LoadFailure {
                    path,
                    kind: FailureKind::Read,
                    message: err.to_string(),
                });
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(document) => Ok(RecordEntry::new(location.clone(), document)),
            Err(err) => Err(LoadFailure {
                path,
                kind: FailureKind::Parse,
                message: err.to_string(),
            }),
        }
    }

    /// Loads one category. Files that fail are collected, not fatal.
    pub fn load_category(&self, category: &str) -> LoadReport {
        let mut report = LoadReport::default();
        let locations = match self.record_files(category) {
            Ok(locations) => locations,
            Err(failure) => {
                debug!(path = %failure.path, error = %failure.message, "skipping category");
                report.failures.push(failure);
                return report;
            }
        };
        for location in locations {
            match self.read_record(&location) {
                Ok(entry) => report.records.push(entry),
                Err(failure) => {
                    debug!(path = %failure.path, error = %failure.message, "skipping record file");
                    report.failures.push(failure);
                }
            }
        }
        debug!(
            category,
            loaded = report.records.len(),
            failed = report.failures.len(),
            "scanned category"
        );
        report
    }

    pub fn load_records(&self) -> Result<LoadReport, CatalogError> {
        let mut report = LoadReport::default();
        for category in self.category_dirs()? {
            let LoadReport { records, failures } = self.load_category(&category);
            report.records.extend(records);
            report.failures.extend(failures);
        }
        Ok(report)
    }

    pub fn catalog_exists(&self) -> bool {
        self.catalog_path.as_std_path().is_file()
    }

    pub fn read_catalog_text(&self) -> Result<String, CatalogError> {
        if !self.catalog_exists() {
            return Err(CatalogError::MissingCatalog(
                self.catalog_path.clone().into_std_path_buf(),
            ));
        }
        fs::read_to_string(self.catalog_path.as_std_path())
            .map_err(|err| CatalogError::Filesystem(format!("read {}: {err}", self.catalog_path)))
    }

    /// Replaces the catalog file in one rename; readers see the old file or
    /// the new one, never a partial write.
    pub fn write_catalog_atomic(&self, content: &[u8]) -> Result<(), CatalogError> {
        Self::write_bytes_atomic(&self.catalog_path, content)
    }

    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), CatalogError> {
        let parent = path
            .parent()
            .ok_or_else(|| CatalogError::Filesystem("invalid destination path".to_string()))?;
        let parent = if parent.as_str().is_empty() {
            Utf8Path::new(".")
        } else {
            parent
        };
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        let existing = fs::metadata(path.as_std_path())
            .ok()
            .map(|metadata| metadata.permissions());
        let mut builder = Builder::new();
        builder.prefix(".bioawesome-catalog");
        if existing.is_none()
            && let Some(permissions) = new_file_permissions()
        {
            builder.permissions(permissions);
        }
        let mut temp = builder
            .tempfile_in(parent.as_std_path())
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        if let Some(permissions) = existing {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        }
        temp.write_all(content)
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

/// Mode of a freshly created catalog, before the umask.
#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

fn read_dir_sorted(dir: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir.as_std_path())? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir, error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(path) => paths.push(path),
            Err(path) => warn!(path = %path.display(), "skipping non-utf8 path"),
        }
    }
    paths.sort();
    Ok(paths)
}

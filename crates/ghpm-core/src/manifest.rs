//! Manifest persistence: one pretty-printed JSON file per package.

use std::path::PathBuf;

use ghpm_schema::ManifestRecord;
use thiserror::Error;

use crate::paths::Layout;

/// Manifest store failures.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest exists for the named package.
    #[error("Package '{0}' is not installed")]
    NotFound(String),

    /// The manifest file exists but could not be read.
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        /// Manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest directory or file could not be written.
    #[error("Failed to write manifest {path}: {source}")]
    Write {
        /// Manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The record could not be serialized.
    #[error("Failed to encode manifest for {name}: {source}")]
    Encode {
        /// Package name.
        name: String,
        /// Serializer error.
        #[source]
        source: serde_json::Error,
    },

    /// The manifest file is not valid JSON for a record.
    #[error("Corrupt manifest {path}: {source}")]
    Parse {
        /// Manifest file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and writes [`ManifestRecord`]s under a [`Layout`]'s manifest directory.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    layout: Layout,
}

impl ManifestStore {
    /// Store backed by `layout`.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Write `record`, replacing any previous one of the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn save(&self, record: &ManifestRecord) -> Result<(), ManifestError> {
        let path = self.layout.manifest_path(&record.name);
        let write_err = |source| ManifestError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(self.layout.manifests()).map_err(write_err)?;
        let json = serde_json::to_string_pretty(record).map_err(|source| ManifestError::Encode {
            name: record.name.to_string(),
            source,
        })?;
        std::fs::write(&path, json).map_err(write_err)?;
        tracing::debug!(path = %path.display(), "saved manifest");
        Ok(())
    }

    /// Load the record for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotFound`] when there is no record, or a
    /// read/parse error for an unreadable one.
    pub fn load(&self, name: &str) -> Result<ManifestRecord, ManifestError> {
        let path = self.layout.manifest_path(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::NotFound(name.to_string()));
            }
            Err(source) => return Err(ManifestError::Read { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| ManifestError::Parse { path, source })
    }

    /// Whether a record exists for `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.layout.manifest_path(name).is_file()
    }

    /// Every readable record, sorted by name. Corrupt files are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest directory exists but cannot be read.
    pub fn list(&self) -> Result<Vec<ManifestRecord>, ManifestError> {
        let dir = self.layout.manifests();
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ManifestError::Read {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };

        let mut records: Vec<ManifestRecord> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| {
                let name = p.file_stem()?.to_string_lossy().to_string();
                match self.load(&name) {
                    Ok(r) => Some(r),
                    Err(e) => {
                        tracing::warn!("Skipping manifest: {e}");
                        None
                    }
                }
            })
            .collect();
        records.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(records)
    }

    /// Delete the record for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotFound`] when there is no record.
    pub fn remove(&self, name: &str) -> Result<(), ManifestError> {
        let path = self.layout.manifest_path(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ManifestError::NotFound(name.to_string()))
            }
            Err(source) => Err(ManifestError::Write { path, source }),
        }
    }
}

//! Snapshot Store Reader
//!
//! The only point where the engine touches the storage medium. Collectors
//! publish `<data_dir>/<domain>/<name>_latest.json`; the engine reads it back.
//!
//! `read` never fails: a missing file, an I/O error, or content that does not
//! parse (including a torn read of a file being rewritten) all come back as
//! `None` and are logged.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::StoreError;

/// Source of the latest raw snapshot per domain.
pub trait SnapshotSource {
    /// Latest snapshot for `domain`/`name`, or `None` when absent or unreadable.
    fn read(&self, domain: &str, name: &str) -> Option<Value>;
}

/// JSON files on local disk.
#[derive(Clone, Debug)]
pub struct FileSnapshotStore {
    root: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.data_dir.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, domain: &str, name: &str) -> PathBuf {
        self.root.join(domain).join(format!("{name}_latest.json"))
    }

    /// Fallible read. `Ok(None)` means the snapshot has not been written yet.
    pub fn try_read(&self, domain: &str, name: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(domain, name);

        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Parse { path, source })
    }

    /// Publish a snapshot: write a temporary file next to the target, then
    /// rename it over `<name>_latest.json`.
    #[instrument(skip(self, value), level = "debug")]
    pub fn write_atomic(
        &self,
        domain: &str,
        name: &str,
        value: &Value,
    ) -> Result<PathBuf, StoreError> {
        let path = self.path_for(domain, name);
        let dir = self.root.join(domain);

        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
            path: path.clone(),
            source,
        })?;

        // Unique per call: concurrent writers must never share a temp file.
        let tmp = dir.join(format!(
            ".{name}_latest.json.{}.{}.tmp",
            std::process::id(),
            Uuid::new_v4().simple()
        ));

        std::fs::write(&tmp, &bytes).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;

        if let Err(source) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(StoreError::Io { path, source });
        }

        debug!(path = %path.display(), bytes = bytes.len(), "snapshot published");
        Ok(path)
    }
}

impl SnapshotSource for FileSnapshotStore {
    #[instrument(skip(self), level = "debug")]
    fn read(&self, domain: &str, name: &str) -> Option<Value> {
        match self.try_read(domain, name) {
            Ok(Some(v)) => Some(v),
            Ok(None) => {
                debug!("snapshot absent");
                None
            }
            Err(e @ StoreError::Parse { .. }) => {
                warn!(error = %e, "snapshot unparsable; treating as absent");
                None
            }
            Err(e) => {
                error!(error = %e, "snapshot unreadable; treating as absent");
                None
            }
        }
    }
}

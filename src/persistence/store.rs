//! Atomic snapshot file I/O.

use super::snapshot::{EngineSnapshot, SNAPSHOT_VERSION};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Failures while writing a snapshot. Load failures are deliberately not
/// errors: a missing or corrupt file logs and yields an empty start.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure while writing or renaming the snapshot.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reads and writes snapshot documents at a filesystem path.
pub struct SnapshotStore;

impl SnapshotStore {
    /// Write `snapshot` to `path` atomically: serialize to `<path>.tmp`,
    /// then rename over the target. Parent directories are created.
    pub fn write(path: &Path, snapshot: &EngineSnapshot) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_vec(snapshot)?;
        let tmp_path = Self::tmp_path(path);
        fs::write(&tmp_path, &payload)?;
        fs::rename(&tmp_path, path)?;
        info!(
            path = %path.display(),
            bytes = payload.len(),
            symbols = snapshot.symbols.len(),
            "snapshot written"
        );
        Ok(())
    }

    /// Load a snapshot from `path`. Returns `None` (and logs) when the file
    /// is missing, unreadable, unparseable or carries an unknown version;
    /// recovery must never halt startup.
    #[must_use]
    pub fn load(path: &Path) -> Option<EngineSnapshot> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no snapshot found, starting empty");
                return None;
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to read snapshot, starting empty");
                return None;
            }
        };
        let snapshot: EngineSnapshot = match serde_json::from_slice(&data) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(path = %path.display(), error = %e, "corrupt snapshot, starting empty");
                return None;
            }
        };
        if snapshot.version != SNAPSHOT_VERSION {
            error!(
                path = %path.display(),
                version = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "unsupported snapshot version, starting empty"
            );
            return None;
        }
        info!(
            path = %path.display(),
            symbols = snapshot.symbols.len(),
            "snapshot loaded"
        );
        Some(snapshot)
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

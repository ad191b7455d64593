//! Atomic file-based storage for task snapshots.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use super::TaskSnapshot;
use crate::error::{Result, TaskSyncError};

/// Snapshot file name.
const SNAPSHOT_FILE: &str = "tasks.json";

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Lock file suffix for concurrent access prevention.
const LOCK_SUFFIX: &str = ".lock";

/// Reads and writes the recorded task snapshot of one project.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    /// Directory where the snapshot lives.
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store keeping its files in `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    fn tmp_path(&self) -> PathBuf {
        self.dir.join(format!("{SNAPSHOT_FILE}{TMP_SUFFIX}"))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{SNAPSHOT_FILE}{LOCK_SUFFIX}"))
    }

    /// True if a snapshot has been saved.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    /// Saves a snapshot atomically under an exclusive lock.
    pub fn save(&self, snapshot: &TaskSnapshot) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let lock_file = File::create(self.lock_path())?;
        FileExt::lock_exclusive(&lock_file)
            .map_err(|e| TaskSyncError::store(format!("Failed to acquire snapshot lock: {e}")))?;

        let tmp_path = self.tmp_path();
        let json = serde_json::to_string_pretty(snapshot)?;

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;

        fs::rename(&tmp_path, self.snapshot_path())?;
        FileExt::unlock(&lock_file)
            .map_err(|e| TaskSyncError::store(format!("Failed to release snapshot lock: {e}")))?;

        debug!(
            "Saved {} tasks to {}",
            snapshot.tasks.len(),
            self.snapshot_path().display()
        );
        Ok(())
    }

    /// Loads the snapshot, or an empty one if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// A corrupted file or one written by an incompatible version is a
    /// [`TaskSyncError::Store`], never an empty snapshot.
    pub fn load(&self) -> Result<TaskSnapshot> {
        let path = self.snapshot_path();
        if !path.exists() {
            debug!("No snapshot at {}, starting empty", path.display());
            return Ok(TaskSnapshot::empty());
        }

        let lock_path = self.lock_path();
        let lock_file = if lock_path.exists() {
            let lock_file = File::open(&lock_path)?;
            FileExt::lock_shared(&lock_file).map_err(|e| {
                TaskSyncError::store(format!("Failed to acquire snapshot lock: {e}"))
            })?;
            Some(lock_file)
        } else {
            None
        };

        let mut contents = String::new();
        File::open(&path)?.read_to_string(&mut contents)?;

        if let Some(lock_file) = lock_file {
            FileExt::unlock(&lock_file).map_err(|e| {
                TaskSyncError::store(format!("Failed to release snapshot lock: {e}"))
            })?;
        }

        let snapshot: TaskSnapshot = serde_json::from_str(&contents).map_err(|e| {
            TaskSyncError::store(format!("Corrupted snapshot at {}: {e}", path.display()))
        })?;

        if !snapshot.is_version_compatible() {
            return Err(TaskSyncError::store(format!(
                "Incompatible snapshot version {} (supported: {})",
                snapshot.version,
                super::SNAPSHOT_VERSION
            )));
        }

        Ok(snapshot)
    }

    /// Deletes the snapshot if it exists.
    pub fn clear(&self) -> Result<()> {
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

//! The recorded task set.
//!
//! A [`TaskSnapshot`] is what the previous scan left behind after review: the
//! tasks the next scan is diffed against. [`SnapshotStore`] keeps it on disk.

pub mod persistence;

pub use persistence::SnapshotStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::scanner::ParsedTask;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Tasks recorded for a project at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Format version.
    pub version: u32,
    /// When the snapshot was recorded.
    pub scanned_at: DateTime<Utc>,
    /// Hash of the task locations and texts, ids excluded.
    pub fingerprint: String,
    /// Recorded tasks.
    pub tasks: Vec<ParsedTask>,
}

impl TaskSnapshot {
    /// Record a task set now.
    #[must_use]
    pub fn new(tasks: Vec<ParsedTask>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            scanned_at: Utc::now(),
            fingerprint: fingerprint(&tasks),
            tasks,
        }
    }

    /// An empty snapshot (nothing recorded yet).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Check whether this snapshot was written by a compatible version.
    #[must_use]
    pub fn is_version_compatible(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }

    /// Number of recorded tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no tasks are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Hex SHA-256 over each task's file, line, tag and text.
#[must_use]
pub fn fingerprint(tasks: &[ParsedTask]) -> String {
    let mut hasher = Sha256::new();
    for task in tasks {
        hasher.update(task.file.as_bytes());
        hasher.update([0]);
        hasher.update(task.line.to_le_bytes());
        hasher.update(task.tag.as_bytes());
        hasher.update([0]);
        hasher.update(task.text.as_bytes());
        hasher.update([0xff]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_ignores_ids() {
        let a = vec![ParsedTask::new("a.rs", 1, "TODO", "x")];
        let b = vec![ParsedTask::new("a.rs", 1, "TODO", "x")];
        assert_ne!(a[0].id, b[0].id);
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_sees_changes() {
        let base = vec![ParsedTask::new("a.rs", 1, "TODO", "x")];
        let moved = vec![ParsedTask::new("a.rs", 2, "TODO", "x")];
        let edited = vec![ParsedTask::new("a.rs", 1, "TODO", "y")];
        assert_ne!(fingerprint(&base), fingerprint(&moved));
        assert_ne!(fingerprint(&base), fingerprint(&edited));
        assert_eq!(fingerprint(&base).len(), 64);
    }

    #[test]
    fn test_new_snapshot() {
        let snapshot = TaskSnapshot::new(vec![ParsedTask::new("a.rs", 1, "TODO", "x")]);
        assert!(snapshot.is_version_compatible());
        assert_eq!(snapshot.len(), 1);
        assert!(TaskSnapshot::empty().is_empty());
    }
}

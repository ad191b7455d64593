//! Repository access for the scan shell.
//!
//! A [`RepositorySource`] lists a repository's files and hands out their text.
//! [`LocalRepository`] reads a checked-out directory; [`InMemoryRepository`]
//! serves fixed content (tests, or callers that fetched files themselves).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::{PROJECT_JSON, PROJECT_TOML, STATE_DIR};
use crate::error::{Result, TaskSyncError};

/// Default cap on the size of a file that will be scanned (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Directories never descended into by [`LocalRepository`].
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn", STATE_DIR];

/// Project config files, never listed whatever the ignore patterns say.
const SKIPPED_ROOT_FILES: &[&str] = &[PROJECT_TOML, PROJECT_JSON];

/// Source of repository file listings and contents.
pub trait RepositorySource: Send + Sync {
    /// Repository-relative, `/`-separated paths in a stable order.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Text content of a listed file, or `None` when it is not scannable text.
    fn read_file(&self, path: &str) -> Result<Option<String>>;
}

// ============================================================================
// Local directory
// ============================================================================

/// A repository checked out on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
    max_file_size: u64,
}

impl LocalRepository {
    /// Create a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the largest file size (in bytes) that will be read.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(parts.join("/"))
    }
}

impl RepositorySource for LocalRepository {
    fn list_files(&self) -> Result<Vec<String>> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && SKIPPED_DIRS.contains(&e.file_name().to_string_lossy().as_ref()))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| self.root.display().to_string());
                TaskSyncError::repository(path, e.to_string())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            match self.relative_path(entry.path()) {
                Some(relative) if !SKIPPED_ROOT_FILES.contains(&relative.as_str()) => {
                    files.push(relative);
                }
                _ => {}
            }
        }

        files.sort();
        debug!("Listed {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn read_file(&self, path: &str) -> Result<Option<String>> {
        let full = self.root.join(path);
        let metadata = fs::metadata(&full)
            .map_err(|e| TaskSyncError::repository(path, e.to_string()))?;

        if metadata.len() > self.max_file_size {
            debug!("Skipping {} ({} bytes exceeds limit)", path, metadata.len());
            return Ok(None);
        }

        let bytes = fs::read(&full).map_err(|e| TaskSyncError::repository(path, e.to_string()))?;
        Ok(decode_text(path, bytes))
    }
}

/// UTF-8 text without NUL bytes; anything else is treated as binary.
fn decode_text(path: &str, bytes: Vec<u8>) -> Option<String> {
    if bytes.contains(&0) {
        debug!("Skipping {} (binary content)", path);
        return None;
    }
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            debug!("Skipping {} (not valid UTF-8)", path);
            None
        }
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Fixed `(path, content)` pairs, listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    files: Vec<(String, String)>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file in place.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some(existing) => existing.1 = content,
            None => self.files.push((path, content)),
        }
    }

    /// Remove a file, returning whether it existed.
    pub fn remove(&mut self, path: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|(p, _)| p != path);
        self.files.len() != before
    }
}

impl RepositorySource for InMemoryRepository {
    fn list_files(&self) -> Result<Vec<String>> {
        Ok(self.files.iter().map(|(p, _)| p.clone()).collect())
    }

    fn read_file(&self, path: &str) -> Result<Option<String>> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| Some(content.clone()))
            .ok_or_else(|| TaskSyncError::repository(path, "no such file"))
    }
}

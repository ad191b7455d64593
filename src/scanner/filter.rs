//! Path filtering with regex ignore patterns.

use regex::Regex;

use crate::error::{Result, TaskSyncError};

/// Check whether `path` matches any ignore pattern.
///
/// Patterns are unanchored regular expressions: a match anywhere in the path
/// counts. An invalid pattern is returned as
/// [`TaskSyncError::InvalidIgnorePattern`], never treated as non-matching.
///
/// Compiles the patterns on every call; use [`PathFilter`] when filtering
/// many paths.
pub fn should_ignore<S: AsRef<str>>(path: &str, patterns: &[S]) -> Result<bool> {
    Ok(PathFilter::new(patterns)?.is_ignored(path))
}

/// A compiled set of ignore patterns.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    patterns: Vec<Regex>,
}

impl PathFilter {
    /// Compile ignore patterns, failing on the first invalid one.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let pattern = p.as_ref();
                Regex::new(pattern).map_err(|source| TaskSyncError::InvalidIgnorePattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// True if any pattern matches somewhere in `path`.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no patterns are configured (nothing is ignored).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

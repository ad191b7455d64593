//! Per-type counts for a diff run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DiffResult, DiffType};

/// Number of results of each [`DiffType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub same: usize,
    pub moved: usize,
    pub updated: usize,
    pub added: usize,
    pub deleted: usize,
}

impl DiffSummary {
    /// Count the results by type.
    #[must_use]
    pub fn from_results(results: &[DiffResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            match result.diff_type {
                DiffType::Same => summary.same += 1,
                DiffType::Move => summary.moved += 1,
                DiffType::Update => summary.updated += 1,
                DiffType::New => summary.added += 1,
                DiffType::Delete => summary.deleted += 1,
            }
            summary
        })
    }

    /// Count for one type.
    #[must_use]
    pub fn count(&self, diff_type: DiffType) -> usize {
        match diff_type {
            DiffType::Same => self.same,
            DiffType::Move => self.moved,
            DiffType::Update => self.updated,
            DiffType::New => self.added,
            DiffType::Delete => self.deleted,
        }
    }

    /// Total number of results.
    #[must_use]
    pub fn total(&self) -> usize {
        self.same + self.moved + self.updated + self.added + self.deleted
    }

    /// True when nothing needs review: every result is SAME.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.total() == self.same
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} same, {} moved, {} updated, {} new, {} deleted",
            self.same, self.moved, self.updated, self.added, self.deleted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::generate_diff;
    use crate::scanner::ParsedTask;

    #[test]
    fn test_counts() {
        let old = vec![
            ParsedTask::new("a.rs", 1, "TODO", "same"),
            ParsedTask::new("a.rs", 2, "TODO", "moved"),
            ParsedTask::new("a.rs", 3, "TODO", "before"),
            ParsedTask::new("a.rs", 4, "TODO", "gone"),
        ];
        let new = vec![
            ParsedTask::new("a.rs", 1, "TODO", "same"),
            ParsedTask::new("a.rs", 20, "TODO", "moved"),
            ParsedTask::new("a.rs", 3, "TODO", "after"),
            ParsedTask::new("b.rs", 9, "TODO", "fresh"),
        ];
        let summary = DiffSummary::from_results(&generate_diff(&old, &new));

        assert_eq!(summary.same, 1);
        assert_eq!(summary.count(DiffType::Move), 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.total(), 5);
        assert!(!summary.is_unchanged());
        assert_eq!(
            summary.to_string(),
            "1 same, 1 moved, 1 updated, 1 new, 1 deleted"
        );
    }

    #[test]
    fn test_unchanged() {
        let tasks = vec![ParsedTask::new("a.rs", 1, "TODO", "same")];
        let summary = DiffSummary::from_results(&generate_diff(&tasks, &tasks));
        assert!(summary.is_unchanged());
        assert!(DiffSummary::default().is_unchanged());
    }
}

//! tasksync - repository task scanner and diff engine
//!
//! Walks a repository, extracts tagged comments (TODO, FIXME, ...) as tasks,
//! and reconciles each new scan against the previously recorded task set so
//! a reviewer can approve what changed.
//!
//! # Architecture
//!
//! The core is pure and does no I/O:
//!
//! - [`scanner`] - tag matching, task extraction and path filtering
//! - [`diff`] - classification of tasks as SAME, MOVE, UPDATE, NEW or DELETE
//!
//! Around it sits a thin shell:
//!
//! - [`config`] - scan configuration loading and validation
//! - [`repository`] - file listing and reading
//! - [`scan`] - the concurrent scan pipeline
//! - [`store`] - the recorded task snapshot
//! - [`approval`] - applying reviewed results to the snapshot
//! - [`error`] - error types
//!
//! # Example
//!
//! ```rust
//! use tasksync::config::ScanConfig;
//! use tasksync::diff::{generate_diff, DiffType};
//! use tasksync::scanner::parse_file;
//!
//! let config = ScanConfig::default();
//! let before = parse_file("// TODO: write docs\n", "lib.rs", &config);
//! let after = parse_file("\n// TODO: write docs\n", "lib.rs", &config);
//!
//! let diff = generate_diff(&before, &after);
//! assert_eq!(diff[0].diff_type, DiffType::Move);
//! ```

pub mod approval;
pub mod config;
pub mod diff;
pub mod error;
pub mod repository;
pub mod scan;
pub mod scanner;
pub mod store;

// Re-export commonly used types
pub use error::{Result, TaskSyncError};

pub use config::{ScanConfig, TagMatcher};

pub use scanner::{match_line, parse_file, should_ignore, ParsedTask, PathFilter, TagMatch};

pub use diff::{generate_diff, DiffData, DiffInfo, DiffResult, DiffSummary, DiffType};

pub use approval::{apply_approved, ApprovalPolicy};

pub use repository::{InMemoryRepository, LocalRepository, RepositorySource};

pub use scan::{ScanEvent, ScanOptions, ScanOutcome, Scanner};

pub use store::{SnapshotStore, TaskSnapshot};

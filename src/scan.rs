//! Scan orchestration.
//!
//! Sequences one scan: list repository files, drop ignored paths, read and
//! parse the rest on blocking threads, concatenate the tasks in file-list
//! order and, when a previous task set is supplied, diff against it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tasksync::config::ScanConfig;
//! use tasksync::repository::InMemoryRepository;
//! use tasksync::scan::Scanner;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tasksync::Result<()> {
//! let repo = InMemoryRepository::new().with_file("src/lib.rs", "// TODO: document me\n");
//! let outcome = Scanner::new(ScanConfig::default()).scan(Arc::new(repo)).await?;
//! assert_eq!(outcome.tasks.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::diff::{generate_diff, DiffResult};
use crate::error::{Result, TaskSyncError};
use crate::repository::RepositorySource;
use crate::scanner::{parse_file, ParsedTask, PathFilter};

/// Default number of files parsed at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Tuning for a scan run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Maximum number of files read and parsed concurrently.
    pub concurrency: usize,
    /// Abort the scan if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
        }
    }
}

impl ScanOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set an overall time limit.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Progress notifications, sent in file-list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The file listing is known.
    Started { total: usize },
    /// A file matched an ignore pattern.
    FileIgnored { path: String },
    /// A file was not text (binary, too large, bad encoding).
    FileSkipped { path: String },
    /// A file was parsed.
    FileScanned { path: String, tasks: usize },
    /// All files are done.
    Finished { tasks: usize },
}

/// Result of a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// All tasks, grouped by file in file-list order.
    pub tasks: Vec<ParsedTask>,
    pub files_scanned: usize,
    pub files_ignored: usize,
    pub files_skipped: usize,
}

/// Runs scans with one configuration.
pub struct Scanner {
    config: Arc<ScanConfig>,
    options: ScanOptions,
    events: Option<UnboundedSender<ScanEvent>>,
}

impl Scanner {
    /// Create a scanner with default options.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config: Arc::new(config),
            options: ScanOptions::default(),
            events: None,
        }
    }

    /// Set scan options.
    #[must_use]
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Stream progress events to `sender`. A dropped receiver is ignored.
    #[must_use]
    pub fn with_events(mut self, sender: UnboundedSender<ScanEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan a repository.
    ///
    /// # Errors
    ///
    /// Fails on an invalid ignore pattern, on repository errors, and with
    /// [`TaskSyncError::ScanTimeout`] when the time limit is exceeded.
    pub async fn scan(&self, source: Arc<dyn RepositorySource>) -> Result<ScanOutcome> {
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(source))
                .await
                .map_err(|_| TaskSyncError::ScanTimeout {
                    elapsed_ms: limit.as_millis() as u64,
                })?,
            None => self.run(source).await,
        }
    }

    /// Scan a repository and reconcile the result against `previous`.
    pub async fn scan_and_diff(
        &self,
        source: Arc<dyn RepositorySource>,
        previous: &[ParsedTask],
    ) -> Result<(ScanOutcome, Vec<DiffResult>)> {
        let outcome = self.scan(source).await?;
        let diff = generate_diff(previous, &outcome.tasks);
        debug!(
            "Diffed {} previous against {} current tasks: {} results",
            previous.len(),
            outcome.tasks.len(),
            diff.len()
        );
        Ok((outcome, diff))
    }

    async fn run(&self, source: Arc<dyn RepositorySource>) -> Result<ScanOutcome> {
        let filter = PathFilter::new(&self.config.ignore)?;

        let lister = Arc::clone(&source);
        let files = tokio::task::spawn_blocking(move || lister.list_files())
            .await
            .map_err(|e| TaskSyncError::Other(anyhow::anyhow!("file listing panicked: {e}")))??;
        self.emit(ScanEvent::Started { total: files.len() });

        let mut outcome = ScanOutcome::default();
        let mut kept = Vec::with_capacity(files.len());
        for path in files {
            if filter.is_ignored(&path) {
                outcome.files_ignored += 1;
                self.emit(ScanEvent::FileIgnored { path });
            } else {
                kept.push(path);
            }
        }

        let mut parsed = stream::iter(kept)
            .map(|path| extract(Arc::clone(&source), Arc::clone(&self.config), path))
            .buffered(self.options.concurrency.max(1));

        while let Some(result) = parsed.next().await {
            let (path, tasks) = result?;
            match tasks {
                Some(tasks) => {
                    outcome.files_scanned += 1;
                    self.emit(ScanEvent::FileScanned {
                        path,
                        tasks: tasks.len(),
                    });
                    outcome.tasks.extend(tasks);
                }
                None => {
                    outcome.files_skipped += 1;
                    self.emit(ScanEvent::FileSkipped { path });
                }
            }
        }

        self.emit(ScanEvent::Finished {
            tasks: outcome.tasks.len(),
        });
        info!(
            "Scanned {} files ({} ignored, {} skipped), found {} tasks",
            outcome.files_scanned,
            outcome.files_ignored,
            outcome.files_skipped,
            outcome.tasks.len()
        );
        Ok(outcome)
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }
}

/// Read and parse one file on a blocking thread.
async fn extract(
    source: Arc<dyn RepositorySource>,
    config: Arc<ScanConfig>,
    path: String,
) -> Result<(String, Option<Vec<ParsedTask>>)> {
    tokio::task::spawn_blocking(move || {
        let content = source.read_file(&path)?;
        let tasks = content.map(|text| parse_file(&text, &path, &config));
        Ok::<_, TaskSyncError>((path, tasks))
    })
    .await
    .map_err(|e| TaskSyncError::Other(anyhow::anyhow!("extraction task panicked: {e}")))?
}

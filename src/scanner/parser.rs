//! Task extraction from file content.
//!
//! Every line carrying a configured tag literal becomes one [`ParsedTask`].
//! Tasks get a fresh random id on every scan; continuity between scans is
//! established by [`crate::diff::generate_diff`], never by the id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::matcher::match_line;
use crate::config::ScanConfig;

/// Lines of context kept before the matched line.
pub const CONTEXT_BEFORE: usize = 4;

/// Lines of context kept after the matched line.
pub const CONTEXT_AFTER: usize = 6;

/// Trailing text shorter than this (in characters) is replaced by the whole line.
const MIN_TEXT_CHARS: usize = 3;

/// Comment terminator stripped from the end of task text.
const COMMENT_CLOSE: &str = "*/";

/// One tagged line found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTask {
    /// Random identifier, unique per scan.
    pub id: String,
    /// Repository-relative path of the file.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// Name of the tag that matched.
    pub tag: String,
    /// Cleaned task description.
    pub text: String,
    /// Source lines around the match, the matched line included.
    ///
    /// Lines are otherwise unmodified except that their terminators (`\n`
    /// or `\r\n`) are removed.
    #[serde(default)]
    pub context: Vec<String>,
}

impl ParsedTask {
    /// Create a task with a fresh id and no context.
    pub fn new(
        file: impl Into<String>,
        line: usize,
        tag: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: new_task_id(),
            file: file.into(),
            line,
            tag: tag.into(),
            text: text.into(),
            context: Vec::new(),
        }
    }

    /// Set the context lines.
    #[must_use]
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    /// Short `file:line` location string.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// Generate a fresh task identifier.
#[must_use]
pub fn new_task_id() -> String {
    Uuid::new_v4().to_string()
}

/// Extract tasks from one file.
///
/// Produces one task per matching line, in line order. Never fails: empty
/// content, content without tags and an empty tag list all yield no tasks.
///
/// # Example
///
/// ```rust
/// use tasksync::config::{ScanConfig, TagMatcher};
/// use tasksync::scanner::parse_file;
///
/// let config = ScanConfig::empty().with_tag(TagMatcher::new("TODO", ["TODO:"]));
/// let tasks = parse_file("fn main() {}\n/* TODO: add args */\n", "src/main.rs", &config);
///
/// assert_eq!(tasks.len(), 1);
/// assert_eq!(tasks[0].line, 2);
/// assert_eq!(tasks[0].text, "add args");
/// ```
#[must_use]
pub fn parse_file(content: &str, file_path: &str, config: &ScanConfig) -> Vec<ParsedTask> {
    let lines: Vec<&str> = content.lines().collect();

    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let found = match_line(line, &config.tags)?;
            Some(ParsedTask {
                id: new_task_id(),
                file: file_path.to_string(),
                line: index + 1,
                tag: found.tag_name.to_string(),
                text: extract_text(line, found.end()),
                context: context_window(&lines, index),
            })
        })
        .collect()
}

/// Text after the literal, or the whole line when that is too short to be useful.
fn extract_text(line: &str, literal_end: usize) -> String {
    let trailing = strip_comment_close(&line[literal_end..]);
    if trailing.chars().count() < MIN_TEXT_CHARS {
        strip_comment_close(line).to_string()
    } else {
        trailing.to_string()
    }
}

fn strip_comment_close(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_suffix(COMMENT_CLOSE)
        .map_or(trimmed, str::trim)
}

/// Lines `index - CONTEXT_BEFORE ..= index + CONTEXT_AFTER`, clamped to the file.
fn context_window(lines: &[&str], index: usize) -> Vec<String> {
    let start = index.saturating_sub(CONTEXT_BEFORE);
    let end = (index + CONTEXT_AFTER + 1).min(lines.len());
    lines[start..end].iter().map(|l| (*l).to_string()).collect()
}

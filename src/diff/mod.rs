//! Reconciliation of a new scan against the previously recorded tasks.
//!
//! [`generate_diff`] classifies every task as [`DiffType::Same`],
//! [`DiffType::Move`], [`DiffType::Update`], [`DiffType::New`] or
//! [`DiffType::Delete`]. Matching is greedy: new tasks are visited in order and
//! each claims the first eligible unclaimed old task, trying in turn
//!
//! 1. equal text (after trimming both sides): SAME when file and line also
//!    agree, MOVE otherwise;
//! 2. same line and tag with different text: UPDATE;
//! 3. nothing: NEW.
//!
//! Old tasks left unclaimed become DELETE. Results list the new-derived
//! entries in new-task order, then the deletions in old-task order.
//!
//! Rule 2 does not look at the file, so tasks on the same line of two
//! different files can pair up as an UPDATE.
//!
//! # Example
//!
//! ```rust
//! use tasksync::diff::{generate_diff, DiffType};
//! use tasksync::scanner::ParsedTask;
//!
//! let old = vec![ParsedTask::new("a.ts", 10, "TODO", "fix bug")];
//! let new = vec![ParsedTask::new("a.ts", 25, "TODO", "fix bug")];
//!
//! let diff = generate_diff(&old, &new);
//! assert_eq!(diff.len(), 1);
//! assert_eq!(diff[0].diff_type, DiffType::Move);
//! assert_eq!(diff[0].id, old[0].id);
//! ```

pub mod summary;

pub use summary::DiffSummary;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scanner::ParsedTask;

/// Classification of one task across two scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffType {
    /// Same text at the same file and line.
    Same,
    /// Same text, different file or line.
    Move,
    /// Same line and tag, different text.
    Update,
    /// No predecessor in the old scan.
    New,
    /// Old task with no successor in the new scan.
    Delete,
}

impl DiffType {
    /// Wire name ("SAME", "MOVE", ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffType::Same => "SAME",
            DiffType::Move => "MOVE",
            DiffType::Update => "UPDATE",
            DiffType::New => "NEW",
            DiffType::Delete => "DELETE",
        }
    }

    /// Whether the result pairs an old task with a new one.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, DiffType::Same | DiffType::Move | DiffType::Update)
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reviewable part of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffInfo {
    pub text: String,
    pub line: usize,
    pub file: String,
    #[serde(default)]
    pub context: Vec<String>,
}

impl From<&ParsedTask> for DiffInfo {
    fn from(task: &ParsedTask) -> Self {
        Self {
            text: task.text.clone(),
            line: task.line,
            file: task.file.clone(),
            context: task.context.clone(),
        }
    }
}

/// Old and new sides of a diff entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<DiffInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<DiffInfo>,
}

/// One classified task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Old task id when matched, otherwise the new task id.
    pub id: String,
    /// Tag of the new task (of the old one for DELETE).
    pub tag: String,
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub data: DiffData,
}

impl DiffResult {
    fn matched(diff_type: DiffType, old: &ParsedTask, new: &ParsedTask) -> Self {
        Self {
            id: old.id.clone(),
            tag: new.tag.clone(),
            diff_type,
            data: DiffData {
                old: Some(old.into()),
                new: Some(new.into()),
            },
        }
    }

    fn added(new: &ParsedTask) -> Self {
        Self {
            id: new.id.clone(),
            tag: new.tag.clone(),
            diff_type: DiffType::New,
            data: DiffData {
                old: None,
                new: Some(new.into()),
            },
        }
    }

    fn deleted(old: &ParsedTask) -> Self {
        Self {
            id: old.id.clone(),
            tag: old.tag.clone(),
            diff_type: DiffType::Delete,
            data: DiffData {
                old: Some(old.into()),
                new: None,
            },
        }
    }

    /// Whichever side describes the task as it stands after the change.
    #[must_use]
    pub fn current(&self) -> Option<&DiffInfo> {
        self.data.new.as_ref().or(self.data.old.as_ref())
    }
}

fn same_text(a: &ParsedTask, b: &ParsedTask) -> bool {
    a.text.trim() == b.text.trim()
}

/// Reconcile the previous task set against the current one.
///
/// Pure and deterministic apart from input order; see the module docs for
/// the matching rules. Produces `new_tasks.len()` entries plus one DELETE
/// per unclaimed old task.
#[must_use]
pub fn generate_diff(old_tasks: &[ParsedTask], new_tasks: &[ParsedTask]) -> Vec<DiffResult> {
    let mut claimed = vec![false; old_tasks.len()];
    let mut results = Vec::with_capacity(new_tasks.len() + old_tasks.len());

    for new in new_tasks {
        let by_text = old_tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed[*i])
            .find(|(_, old)| same_text(old, new));
        if let Some((index, old)) = by_text {
            claimed[index] = true;
            let diff_type = if old.line == new.line && old.file == new.file {
                DiffType::Same
            } else {
                DiffType::Move
            };
            results.push(DiffResult::matched(diff_type, old, new));
            continue;
        }

        let by_line = old_tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed[*i])
            .find(|(_, old)| old.line == new.line && old.tag == new.tag && !same_text(old, new));
        if let Some((index, old)) = by_line {
            claimed[index] = true;
            results.push(DiffResult::matched(DiffType::Update, old, new));
            continue;
        }

        results.push(DiffResult::added(new));
    }

    results.extend(
        old_tasks
            .iter()
            .zip(&claimed)
            .filter(|(_, was_claimed)| !**was_claimed)
            .map(|(old, _)| DiffResult::deleted(old)),
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(text: &str, line: usize, file: &str, tag: &str) -> ParsedTask {
        ParsedTask::new(file, line, tag, text)
    }

    fn types(results: &[DiffResult]) -> Vec<DiffType> {
        results.iter().map(|r| r.diff_type).collect()
    }

    #[test]
    fn test_same() {
        let old = vec![task("fix bug", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug", 10, "a.ts", "TODO")];
        let diff = generate_diff(&old, &new);

        assert_eq!(types(&diff), vec![DiffType::Same]);
        assert_eq!(diff[0].id, old[0].id);
        assert!(diff[0].data.old.is_some() && diff[0].data.new.is_some());
    }

    #[test]
    fn test_move_by_line() {
        let old = vec![task("fix bug", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug", 25, "a.ts", "TODO")];
        let diff = generate_diff(&old, &new);

        assert_eq!(types(&diff), vec![DiffType::Move]);
        assert_eq!(diff[0].data.old.as_ref().unwrap().line, 10);
        assert_eq!(diff[0].data.new.as_ref().unwrap().line, 25);
    }

    #[test]
    fn test_move_by_file() {
        let old = vec![task("fix bug", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug", 10, "b.ts", "TODO")];
        assert_eq!(types(&generate_diff(&old, &new)), vec![DiffType::Move]);
    }

    #[test]
    fn test_update() {
        let old = vec![task("fix bug", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug v2", 10, "a.ts", "TODO")];
        let diff = generate_diff(&old, &new);

        assert_eq!(types(&diff), vec![DiffType::Update]);
        assert_eq!(diff[0].id, old[0].id);
        assert_eq!(diff[0].data.old.as_ref().unwrap().text, "fix bug");
        assert_eq!(diff[0].data.new.as_ref().unwrap().text, "fix bug v2");
    }

    #[test]
    fn test_update_requires_same_tag() {
        let old = vec![task("fix bug", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug v2", 10, "a.ts", "FIXME")];
        assert_eq!(
            types(&generate_diff(&old, &new)),
            vec![DiffType::New, DiffType::Delete]
        );
    }

    #[test]
    fn test_update_ignores_file() {
        let old = vec![task("old words", 7, "a.ts", "TODO")];
        let new = vec![task("new words", 7, "elsewhere/b.ts", "TODO")];
        let diff = generate_diff(&old, &new);

        assert_eq!(types(&diff), vec![DiffType::Update]);
        assert_eq!(diff[0].data.old.as_ref().unwrap().file, "a.ts");
        assert_eq!(diff[0].data.new.as_ref().unwrap().file, "elsewhere/b.ts");
    }

    #[test]
    fn test_new() {
        let new = vec![task("new task", 1, "b.ts", "TODO")];
        let diff = generate_diff(&[], &new);

        assert_eq!(types(&diff), vec![DiffType::New]);
        assert_eq!(diff[0].id, new[0].id);
        assert!(diff[0].data.old.is_none());
    }

    #[test]
    fn test_delete() {
        let old = vec![task("stale", 5, "c.ts", "FIXME")];
        let diff = generate_diff(&old, &[]);

        assert_eq!(types(&diff), vec![DiffType::Delete]);
        assert_eq!(diff[0].tag, "FIXME");
        assert_eq!(diff[0].id, old[0].id);
        assert!(diff[0].data.new.is_none());
    }

    #[test]
    fn test_duplicate_text_claims_first_old() {
        let old = vec![task("dup", 3, "a.ts", "TODO"), task("dup", 9, "a.ts", "TODO")];
        let new = vec![task("dup", 3, "a.ts", "TODO")];
        let diff = generate_diff(&old, &new);

        assert_eq!(types(&diff), vec![DiffType::Same, DiffType::Delete]);
        assert_eq!(diff[0].id, old[0].id);
        assert_eq!(diff[1].id, old[1].id);
    }

    #[test]
    fn test_text_match_takes_first_old_even_if_later_is_exact() {
        let old = vec![task("dup", 3, "a.ts", "TODO"), task("dup", 9, "a.ts", "TODO")];
        let new = vec![task("dup", 9, "a.ts", "TODO")];
        let diff = generate_diff(&old, &new);

        assert_eq!(types(&diff), vec![DiffType::Move, DiffType::Delete]);
        assert_eq!(diff[0].id, old[0].id);
        assert_eq!(diff[1].id, old[1].id);
    }

    #[test]
    fn test_greedy_order_starves_later_task() {
        // The first new task takes the only "shared" old task by text, so the
        // second one, which would have been a MOVE, becomes NEW.
        let old = vec![task("shared", 1, "a.ts", "TODO")];
        let new = vec![
            task("shared", 40, "b.ts", "TODO"),
            task("shared", 2, "a.ts", "TODO"),
        ];
        let diff = generate_diff(&old, &new);
        assert_eq!(types(&diff), vec![DiffType::Move, DiffType::New]);
    }

    #[test]
    fn test_text_rule_beats_line_rule() {
        let old = vec![
            task("other", 10, "a.ts", "TODO"),
            task("moved", 50, "a.ts", "TODO"),
        ];
        let new = vec![task("moved", 10, "a.ts", "TODO")];
        let diff = generate_diff(&old, &new);

        assert_eq!(types(&diff), vec![DiffType::Move, DiffType::Delete]);
        assert_eq!(diff[0].id, old[1].id);
        assert_eq!(diff[1].id, old[0].id);
    }

    #[test]
    fn test_text_comparison_trims_only_edges() {
        let old = vec![task("  fix bug  ", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug", 10, "a.ts", "TODO")];
        assert_eq!(types(&generate_diff(&old, &new)), vec![DiffType::Same]);

        let old = vec![task("fix  bug", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug", 10, "a.ts", "TODO")];
        assert_eq!(types(&generate_diff(&old, &new)), vec![DiffType::Update]);

        let old = vec![task("Fix bug", 10, "a.ts", "TODO")];
        let new = vec![task("fix bug", 11, "a.ts", "TODO")];
        assert_eq!(
            types(&generate_diff(&old, &new)),
            vec![DiffType::New, DiffType::Delete]
        );
    }

    #[test]
    fn test_output_order() {
        let old = vec![
            task("gone one", 1, "a.ts", "TODO"),
            task("kept", 2, "a.ts", "TODO"),
            task("gone two", 3, "a.ts", "FIXME"),
        ];
        let new = vec![
            task("brand new", 8, "a.ts", "TODO"),
            task("kept", 2, "a.ts", "TODO"),
        ];
        let diff = generate_diff(&old, &new);

        assert_eq!(
            types(&diff),
            vec![
                DiffType::New,
                DiffType::Same,
                DiffType::Delete,
                DiffType::Delete
            ]
        );
        assert_eq!(diff[2].id, old[0].id);
        assert_eq!(diff[3].id, old[2].id);
    }

    #[test]
    fn test_totality() {
        let old: Vec<_> = (1..=6)
            .map(|i| task(&format!("task {}", i % 3), i, "a.ts", "TODO"))
            .collect();
        let new: Vec<_> = (1..=5)
            .map(|i| task(&format!("task {}", i % 4), i + 1, "a.ts", "TODO"))
            .collect();
        let diff = generate_diff(&old, &new);

        let deletes = diff.iter().filter(|r| r.diff_type == DiffType::Delete).count();
        let claimed = diff.iter().filter(|r| r.diff_type.is_matched()).count();
        assert_eq!(diff.len(), new.len() + deletes);
        assert_eq!(deletes + claimed, old.len());
    }

    #[test]
    fn test_each_old_claimed_once() {
        let old = vec![task("x", 1, "a.ts", "TODO")];
        let new = vec![task("x", 1, "a.ts", "TODO"), task("y", 1, "a.ts", "TODO")];
        let diff = generate_diff(&old, &new);
        assert_eq!(types(&diff), vec![DiffType::Same, DiffType::New]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(generate_diff(&[], &[]).is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let old = vec![task("stale", 5, "c.ts", "FIXME")];
        let diff = generate_diff(&old, &[]);
        let json = serde_json::to_value(&diff[0]).unwrap();

        assert_eq!(json["type"], "DELETE");
        assert_eq!(json["tag"], "FIXME");
        assert_eq!(json["data"]["old"]["line"], 5);
        assert!(json["data"].get("new").is_none());

        let back: DiffResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, diff[0]);
    }

    #[test]
    fn test_diff_type_value_names() {
        assert_eq!(DiffType::from_str("move", true).unwrap(), DiffType::Move);
        assert_eq!(DiffType::from_str("DELETE", true).unwrap(), DiffType::Delete);
        assert!(DiffType::from_str("renamed", true).is_err());

        let names: Vec<_> = DiffType::value_variants()
            .iter()
            .filter_map(|t| t.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["same", "move", "update", "new", "delete"]);
        assert_eq!(DiffType::Update.to_string(), "UPDATE");
    }
}

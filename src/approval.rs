//! Applying reviewed diff results to the recorded task set.
//!
//! A reviewer accepts or rejects each [`DiffResult`]; [`apply_approved`]
//! folds the decisions into the task list that becomes the next snapshot.
//! Matched tasks keep the id they were first recorded under.

use std::collections::{HashMap, HashSet};

use crate::diff::{DiffInfo, DiffResult, DiffType};
use crate::scanner::ParsedTask;

/// Which diff results a reviewer accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// Accept every result.
    AcceptAll,
    /// Accept nothing; the recorded set stays as it was.
    RejectAll,
    /// Accept results of the listed types.
    AcceptTypes(HashSet<DiffType>),
    /// Accept the results with the listed ids.
    AcceptIds(HashSet<String>),
}

impl ApprovalPolicy {
    /// Accept the given types.
    pub fn accept_types(types: impl IntoIterator<Item = DiffType>) -> Self {
        Self::AcceptTypes(types.into_iter().collect())
    }

    /// Accept the given ids.
    pub fn accept_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AcceptIds(ids.into_iter().map(Into::into).collect())
    }

    /// Whether `result` is accepted.
    #[must_use]
    pub fn accepts(&self, result: &DiffResult) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::RejectAll => false,
            Self::AcceptTypes(types) => types.contains(&result.diff_type),
            Self::AcceptIds(ids) => ids.contains(&result.id),
        }
    }
}

/// Number of results a policy accepts.
#[must_use]
pub fn count_accepted(results: &[DiffResult], policy: &ApprovalPolicy) -> usize {
    results.iter().filter(|r| policy.accepts(r)).count()
}

/// Build the next recorded task set from `previous` and reviewed `results`.
///
/// | type | accepted | rejected |
/// |---|---|---|
/// | SAME / MOVE / UPDATE | new side, old id | old task unchanged |
/// | NEW | added | dropped |
/// | DELETE | dropped | old task kept |
///
/// Tasks come out in result order. Previous tasks no result refers to are
/// kept and appended at the end.
#[must_use]
pub fn apply_approved(
    previous: &[ParsedTask],
    results: &[DiffResult],
    policy: &ApprovalPolicy,
) -> Vec<ParsedTask> {
    let by_id: HashMap<&str, &ParsedTask> =
        previous.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut referenced = HashSet::new();
    let mut next = Vec::with_capacity(results.len());

    for result in results {
        let accepted = policy.accepts(result);
        if result.diff_type != DiffType::New {
            referenced.insert(result.id.as_str());
        }

        let keep_old = || {
            by_id
                .get(result.id.as_str())
                .map(|t| (*t).clone())
                .or_else(|| result.data.old.as_ref().map(|info| to_task(result, info)))
        };

        let task = match (result.diff_type, accepted) {
            (DiffType::Same | DiffType::Move | DiffType::Update | DiffType::New, true) => {
                result.data.new.as_ref().map(|info| to_task(result, info))
            }
            (DiffType::Same | DiffType::Move | DiffType::Update | DiffType::Delete, false) => {
                keep_old()
            }
            (DiffType::New, false) | (DiffType::Delete, true) => None,
        };
        next.extend(task);
    }

    next.extend(
        previous
            .iter()
            .filter(|t| !referenced.contains(t.id.as_str()))
            .cloned(),
    );
    next
}

fn to_task(result: &DiffResult, info: &DiffInfo) -> ParsedTask {
    ParsedTask {
        id: result.id.clone(),
        file: info.file.clone(),
        line: info.line,
        tag: result.tag.clone(),
        text: info.text.clone(),
        context: info.context.clone(),
    }
}

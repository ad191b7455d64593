//! Tag matching on a single line.

use crate::config::TagMatcher;

/// Where a tag literal was found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch<'a> {
    /// Name of the matching tag.
    pub tag_name: &'a str,
    /// Byte offset of the first character of the literal.
    pub match_index: usize,
    /// Byte length of the literal.
    pub match_length: usize,
}

impl TagMatch<'_> {
    /// Byte offset just past the matched literal.
    #[must_use]
    pub fn end(&self) -> usize {
        self.match_index + self.match_length
    }
}

/// Find the first tag literal occurring in `line`.
///
/// Tags are tried in configured order and, within a tag, literals in
/// configured order; the first literal found anywhere in the line wins, even
/// if a lower-priority literal occurs earlier in the text. Empty literals are
/// never tested.
///
/// # Example
///
/// ```rust
/// use tasksync::config::TagMatcher;
/// use tasksync::scanner::match_line;
///
/// let tags = vec![
///     TagMatcher::new("FIXME", ["FIXME:"]),
///     TagMatcher::new("TODO", ["TODO:"]),
/// ];
/// let m = match_line("// TODO: later FIXME: now", &tags).unwrap();
/// assert_eq!(m.tag_name, "FIXME");
/// assert_eq!(m.match_index, 15);
/// ```
#[must_use]
pub fn match_line<'a>(line: &str, tags: &'a [TagMatcher]) -> Option<TagMatch<'a>> {
    tags.iter().find_map(|tag| {
        tag.active_patterns().find_map(|literal| {
            line.find(literal).map(|match_index| TagMatch {
                tag_name: tag.name.as_str(),
                match_index,
                match_length: literal.len(),
            })
        })
    })
}

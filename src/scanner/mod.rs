//! Tagged-comment extraction.
//!
//! - [`matcher`] - finds the first configured tag literal in a line
//! - [`parser`] - turns one file's content into [`ParsedTask`]s
//! - [`filter`] - decides which repository paths are skipped
//!
//! Everything here is pure: no I/O, no logging, no shared state. Files can be
//! parsed in parallel with a shared `&ScanConfig`.

pub mod filter;
pub mod matcher;
pub mod parser;

pub use filter::{should_ignore, PathFilter};
pub use matcher::{match_line, TagMatch};
pub use parser::{parse_file, ParsedTask, CONTEXT_AFTER, CONTEXT_BEFORE};

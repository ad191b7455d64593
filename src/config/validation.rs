//! Scan configuration validation.
//!
//! Catches the mistakes that would otherwise surface mid-scan (a broken
//! ignore regex) or silently change results (duplicate tag names, tags that
//! can never match).
//!
//! # Example
//!
//! ```rust
//! use tasksync::config::{ConfigValidator, ScanConfig, TagMatcher};
//!
//! let config = ScanConfig::empty()
//!     .with_tag(TagMatcher::new("TODO", ["TODO:"]))
//!     .with_ignore("(unclosed");
//!
//! let report = ConfigValidator::new(&config).validate();
//! assert!(!report.is_valid());
//! assert_eq!(report.exit_code(), 1);
//! ```

use std::collections::HashSet;

use regex::Regex;

use super::ScanConfig;

/// Result of configuration validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Errors that prevent the configuration from being used.
    pub errors: Vec<String>,
    /// Warnings that don't prevent use but indicate potential issues.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report.
    ///
    /// An empty report is considered valid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the configuration is valid (no errors).
    ///
    /// Warnings do not affect validity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns 0 if valid, 1 if invalid.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.is_valid() {
            0
        } else {
            1
        }
    }

    /// Generate a human-readable summary of the validation result.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_valid() {
            if self.warnings.is_empty() {
                "Configuration is valid.".to_string()
            } else {
                format!(
                    "Configuration is valid with {} warning(s).",
                    self.warnings.len()
                )
            }
        } else {
            format!(
                "Configuration is invalid with {} error(s).",
                self.errors.len()
            )
        }
    }
}

/// Validates a [`ScanConfig`].
pub struct ConfigValidator<'a> {
    config: &'a ScanConfig,
}

impl<'a> ConfigValidator<'a> {
    /// Create a validator for the given configuration.
    #[must_use]
    pub fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Run every check and collect the findings.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_tags(&mut report);
        self.check_ignore(&mut report);
        report
    }

    fn check_tags(&self, report: &mut ValidationReport) {
        let mut seen = HashSet::new();

        for (i, tag) in self.config.tags.iter().enumerate() {
            if tag.name.trim().is_empty() {
                report.errors.push(format!("tags[{i}]: tag name is empty"));
            } else if !seen.insert(tag.name.as_str()) {
                report
                    .errors
                    .push(format!("tags[{i}]: duplicate tag name '{}'", tag.name));
            }

            let empty = tag.patterns.iter().filter(|p| p.is_empty()).count();
            if empty > 0 {
                report.warnings.push(format!(
                    "tag '{}': {empty} empty literal(s) will be ignored",
                    tag.name
                ));
            }
            if tag.active_patterns().next().is_none() {
                report
                    .warnings
                    .push(format!("tag '{}' has no literals and will never match", tag.name));
            }
        }

        if self.config.tags.is_empty() {
            report
                .warnings
                .push("no tags configured; scans will find nothing".to_string());
        }
    }

    fn check_ignore(&self, report: &mut ValidationReport) {
        for pattern in &self.config.ignore {
            if let Err(e) = Regex::new(pattern) {
                report
                    .errors
                    .push(format!("ignore pattern '{pattern}' is not a valid regex: {e}"));
            }
        }
    }
}

//! Scan configuration for tasksync.
//!
//! A [`ScanConfig`] names the tags to look for (each with an ordered list of
//! literal markers) and the ignore patterns applied to repository paths. It is
//! plain data: built once per scan, shared by reference, never mutated.
//!
//! # Example .tasksync.toml
//!
//! ```toml
//! ignore = ["node_modules/", "\\.min\\.js$"]
//!
//! [[tags]]
//! name = "TODO"
//! match = ["TODO:", "@todo"]
//!
//! [[tags]]
//! name = "FIXME"
//! match = ["FIXME:"]
//! ```

pub mod validation;

pub use validation::{ConfigValidator, ValidationReport};

use crate::error::{Result, TaskSyncError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level TOML config file name
pub const PROJECT_TOML: &str = ".tasksync.toml";

/// Project-level JSON config file name
pub const PROJECT_JSON: &str = ".tasksync.json";

/// File name of the user-level config inside its config directory
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Directory holding tasksync state inside a project
pub const STATE_DIR: &str = ".tasksync";

/// A named tag and the literals that identify it in source text.
///
/// Literal order is a priority order: the first literal found in a line wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatcher {
    /// Tag name reported on every task it produces (e.g. "TODO").
    pub name: String,

    /// Literal substrings, tried in order. Empty literals are skipped.
    #[serde(rename = "match", default)]
    pub patterns: Vec<String>,
}

impl TagMatcher {
    /// Create a tag matcher from a name and its literals.
    pub fn new<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Literals that can actually match (non-empty), in configured order.
    pub fn active_patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns
            .iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }
}

/// Tags and ignore patterns for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Tags in priority order.
    #[serde(default)]
    pub tags: Vec<TagMatcher>,

    /// Regular expressions; a path matching any of them is not scanned.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tags: default_tags(),
            ignore: default_ignore_patterns(),
        }
    }
}

/// Default tag set
pub fn default_tags() -> Vec<TagMatcher> {
    vec![
        TagMatcher::new("TODO", ["TODO:", "@todo", "TODO "]),
        TagMatcher::new("FIXME", ["FIXME:", "FIXME "]),
        TagMatcher::new("HACK", ["HACK:"]),
        TagMatcher::new("BUG", ["BUG:"]),
    ]
}

/// Default ignore patterns for vendored code, build output and lockfiles
pub fn default_ignore_patterns() -> Vec<String> {
    [
        r"(^|/)node_modules/",
        r"(^|/)target/",
        r"(^|/)dist/",
        r"(^|/)\.git/",
        r"\.lock$",
        r"package-lock\.json$",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl ScanConfig {
    /// Create an empty configuration (no tags, no ignore patterns).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tags: Vec::new(),
            ignore: Vec::new(),
        }
    }

    /// Add a tag at the lowest priority.
    #[must_use]
    pub fn with_tag(mut self, tag: TagMatcher) -> Self {
        self.tags.push(tag);
        self
    }

    /// Add an ignore pattern.
    #[must_use]
    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    /// Look up a tag by name.
    pub fn tag(&self, name: &str) -> Option<&TagMatcher> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Load configuration for a project.
    ///
    /// Looks at `.tasksync.toml`, then `.tasksync.json` in the project, then
    /// the user config file. Falls back to [`ScanConfig::default`].
    pub fn load(project_dir: &Path) -> Result<Self> {
        Self::load_with(project_dir, Self::user_config_path().as_deref())
    }

    /// Like [`ScanConfig::load`] with an explicit user config file.
    pub fn load_with(project_dir: &Path, user_config: Option<&Path>) -> Result<Self> {
        match Self::locate_with(project_dir, user_config) {
            Some(path) => {
                debug!("Loading scan config from {}", path.display());
                Self::load_file(&path)
            }
            None => {
                debug!("No config file found, using default tags");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file, picking the format by extension.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TaskSyncError::config_with_path(format!("failed to read: {e}"), path.to_path_buf())
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| TaskSyncError::config_with_path(message, path.to_path_buf()))
    }

    /// Find the config file that [`ScanConfig::load`] would read.
    pub fn locate(project_dir: &Path) -> Option<PathBuf> {
        Self::locate_with(project_dir, Self::user_config_path().as_deref())
    }

    /// Find the config file that [`ScanConfig::load_with`] would read.
    pub fn locate_with(project_dir: &Path, user_config: Option<&Path>) -> Option<PathBuf> {
        [
            Some(project_dir.join(PROJECT_TOML)),
            Some(project_dir.join(PROJECT_JSON)),
            user_config.map(Path::to_path_buf),
        ]
        .into_iter()
        .flatten()
        .find(|p| p.is_file())
    }

    /// User-level config file (`<config dir>/tasksync/config.toml`).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| Self::user_config_in(&d.join("tasksync")))
    }

    /// The user config file inside a tasksync config directory.
    pub fn user_config_in(dir: &Path) -> PathBuf {
        dir.join(USER_CONFIG_FILE)
    }

    /// Get the state directory for a project
    pub fn state_dir(project_dir: &Path) -> PathBuf {
        project_dir.join(STATE_DIR)
    }

    /// Render as TOML, as written by `tasksync init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TaskSyncError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_has_tags() {
        let config = ScanConfig::default();
        assert_eq!(config.tags[0].name, "TODO");
        assert!(config.tag("FIXME").is_some());
        assert!(!config.ignore.is_empty());
    }

    #[test]
    fn test_active_patterns_skip_empty() {
        let tag = TagMatcher::new("TODO", ["", "TODO:", ""]);
        let active: Vec<_> = tag.active_patterns().collect();
        assert_eq!(active, vec!["TODO:"]);
    }

    #[test]
    fn test_match_field_name_on_the_wire() {
        let json = r#"{"tags":[{"name":"TODO","match":["TODO:"]}],"ignore":["vendor/"]}"#;
        let config: ScanConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tags[0].patterns, vec!["TODO:".to_string()]);
        assert_eq!(config.ignore, vec!["vendor/".to_string()]);

        let back = serde_json::to_value(&config).unwrap();
        assert!(back["tags"][0].get("match").is_some());
    }

    #[test]
    fn test_load_toml_from_project() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_TOML),
            "ignore = []\n\n[[tags]]\nname = \"NOTE\"\nmatch = [\"NOTE:\"]\n",
        )
        .unwrap();

        let config = ScanConfig::load(temp.path()).unwrap();
        assert_eq!(config.tags.len(), 1);
        assert_eq!(config.tags[0].name, "NOTE");
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn test_load_json_from_project() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_JSON),
            r#"{"tags":[{"name":"XXX","match":["XXX"]}]}"#,
        )
        .unwrap();

        let config = ScanConfig::load(temp.path()).unwrap();
        assert_eq!(config.tags[0].name, "XXX");
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn test_toml_wins_over_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_TOML),
            "[[tags]]\nname = \"FROM_TOML\"\nmatch = [\"T\"]\n",
        )
        .unwrap();
        std::fs::write(
            temp.path().join(PROJECT_JSON),
            r#"{"tags":[{"name":"FROM_JSON","match":["J"]}]}"#,
        )
        .unwrap();

        let config = ScanConfig::load(temp.path()).unwrap();
        assert_eq!(config.tags[0].name, "FROM_TOML");
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(PROJECT_JSON);
        std::fs::write(&path, "{ not json").unwrap();

        let err = ScanConfig::load_file(&path).unwrap_err();
        match err {
            TaskSyncError::Config { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(PROJECT_TOML);
        std::fs::write(&path, "[[tags]\nname = ").unwrap();

        let err = ScanConfig::load(temp.path()).unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(err.exit_code(), 7);
        assert!(matches!(err, TaskSyncError::Config { path: Some(p), .. } if p == path));
    }

    #[test]
    fn test_user_config_used_when_project_has_none() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        let user_config = ScanConfig::user_config_in(user.path());
        std::fs::write(
            &user_config,
            "[[tags]]\nname = \"MINE\"\nmatch = [\"MINE:\"]\n",
        )
        .unwrap();

        let config = ScanConfig::load_with(project.path(), Some(&user_config)).unwrap();
        assert_eq!(config.tags[0].name, "MINE");

        // A project file takes precedence.
        std::fs::write(
            project.path().join(PROJECT_JSON),
            r#"{"tags":[{"name":"PROJECT","match":["P:"]}]}"#,
        )
        .unwrap();
        let config = ScanConfig::load_with(project.path(), Some(&user_config)).unwrap();
        assert_eq!(config.tags[0].name, "PROJECT");
    }

    #[test]
    fn test_missing_user_config_falls_back_to_defaults() {
        let project = TempDir::new().unwrap();
        let missing = project.path().join("nowhere").join(USER_CONFIG_FILE);

        assert_eq!(ScanConfig::locate_with(project.path(), Some(&missing)), None);
        assert_eq!(
            ScanConfig::load_with(project.path(), Some(&missing)).unwrap(),
            ScanConfig::default()
        );
    }

    #[test]
    fn test_to_toml_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(PROJECT_TOML);
        let config = ScanConfig::default();
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        assert_eq!(ScanConfig::load_file(&path).unwrap(), config);
    }
}

//! Lint configuration.
//!
//! Built in code with chainable setters or loaded from a TOML file:
//!
//! ```toml
//! content_dir = "source/_posts"
//! extensions = ["md"]
//! exclude = ["drafts/**", "**/_index.md"]
//!
//! [[exempt]]
//! field = "layout"
//! value = "redirect"
//! ```

use crate::error::{PostlintError, Result};
use crate::title::{ExemptField, TitleRules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the content directory.
pub const CONTENT_DIR_ENV: &str = "POSTLINT_CONTENT_DIR";

/// Content directory used when neither the CLI, the environment nor the
/// config file names one.
pub const DEFAULT_CONTENT_DIR: &str = "content";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "postlint.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Root of the content tree
    pub content_dir: Option<PathBuf>,
    /// File extensions treated as documents (without the dot)
    pub extensions: Vec<String>,
    /// Glob patterns, relative to the content root, of paths to skip
    pub exclude: Vec<String>,
    /// `field: value` pairs that exempt a document from title rules
    pub exempt: Vec<ExemptField>,
    /// Follow symlinks while walking
    pub follow_links: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            extensions: vec!["md".to_string(), "markdown".to_string()],
            exclude: Vec::new(),
            exempt: TitleRules::default().exempt,
            follow_links: false,
        }
    }
}

impl LintConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_dir(mut self, path: PathBuf) -> Self {
        self.content_dir = Some(path);
        self
    }

    /// Replace the document extensions.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Add an exclude glob.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Add an exempt `field: value` pair.
    pub fn exempt(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.exempt.push(ExemptField::new(field, value));
        self
    }

    /// Drop all exemptions, including the default `layout: redirect`.
    pub fn no_exemptions(mut self) -> Self {
        self.exempt.clear();
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PostlintError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn title_rules(&self) -> TitleRules {
        TitleRules {
            exempt: self.exempt.clone(),
        }
    }

    /// Whether `path` has one of the configured extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

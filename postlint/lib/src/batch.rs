//! Fail-soft batch drivers over a content tree.
//!
//! Each document is read, parsed, checked and (in fix mode) written back
//! before the next one is opened. A document that cannot be read or written
//! is recorded as a [`FileFailure`] and the batch moves on.

use crate::config::LintConfig;
use crate::discovery::discover_documents;
use crate::document::Document;
use crate::error::{FileFailure, Result};
use crate::seo::{FieldPresence, SeoEntry, SeoSummary};
use crate::title::{self, TitleIssue, TitleIssueKind, TitleRules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Whether `check_titles` only reports or also rewrites fixable titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitleMode {
    #[default]
    Report,
    Fix,
}

/// Title findings for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleEntry {
    pub path: PathBuf,
    pub issues: Vec<TitleIssue>,
    /// The title was quoted and the document rewritten.
    pub fixed: bool,
}

impl TitleEntry {
    /// Issues still present after processing.
    pub fn unresolved(&self) -> impl Iterator<Item = &TitleIssue> {
        self.issues
            .iter()
            .filter(move |i| !(self.fixed && i.kind == TitleIssueKind::UnquotedColon))
    }
}

/// Result of a title run. Only documents with findings are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleReport {
    pub root: PathBuf,
    pub documents: usize,
    pub entries: Vec<TitleEntry>,
    pub failures: Vec<FileFailure>,
}

impl TitleReport {
    pub fn fixed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.fixed).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.entries.iter().map(|e| e.unresolved().count()).sum()
    }

    /// No unresolved issues and no failures.
    pub fn is_clean(&self) -> bool {
        self.unresolved_count() == 0 && self.failures.is_empty()
    }
}

/// Result of an SEO run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    pub root: PathBuf,
    pub entries: Vec<SeoEntry>,
    pub summary: SeoSummary,
    pub failures: Vec<FileFailure>,
}

/// Validates the title of every document under `root`, optionally fixing
/// unquoted colons in place.
pub fn check_titles(root: &Path, config: &LintConfig, mode: TitleMode) -> Result<TitleReport> {
    let rules = config.title_rules();
    let discovery = discover_documents(root, config)?;

    let mut report = TitleReport {
        root: root.to_path_buf(),
        documents: discovery.documents.len(),
        failures: discovery.failures,
        ..Default::default()
    };

    for path in discovery.documents {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read document");
                report.failures.push(FileFailure::unreadable(path, &err));
                continue;
            }
        };

        let (entry, failure) = process_title(path, &content, &rules, mode);
        if let Some(failure) = failure {
            report.failures.push(failure);
        }
        if let Some(entry) = entry {
            report.entries.push(entry);
        }
    }

    info!(
        documents = report.documents,
        with_issues = report.entries.len(),
        fixed = report.fixed_count(),
        failures = report.failures.len(),
        "title check complete"
    );
    Ok(report)
}

fn process_title(
    path: PathBuf,
    content: &str,
    rules: &TitleRules,
    mode: TitleMode,
) -> (Option<TitleEntry>, Option<FileFailure>) {
    let issues = title::validate(&Document::new(content), rules);
    if issues.is_empty() {
        debug!(path = %path.display(), "title ok");
        return (None, None);
    }

    let mut fixed = false;
    let mut failure = None;

    if mode == TitleMode::Fix {
        if let Some(replacement) = title::fix_unquoted_colon(content, rules) {
            match write_atomic(&path, &replacement) {
                Ok(()) => {
                    debug!(path = %path.display(), "quoted title");
                    fixed = true;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to write fixed document");
                    failure = Some(FileFailure::write_failure(path.clone(), &err));
                }
            }
        }
    }

    (Some(TitleEntry { path, issues, fixed }), failure)
}

/// Writes `content` to a temp file beside the real document and renames it
/// over the document. Symlinks are resolved first so the link survives and
/// its target is rewritten, and the original permissions are carried over.
/// On failure the temp file is removed and the document is left as it was.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let permissions = fs::metadata(&target)?.permissions();

    let mut temp_name = target.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".postlint.tmp");
    let temp_path = target.with_file_name(temp_name);

    let result = fs::write(&temp_path, content)
        .and_then(|()| fs::set_permissions(&temp_path, permissions))
        .and_then(|()| fs::rename(&temp_path, &target));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Computes SEO field presence for every document under `root`.
pub fn analyze_seo(root: &Path, config: &LintConfig) -> Result<SeoReport> {
    let discovery = discover_documents(root, config)?;

    let mut report = SeoReport {
        root: root.to_path_buf(),
        failures: discovery.failures,
        ..Default::default()
    };

    for path in discovery.documents {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read document");
                report.failures.push(FileFailure::unreadable(path, &err));
                continue;
            }
        };

        let presence = Document::new(&content)
            .parse_block()
            .map(|block| FieldPresence::from_block(&block));
        report.summary.record(presence.as_ref());
        report.entries.push(SeoEntry { path, presence });
    }

    info!(
        documents = report.summary.documents,
        complete = report.summary.complete,
        failures = report.failures.len(),
        "seo analysis complete"
    );
    Ok(report)
}

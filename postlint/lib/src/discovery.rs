//! Content tree discovery.

use crate::config::LintConfig;
use crate::error::{FileFailure, PostlintError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Documents found under a content root, plus the entries the walk could
/// not read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub documents: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

/// Lists the documents under `root`, sorted by path.
///
/// Entries the walk cannot read (unreadable directories, dangling links,
/// link loops) are recorded in [`Discovery::failures`] and the walk goes on;
/// only a missing root or an invalid exclude pattern is an error.
pub fn discover_documents(root: &Path, config: &LintConfig) -> Result<Discovery> {
    if !root.is_dir() {
        return Err(PostlintError::DirectoryNotFound(root.to_path_buf()));
    }

    let excludes = build_excludes(&config.exclude)?;
    let is_excluded = |path: &Path| excludes.is_match(path.strip_prefix(root).unwrap_or(path));
    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                if is_excluded(&path) {
                    continue;
                }
                warn!(path = %path.display(), error = %err, "unreadable entry in content tree");
                discovery.failures.push(FileFailure::unreadable_entry(path, err.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() || !config.is_document(entry.path()) {
            continue;
        }

        if is_excluded(entry.path()) {
            debug!(path = %entry.path().display(), "excluded");
            continue;
        }

        discovery.documents.push(entry.into_path());
    }

    debug!(
        root = %root.display(),
        count = discovery.documents.len(),
        failures = discovery.failures.len(),
        "discovered documents"
    );
    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileFailureKind;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts/2024")).unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("about.md"), "x").unwrap();
        fs::write(dir.path().join("posts/2024/b.markdown"), "x").unwrap();
        fs::write(dir.path().join("posts/a.md"), "x").unwrap();
        fs::write(dir.path().join("posts/image.png"), "x").unwrap();
        fs::write(dir.path().join("drafts/wip.md"), "x").unwrap();
        dir
    }

    fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_finds_documents_sorted() {
        let dir = tree();
        let docs = discover_documents(dir.path(), &LintConfig::new()).unwrap().documents;
        assert_eq!(
            relative(dir.path(), &docs),
            vec!["about.md", "drafts/wip.md", "posts/2024/b.markdown", "posts/a.md"]
        );
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = tree();
        let config = LintConfig::new().exclude("drafts/**").extensions(["md"]);
        let docs = discover_documents(dir.path(), &config).unwrap().documents;
        assert_eq!(relative(dir.path(), &docs), vec!["about.md", "posts/a.md"]);
    }

    #[test]
    fn test_missing_root() {
        let err = discover_documents(Path::new("/no/such/content"), &LintConfig::new()).unwrap_err();
        assert!(matches!(err, PostlintError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_invalid_glob() {
        let dir = tree();
        let config = LintConfig::new().exclude("posts/[");
        let err = discover_documents(dir.path(), &config).unwrap_err();
        assert!(matches!(err, PostlintError::Glob(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_recorded_as_failure() {
        let dir = tree();
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("posts/dangling.md"))
            .unwrap();

        let config = LintConfig::new().follow_links(true);
        let discovery = discover_documents(dir.path(), &config).unwrap();
        assert_eq!(discovery.documents.len(), 4);
        assert_eq!(discovery.failures.len(), 1);
        assert_eq!(discovery.failures[0].kind, FileFailureKind::UnreadableFile);
        assert!(discovery.failures[0].path.ends_with("posts/dangling.md"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_under_excluded_path_ignored() {
        let dir = tree();
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("drafts/dangling.md"))
            .unwrap();

        let config = LintConfig::new().follow_links(true).exclude("drafts/**");
        let discovery = discover_documents(dir.path(), &config).unwrap();
        assert!(discovery.failures.is_empty());
        assert_eq!(discovery.documents.len(), 3);
    }
}

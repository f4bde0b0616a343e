//! Integration tests for the batch drivers over a real directory tree.

use postlint_lib::{
    FileFailureKind, LintConfig, PostlintError, TitleIssueKind, TitleMode, analyze_seo,
    check_titles,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COLON: &str = "---\ntitle: Hello: World\ndate: 2024-01-01\n---\n# Hello: World\n\nBody.\n";
const VALID: &str = "---\ntitle: \"Valid Title\"\ndescription: A post\nkeywords:\n  - rust\n  - blog\n---\nBody\n";
const NO_TITLE: &str = "---\ndate: 2024-01-01\n---\nBody\n";
const EMPTY_TITLE: &str = "---\ntitle: \"\"\n---\n";
const NO_BLOCK: &str = "# Just markdown: no front matter\n";
const REDIRECT: &str = "---\nlayout: redirect\nredirect_to: /new/\n---\n";

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn content_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "posts/colon.md", COLON.as_bytes());
    write(root, "posts/valid.md", VALID.as_bytes());
    write(root, "posts/2023/no-title.md", NO_TITLE.as_bytes());
    write(root, "posts/2023/empty.md", EMPTY_TITLE.as_bytes());
    write(root, "pages/plain.md", NO_BLOCK.as_bytes());
    write(root, "pages/old-url.md", REDIRECT.as_bytes());
    write(root, "assets/logo.svg", b"<svg/>");
    dir
}

fn kinds_for(report: &postlint_lib::TitleReport, name: &str) -> Vec<TitleIssueKind> {
    report
        .entries
        .iter()
        .find(|e| e.path.ends_with(name))
        .map(|e| e.issues.iter().map(|i| i.kind).collect())
        .unwrap_or_default()
}

#[test]
fn test_report_mode_finds_every_issue_without_writing() {
    let dir = content_tree();
    let report = check_titles(dir.path(), &LintConfig::new(), TitleMode::Report).unwrap();

    assert_eq!(report.documents, 6);
    assert_eq!(report.entries.len(), 4);
    assert_eq!(kinds_for(&report, "colon.md"), vec![TitleIssueKind::UnquotedColon]);
    assert_eq!(kinds_for(&report, "no-title.md"), vec![TitleIssueKind::MissingTitle]);
    assert_eq!(kinds_for(&report, "empty.md"), vec![TitleIssueKind::EmptyTitle]);
    assert_eq!(kinds_for(&report, "plain.md"), vec![TitleIssueKind::MissingFrontMatter]);
    assert!(kinds_for(&report, "old-url.md").is_empty());
    assert!(!report.is_clean());

    let untouched = fs::read_to_string(dir.path().join("posts/colon.md")).unwrap();
    assert_eq!(untouched, COLON);
}

#[test]
fn test_fix_mode_quotes_title_and_is_idempotent() {
    let dir = content_tree();
    let colon = dir.path().join("posts/colon.md");

    let first = check_titles(dir.path(), &LintConfig::new(), TitleMode::Fix).unwrap();
    assert_eq!(first.fixed_count(), 1);
    // missing title, empty title and missing front matter remain
    assert_eq!(first.unresolved_count(), 3);

    let fixed = fs::read_to_string(&colon).unwrap();
    assert_eq!(
        fixed,
        "---\ntitle: \"Hello: World\"\ndate: 2024-01-01\n---\n# Hello: World\n\nBody.\n"
    );

    // no temp files left behind
    let leftovers: Vec<_> = fs::read_dir(dir.path().join("posts"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    let second = check_titles(dir.path(), &LintConfig::new(), TitleMode::Fix).unwrap();
    assert_eq!(second.fixed_count(), 0);
    assert_eq!(fs::read_to_string(&colon).unwrap(), fixed);

    // documents that were not fixable are byte-identical
    assert_eq!(fs::read_to_string(dir.path().join("pages/plain.md")).unwrap(), NO_BLOCK);
    assert_eq!(fs::read_to_string(dir.path().join("posts/valid.md")).unwrap(), VALID);
}

#[test]
fn test_fix_mode_clean_tree() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.md", b"---\ntitle: A: B\n---\n");
    write(dir.path(), "b.md", VALID.as_bytes());

    let report = check_titles(dir.path(), &LintConfig::new(), TitleMode::Fix).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.fixed_count(), 1);
}

#[test]
fn test_unreadable_file_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a-bad.md", &[0xff, 0xfe, 0x00, 0x80]);
    write(dir.path(), "b-colon.md", COLON.as_bytes());

    let report = check_titles(dir.path(), &LintConfig::new(), TitleMode::Fix).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FileFailureKind::UnreadableFile);
    assert!(report.failures[0].path.ends_with("a-bad.md"));
    assert_eq!(report.fixed_count(), 1);
    assert!(!report.is_clean());
}

#[test]
fn test_exclude_and_exemption_config() {
    let dir = content_tree();
    let config = LintConfig::new()
        .exclude("pages/**")
        .exclude("posts/2023/**");
    let report = check_titles(dir.path(), &config, TitleMode::Report).unwrap();
    assert_eq!(report.documents, 2);
    assert_eq!(report.entries.len(), 1);

    let strict = LintConfig::new().no_exemptions().exclude("posts/**");
    let report = check_titles(dir.path(), &strict, TitleMode::Report).unwrap();
    assert_eq!(kinds_for(&report, "old-url.md"), vec![TitleIssueKind::MissingTitle]);
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = check_titles(&dir.path().join("nope"), &LintConfig::new(), TitleMode::Report)
        .unwrap_err();
    assert!(matches!(err, PostlintError::DirectoryNotFound(_)));
}

#[test]
fn test_seo_analysis() {
    let dir = content_tree();
    let report = analyze_seo(dir.path(), &LintConfig::new()).unwrap();

    assert_eq!(report.entries.len(), 6);
    assert_eq!(report.summary.documents, 6);
    assert_eq!(report.summary.without_front_matter, 1);
    assert_eq!(report.summary.complete, 1);
    assert_eq!(report.summary.missing_keywords, 5);
    assert_eq!(report.summary.total_keywords, 2);

    let valid = report
        .entries
        .iter()
        .find(|e| e.path.ends_with("valid.md"))
        .and_then(|e| e.presence)
        .unwrap();
    assert_eq!(valid.keyword_count, Some(2));
}

#[cfg(unix)]
#[test]
fn test_fix_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "private.md", COLON.as_bytes());
    let path = dir.path().join("private.md");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let report = check_titles(dir.path(), &LintConfig::new(), TitleMode::Fix).unwrap();
    assert_eq!(report.fixed_count(), 1);

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert!(fs::read_to_string(&path).unwrap().starts_with("---\ntitle: \"Hello: World\"\n"));
}

#[cfg(unix)]
#[test]
fn test_fix_through_symlink_rewrites_target() {
    let dir = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    write(outside.path(), "real.md", "---\ntitle: A: B\n---\n".as_bytes());
    std::os::unix::fs::symlink(outside.path().join("real.md"), dir.path().join("link.md")).unwrap();

    let config = LintConfig::new().follow_links(true);
    let report = check_titles(dir.path(), &config, TitleMode::Fix).unwrap();
    assert_eq!(report.fixed_count(), 1);
    assert!(report.is_clean());

    let link = dir.path().join("link.md");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_to_string(outside.path().join("real.md")).unwrap(),
        "---\ntitle: \"A: B\"\n---\n"
    );
}

#[cfg(unix)]
#[test]
fn test_walk_errors_are_failures() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.md", VALID.as_bytes());
    std::os::unix::fs::symlink(dir.path().join("missing.md"), dir.path().join("b.md")).unwrap();

    let config = LintConfig::new().follow_links(true);
    let report = check_titles(dir.path(), &config, TitleMode::Report).unwrap();
    assert_eq!(report.documents, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FileFailureKind::UnreadableFile);
    assert!(report.failures[0].path.ends_with("b.md"));
    assert!(!report.is_clean());

    let seo = analyze_seo(dir.path(), &config).unwrap();
    assert_eq!(seo.entries.len(), 1);
    assert_eq!(seo.failures.len(), 1);
}

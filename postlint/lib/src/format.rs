//! Text and JSON renderings of batch reports.
//!
//! Text lines follow `path[:line]: Kind: message`. Colour is applied only
//! when the caller asks for it.

use crate::batch::{SeoReport, TitleReport};
use crate::error::FileFailure;
use owo_colors::OwoColorize;
use std::fmt::Write;
use std::path::Path;

pub fn format_titles_json(report: &TitleReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn format_seo_json(report: &SeoReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn paint_kind(kind: &str, color: bool) -> String {
    if color {
        kind.red().bold().to_string()
    } else {
        kind.to_string()
    }
}

fn paint_path(path: &Path, color: bool) -> String {
    if color {
        path.display().bold().to_string()
    } else {
        path.display().to_string()
    }
}

fn write_failures(out: &mut String, failures: &[FileFailure], color: bool) {
    for failure in failures {
        let _ = writeln!(
            out,
            "{}: {}: {}",
            paint_path(&failure.path, color),
            paint_kind(failure.kind.as_str(), color),
            failure.message
        );
    }
}

/// Formats a title report, one line per finding followed by a summary.
///
/// ## Examples
///
/// ```
/// use postlint_lib::batch::{TitleEntry, TitleReport};
/// use postlint_lib::format::format_titles_text;
/// use postlint_lib::title::{validate_text, TitleRules};
///
/// let report = TitleReport {
///     root: "content".into(),
///     documents: 1,
///     entries: vec![TitleEntry {
///         path: "content/a.md".into(),
///         issues: validate_text("---\ndate: 2024\n---\n", &TitleRules::default()),
///         fixed: false,
///     }],
///     failures: vec![],
/// };
/// let text = format_titles_text(&report, false);
/// assert!(text.contains("content/a.md: MissingTitle: front matter has no title field"));
/// ```
pub fn format_titles_text(report: &TitleReport, color: bool) -> String {
    let mut out = String::new();

    for entry in &report.entries {
        for issue in &entry.issues {
            let location = match issue.line {
                Some(line) => format!("{}:{line}", paint_path(&entry.path, color)),
                None => paint_path(&entry.path, color),
            };
            let resolved = entry.fixed && !entry.unresolved().any(|i| i == issue);
            if resolved {
                let tag = if color { "fixed".green().to_string() } else { "fixed".to_string() };
                let _ = writeln!(out, "{location}: {}: {} [{tag}]", issue.kind, issue.message);
            } else {
                let _ = writeln!(
                    out,
                    "{location}: {}: {}",
                    paint_kind(issue.kind.as_str(), color),
                    issue.message
                );
            }
        }
    }

    write_failures(&mut out, &report.failures, color);

    let unresolved = report.unresolved_count();
    if report.is_clean() && report.fixed_count() == 0 {
        let _ = writeln!(out, "All {} documents have valid titles", report.documents);
    } else {
        let _ = writeln!(
            out,
            "Checked {} documents: {} unresolved issues, {} fixed, {} failures",
            report.documents,
            unresolved,
            report.fixed_count(),
            report.failures.len()
        );
    }

    out
}

/// Formats an SEO report: aggregate counters, then the documents missing a
/// description or keywords.
pub fn format_seo_text(report: &SeoReport, color: bool) -> String {
    let mut out = String::new();
    let s = &report.summary;

    let heading = "SEO metadata coverage";
    if color {
        let _ = writeln!(out, "{}", heading.bold());
    } else {
        let _ = writeln!(out, "{heading}");
    }
    let _ = writeln!(out, "  documents:            {}", s.documents);
    let _ = writeln!(out, "  without front matter: {}", s.without_front_matter);
    let _ = writeln!(out, "  missing title:        {}", s.missing_title);
    let _ = writeln!(out, "  missing description:  {}", s.missing_description);
    let _ = writeln!(out, "  missing keywords:     {}", s.missing_keywords);
    let _ = writeln!(out, "  complete:             {}", s.complete);
    let _ = writeln!(out, "  average keywords:     {:.1}", s.average_keywords);

    let missing_description: Vec<_> =
        report.entries.iter().filter(|e| e.missing_description()).collect();
    if !missing_description.is_empty() {
        let _ = writeln!(out, "\nMissing description:");
        for entry in missing_description {
            let _ = writeln!(out, "  - {}", paint_path(&entry.path, color));
        }
    }

    let missing_keywords: Vec<_> = report.entries.iter().filter(|e| e.missing_keywords()).collect();
    if !missing_keywords.is_empty() {
        let _ = writeln!(out, "\nMissing keywords:");
        for entry in missing_keywords {
            let _ = writeln!(out, "  - {}", paint_path(&entry.path, color));
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out);
        write_failures(&mut out, &report.failures, color);
    }

    out
}

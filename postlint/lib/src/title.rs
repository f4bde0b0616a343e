//! Title field validation and the unquoted-colon fixer.
//!
//! Every post needs a `title` in its frontmatter. An unquoted title holding a
//! colon (`title: Rust: A Primer`) is read as a nested mapping by stricter
//! YAML consumers downstream, so it is reported and can be fixed in place by
//! wrapping the value in double quotes.

use crate::document::Document;
use crate::frontmatter::{FieldValue, MetadataBlock};
use crate::quoting;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Key of the validated field.
pub const TITLE_KEY: &str = "title";

/// Kind of title finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleIssueKind {
    /// The document has no metadata block.
    MissingFrontMatter,
    /// The block has no `title` key.
    MissingTitle,
    /// `title` resolves to an empty string.
    EmptyTitle,
    /// `title` is unquoted and contains `:`.
    UnquotedColon,
    /// `title` opens a quote that is not closed by the same character.
    MismatchedQuotes,
}

impl TitleIssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFrontMatter => "MissingFrontMatter",
            Self::MissingTitle => "MissingTitle",
            Self::EmptyTitle => "EmptyTitle",
            Self::UnquotedColon => "UnquotedColon",
            Self::MismatchedQuotes => "MismatchedQuotes",
        }
    }
}

impl std::fmt::Display for TitleIssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single title finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleIssue {
    pub kind: TitleIssueKind,
    pub message: String,
    /// 1-based line of the `title` declaration, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl TitleIssue {
    fn new(kind: TitleIssueKind, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }
}

/// A `field: value` pair that exempts a document from title rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptField {
    pub field: String,
    pub value: String,
}

impl ExemptField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    fn matches(&self, block: &MetadataBlock) -> bool {
        block
            .value(&self.field)
            .and_then(FieldValue::unquoted)
            .is_some_and(|v| v.trim() == self.value)
    }
}

/// Rules applied by the title validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRules {
    pub exempt: Vec<ExemptField>,
}

impl Default for TitleRules {
    /// Redirect stubs (`layout: redirect`) carry no title.
    fn default() -> Self {
        Self {
            exempt: vec![ExemptField::new("layout", "redirect")],
        }
    }
}

impl TitleRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules with no exemptions at all.
    pub fn strict() -> Self {
        Self { exempt: Vec::new() }
    }

    /// Adds an exempt `field: value` pair.
    pub fn exempt(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.exempt.push(ExemptField::new(field, value));
        self
    }

    pub fn is_exempt(&self, block: &MetadataBlock) -> bool {
        self.exempt.iter().any(|e| e.matches(block))
    }
}

/// Validates the title of a parsed block. `None` means the document has no
/// metadata block.
pub fn validate_block(block: Option<&MetadataBlock>, rules: &TitleRules) -> Vec<TitleIssue> {
    let Some(block) = block else {
        return vec![TitleIssue::new(
            TitleIssueKind::MissingFrontMatter,
            "document does not start with a --- delimited front matter block",
            None,
        )];
    };

    if rules.is_exempt(block) {
        debug!("title rules exempted by front matter");
        return Vec::new();
    }

    let Some(field) = block.get(TITLE_KEY) else {
        return vec![TitleIssue::new(
            TitleIssueKind::MissingTitle,
            "front matter has no title field",
            None,
        )];
    };

    let line = Some(field.line + 1);
    match &field.value {
        FieldValue::List(_) => vec![TitleIssue::new(
            TitleIssueKind::EmptyTitle,
            "title must be a single string, found a list",
            line,
        )],
        FieldValue::Scalar(value) => check_scalar(value, line),
    }
}

/// Validates the title of a document.
pub fn validate(doc: &Document<'_>, rules: &TitleRules) -> Vec<TitleIssue> {
    validate_block(doc.parse_block().as_ref(), rules)
}

/// Validates the title of raw document text.
///
/// ## Examples
///
/// ```
/// use postlint_lib::title::{validate_text, TitleIssueKind, TitleRules};
///
/// let issues = validate_text("---\ntitle: Hello: World\n---\n", &TitleRules::default());
/// assert_eq!(issues[0].kind, TitleIssueKind::UnquotedColon);
/// ```
pub fn validate_text(text: &str, rules: &TitleRules) -> Vec<TitleIssue> {
    validate(&Document::new(text), rules)
}

fn check_scalar(value: &str, line: Option<usize>) -> Vec<TitleIssue> {
    let mut issues = Vec::new();

    if quoting::unquote(value).trim().is_empty() {
        issues.push(TitleIssue::new(TitleIssueKind::EmptyTitle, "title is empty", line));
    }

    if !quoting::is_quoted(value) && value.contains(':') {
        issues.push(TitleIssue::new(
            TitleIssueKind::UnquotedColon,
            format!("title contains ':' and must be quoted: {value}"),
            line,
        ));
    }

    if quoting::opens_quote(value) && !quoting::is_quoted(value) {
        issues.push(TitleIssue::new(
            TitleIssueKind::MismatchedQuotes,
            format!("title opens a quote that is not closed: {value}"),
            line,
        ));
    }

    issues
}

/// Builds the replacement document for a title with an unquoted colon.
///
/// Returns `None` when there is nothing to fix: no block, exempt document,
/// title already quoted or free of colons. Titles spanning several lines or
/// also carrying mismatched quotes are left for a human and also return
/// `None`. Only the title line changes; the returned text is otherwise
/// byte-identical to `text`. Applying the fix to its own output returns
/// `None`.
///
/// ## Examples
///
/// ```
/// use postlint_lib::title::{fix_unquoted_colon, TitleRules};
///
/// let rules = TitleRules::default();
/// let fixed = fix_unquoted_colon("---\ntitle: Hello: World\n---\nBody\n", &rules).unwrap();
/// assert_eq!(fixed, "---\ntitle: \"Hello: World\"\n---\nBody\n");
/// assert_eq!(fix_unquoted_colon(&fixed, &rules), None);
/// ```
pub fn fix_unquoted_colon(text: &str, rules: &TitleRules) -> Option<String> {
    let doc = Document::new(text);
    let block = doc.parse_block()?;
    if rules.is_exempt(&block) {
        return None;
    }

    let field = block.get(TITLE_KEY)?;
    let value = field.value.as_scalar()?;
    if field.span != 1 {
        debug!(line = field.line + 1, "multi-line title, not fixing");
        return None;
    }

    let issues = check_scalar(value, None);
    let has = |kind: TitleIssueKind| issues.iter().any(|i| i.kind == kind);
    if !has(TitleIssueKind::UnquotedColon) || has(TitleIssueKind::MismatchedQuotes) {
        return None;
    }

    let replacement = format!("{TITLE_KEY}: {}", quoting::double_quote(value));
    Some(doc.replace_line(field.line, &replacement))
}

//! Frontmatter parsing.
//!
//! Reads the line-based YAML subset used by the blog's posts:
//!
//! ```text
//! ---
//! title: "Hello: World"
//! description: A post
//!   that wraps onto a second line
//! keywords:
//!   - rust
//!   - yaml
//! ---
//! ```
//!
//! A `key: value` line at the start of a line declares a field. Dash lines
//! are list items of the current field when its value starts empty; any other
//! non-blank line continues the current scalar. The parser never fails:
//! unrecognised lines degrade to partial results.

use crate::document::Document;
use crate::quoting;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::trace;

static KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*):\s*(.*)$").unwrap());

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-\s*(.*)$").unwrap());

/// A field value: a single string or an ordered list of strings.
///
/// Values keep their raw quoting; use [`FieldValue::unquoted`] or
/// [`quoting::unquote`] to read the text inside the quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// The scalar text with one matching pair of quotes removed.
    pub fn unquoted(&self) -> Option<&str> {
        self.as_scalar().map(quoting::unquote)
    }

    /// Whether the value holds no content once quotes are stripped.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Scalar(s) => quoting::unquote(s).trim().is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

/// A single `key: value` entry of a metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
    /// 0-based document line holding the `key:` declaration.
    pub line: usize,
    /// Lines the field occupies, from the declaration to its last item or
    /// continuation line.
    pub span: usize,
}

/// Parsed metadata block: fields in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBlock {
    fields: Vec<Field>,
}

impl MetadataBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field. A key that already exists keeps its position and
    /// takes the new value and line (last write wins).
    pub fn insert(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => {
                trace!(key = %field.key, line = field.line, "key re-declared, replacing value");
                *existing = field;
            }
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.get(key).map(|f| &f.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parses the metadata block of `text`.
///
/// Returns `None` when the text has no block (first line is not `---`, or
/// the closing `---` is missing).
///
/// ## Examples
///
/// ```
/// use postlint_lib::frontmatter::{parse, FieldValue};
///
/// let block = parse("---\ntitle: Hello\ntags:\n  - a\n  - b\n---\nBody\n").unwrap();
/// assert_eq!(block.value("title"), Some(&FieldValue::Scalar("Hello".into())));
/// assert_eq!(block.value("tags").and_then(|v| v.as_list()).map(|l| l.len()), Some(2));
/// ```
pub fn parse(text: &str) -> Option<MetadataBlock> {
    Document::new(text).parse_block()
}

/// Field under construction while scanning the block.
struct Pending {
    key: String,
    line: usize,
    last_line: usize,
    initial: String,
    continuation: Vec<String>,
    items: Vec<String>,
    is_list: bool,
}

impl Pending {
    fn new(key: &str, initial: &str, line: usize) -> Self {
        Self {
            key: key.to_string(),
            line,
            last_line: line,
            initial: initial.trim().to_string(),
            continuation: Vec::new(),
            items: Vec::new(),
            is_list: false,
        }
    }

    fn push_item(&mut self, item: &str, line: usize) {
        if !self.is_list && self.initial.is_empty() && self.continuation.is_empty() {
            self.is_list = true;
        }

        if self.is_list {
            self.items.push(item.trim().to_string());
        } else {
            // A dash line under a non-empty scalar is ordinary text.
            self.continuation.push(format!("- {}", item.trim()));
        }
        self.last_line = line;
    }

    fn push_continuation(&mut self, text: &str, line: usize) {
        if self.is_list {
            trace!(key = %self.key, line, "ignoring non-item line inside list field");
            return;
        }
        self.continuation.push(text.trim().to_string());
        self.last_line = line;
    }

    fn finish(self) -> Field {
        let value = if self.is_list {
            FieldValue::List(self.items)
        } else {
            let parts: Vec<String> = std::iter::once(self.initial)
                .chain(self.continuation)
                .filter(|p| !p.is_empty())
                .collect();
            FieldValue::Scalar(parts.join("\n").trim().to_string())
        };

        Field {
            key: self.key,
            value,
            line: self.line,
            span: self.last_line - self.line + 1,
        }
    }
}

/// Parses lines `start..end` of `doc` as block content.
pub(crate) fn parse_range(doc: &Document<'_>, start: usize, end: usize) -> MetadataBlock {
    let mut block = MetadataBlock::new();
    let mut current: Option<Pending> = None;

    for idx in start..end {
        let Some(line) = doc.line(idx) else { break };
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(caps) = KEY_LINE.captures(line) {
            if let Some(done) = current.take() {
                block.insert(done.finish());
            }
            current = Some(Pending::new(&caps[1], &caps[2], idx));
            continue;
        }

        let Some(pending) = current.as_mut() else {
            trace!(line = idx, "ignoring line before first key");
            continue;
        };

        match LIST_ITEM.captures(line) {
            Some(caps) => pending.push_item(&caps[1], idx),
            None => pending.push_continuation(line, idx),
        }
    }

    if let Some(done) = current.take() {
        block.insert(done.finish());
    }

    block
}

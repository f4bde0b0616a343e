//! SEO field presence and quality metrics.
//!
//! Checks whether each post carries the `title`, `description` and
//! `keywords` fields used for page metadata, and aggregates the results over
//! a content tree.

use crate::frontmatter::{FieldValue, MetadataBlock};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DESCRIPTION_KEY: &str = "description";
pub const KEYWORDS_KEY: &str = "keywords";

/// Presence of the SEO fields in one metadata block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPresence {
    pub has_title: bool,
    pub has_description: bool,
    pub has_keywords: bool,
    /// 1 for a scalar `keywords`, the item count for a list. `None` when
    /// keywords are absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_count: Option<usize>,
}

impl FieldPresence {
    /// A field counts as present when its key exists and its value is not
    /// blank.
    ///
    /// ## Examples
    ///
    /// ```
    /// use postlint_lib::frontmatter::parse;
    /// use postlint_lib::seo::FieldPresence;
    ///
    /// let block = parse("---\ntitle: T\nkeywords:\n  - a\n  - b\n---\n").unwrap();
    /// let presence = FieldPresence::from_block(&block);
    /// assert!(presence.has_title);
    /// assert!(!presence.has_description);
    /// assert_eq!(presence.keyword_count, Some(2));
    /// ```
    pub fn from_block(block: &MetadataBlock) -> Self {
        let present = |key: &str| block.value(key).is_some_and(|v| !v.is_blank());

        let has_keywords = present(KEYWORDS_KEY);
        let keyword_count = if has_keywords {
            block.value(KEYWORDS_KEY).map(|v| match v {
                FieldValue::Scalar(_) => 1,
                FieldValue::List(items) => items.len(),
            })
        } else {
            None
        };

        Self {
            has_title: present(crate::title::TITLE_KEY),
            has_description: present(DESCRIPTION_KEY),
            has_keywords,
            keyword_count,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.has_title && self.has_description && self.has_keywords
    }
}

/// Per-document SEO result. `presence` is `None` for a document without a
/// metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoEntry {
    pub path: PathBuf,
    pub presence: Option<FieldPresence>,
}

impl SeoEntry {
    pub fn missing_description(&self) -> bool {
        !self.presence.is_some_and(|p| p.has_description)
    }

    pub fn missing_keywords(&self) -> bool {
        !self.presence.is_some_and(|p| p.has_keywords)
    }
}

/// Aggregate counters over a set of documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSummary {
    pub documents: usize,
    pub without_front_matter: usize,
    pub missing_title: usize,
    pub missing_description: usize,
    pub missing_keywords: usize,
    pub complete: usize,
    pub total_keywords: usize,
    /// Mean keyword count over documents that have keywords.
    pub average_keywords: f64,
}

impl SeoSummary {
    pub fn record(&mut self, presence: Option<&FieldPresence>) {
        self.documents += 1;

        let Some(p) = presence else {
            self.without_front_matter += 1;
            self.missing_title += 1;
            self.missing_description += 1;
            self.missing_keywords += 1;
            return;
        };

        if !p.has_title {
            self.missing_title += 1;
        }
        if !p.has_description {
            self.missing_description += 1;
        }
        if !p.has_keywords {
            self.missing_keywords += 1;
        }
        if p.is_complete() {
            self.complete += 1;
        }
        self.total_keywords += p.keyword_count.unwrap_or(0);

        let with_keywords = self.documents - self.missing_keywords;
        self.average_keywords = if with_keywords == 0 {
            0.0
        } else {
            self.total_keywords as f64 / with_keywords as f64
        };
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a SeoEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.record(entry.presence.as_ref());
        }
        summary
    }
}

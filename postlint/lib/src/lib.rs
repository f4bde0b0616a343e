//! Frontmatter tooling for a Markdown content tree.
//!
//! One parser for the `---` delimited metadata block at the top of each post,
//! a title validator with an idempotent fixer, and an SEO field reporter,
//! plus fail-soft batch drivers that walk a directory of documents.
//!
//! ## Examples
//!
//! ```
//! use postlint_lib::{TitleIssueKind, TitleRules, fix_unquoted_colon, validate_text};
//!
//! let text = "---\ntitle: Hello: World\n---\nBody\n";
//! let rules = TitleRules::default();
//!
//! let issues = validate_text(text, &rules);
//! assert_eq!(issues[0].kind, TitleIssueKind::UnquotedColon);
//!
//! let fixed = fix_unquoted_colon(text, &rules).unwrap();
//! assert!(validate_text(&fixed, &rules).is_empty());
//! ```

pub mod batch;
pub mod config;
pub mod discovery;
pub mod document;
pub mod error;
pub mod format;
pub mod frontmatter;
pub mod quoting;
pub mod seo;
pub mod title;

pub use batch::{SeoReport, TitleEntry, TitleMode, TitleReport, analyze_seo, check_titles};
pub use config::LintConfig;
pub use document::Document;
pub use error::{FileFailure, FileFailureKind, PostlintError, Result};
pub use frontmatter::{Field, FieldValue, MetadataBlock};
pub use seo::{FieldPresence, SeoSummary};
pub use title::{TitleIssue, TitleIssueKind, TitleRules, fix_unquoted_colon, validate_text};

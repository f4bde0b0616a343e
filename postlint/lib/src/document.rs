//! Line-oriented view of a Markdown document.
//!
//! A [`Document`] keeps every line together with its terminator (`\n` or
//! `\r\n`) so that a rewrite touching a single line reproduces every other
//! byte of the source exactly.

use crate::frontmatter::{self, MetadataBlock};

/// The delimiter line opening and closing a metadata block.
pub const BOUNDARY_MARKER: &str = "---";

/// A text document split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Document<'a> {
    /// Splits `text` into lines, keeping terminators.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.split_inclusive('\n').collect(),
        }
    }

    /// Number of lines in the document.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line at `idx` without its terminator.
    pub fn line(&self, idx: usize) -> Option<&'a str> {
        self.lines.get(idx).map(|raw| split_terminator(raw).0)
    }

    /// Iterates over lines without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().map(|raw| split_terminator(raw).0)
    }

    /// Line indices `(open, close)` of the metadata block markers.
    ///
    /// The opening marker must be line 0. Returns `None` when the document
    /// does not open with a marker or the closing marker is missing.
    pub fn block_range(&self) -> Option<(usize, usize)> {
        if self.line(0)?.trim() != BOUNDARY_MARKER {
            return None;
        }

        let close = self
            .lines()
            .skip(1)
            .position(|line| line.trim() == BOUNDARY_MARKER)?
            + 1;

        Some((0, close))
    }

    /// Parses the metadata block, if any.
    pub fn parse_block(&self) -> Option<MetadataBlock> {
        let (open, close) = self.block_range()?;
        Some(frontmatter::parse_range(self, open + 1, close))
    }

    /// Builds a full replacement document with line `idx` swapped for
    /// `content`. The original terminator of that line is kept and every
    /// other line is copied unchanged.
    pub fn replace_line(&self, idx: usize, content: &str) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len()).sum::<usize>() + 8);
        for (i, raw) in self.lines.iter().enumerate() {
            if i == idx {
                out.push_str(content);
                out.push_str(split_terminator(raw).1);
            } else {
                out.push_str(raw);
            }
        }
        out
    }
}

/// Splits a raw line into `(content, terminator)`.
fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(content) = raw.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = raw.strip_suffix('\n') {
        (content, "\n")
    } else {
        (raw, "")
    }
}

//! Metadata extraction from scroll sources.
//!
//! A scroll is a LaTeX fragment whose final block of `%` comments holds its
//! metadata:
//!
//! ```text
//! \LaTeX\ code ...
//!
//! % @source Author: Title
//! % @source Lemma 3.2, p. 41
//! % @type proposition, definition
//! % counter-example, analysis, topology
//! ```
//!
//! Only the last contiguous run of comment lines counts. Lines starting
//! with a known directive are routed to the matching field, unknown
//! directives are kept verbatim, and anything else is a comma-separated
//! tag list.

use crate::scroll::{Scroll, ScrollId};

/// Character that starts a comment line.
pub const COMMENT_MARKER: char = '%';

/// A classified metadata line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `@hidden a, b`
    Hidden(Vec<String>),
    /// `@source Author: Title`
    Source(&'a str),
    /// `@type first, ...`: only the first entry is carried.
    Type(&'a str),
    /// Any other `@...` line, prefix included.
    Other(&'a str),
    /// A plain comma-separated tag list.
    Tags(Vec<String>),
}

impl<'a> Directive<'a> {
    pub fn classify(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix("@hidden ") {
            Directive::Hidden(parse_tags(rest))
        } else if let Some(rest) = line.strip_prefix("@source ") {
            Directive::Source(rest.trim())
        } else if let Some(rest) = line.strip_prefix("@type ") {
            let first = rest.trim().split(',').next().unwrap_or("").trim();
            Directive::Type(first)
        } else if line.starts_with('@') {
            Directive::Other(line)
        } else {
            Directive::Tags(parse_tags(line))
        }
    }
}

/// Return the lines of the last comment block, with the leading markers
/// and surrounding whitespace removed.
pub fn find_metadata_lines(doc: &str) -> Vec<&str> {
    let mut metadata = Vec::new();
    for line in doc.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // A line of ordinary text means the block seen so far was not the
        // last one.
        if !trimmed.starts_with(COMMENT_MARKER) {
            metadata.clear();
            continue;
        }

        let stripped = trimmed.trim_start_matches(|c: char| {
            c == COMMENT_MARKER || c.is_whitespace()
        });
        if !stripped.is_empty() {
            metadata.push(stripped);
        }
    }
    metadata
}

/// Split a comma-separated tag list. Case is preserved.
pub fn parse_tags(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a scroll's source text into a [`Scroll`].
pub fn parse(id: impl Into<ScrollId>, doc: &str) -> Scroll {
    let mut scroll = Scroll {
        id: id.into(),
        ..Scroll::default()
    };

    for line in find_metadata_lines(doc) {
        match Directive::classify(line) {
            Directive::Hidden(tags) => scroll.hidden.extend(tags),
            Directive::Source(source) => {
                scroll.source_lines.push(source.to_string())
            }
            Directive::Type(first) => {
                // Later entries and later @type lines are dropped.
                if scroll.scroll_type.is_empty() {
                    scroll.scroll_type = first.to_string();
                }
            }
            Directive::Other(line) => scroll.other_lines.push(line.to_string()),
            Directive::Tags(tags) => scroll.tags.extend(tags),
        }
    }

    scroll.content = strip_comments(doc);
    scroll
}

/// Remove every paragraph that starts with a comment line.
///
/// Works on blank-line separated paragraphs: a paragraph mixing text and
/// comments is kept or dropped as a whole depending on its first line.
pub fn strip_comments(doc: &str) -> String {
    let mut content = String::new();
    for paragraph in doc.split("\n\n") {
        let trimmed = paragraph.trim();
        if trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }
        content.push_str(trimmed);
        content.push_str("\n\n");
    }
    content.trim().to_string()
}

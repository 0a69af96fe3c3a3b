use serde::Serialize;

/// Identifier of a scroll: its file name without the extension.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct ScrollId(String);

impl ScrollId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScrollId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScrollId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One indexed document: free-text content plus the metadata parsed from
/// its trailing comment block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scroll {
    pub id: ScrollId,
    /// Body with every metadata paragraph removed.
    pub content: String,
    /// Primary classification, empty when no `@type` line is present.
    #[serde(rename = "type")]
    pub scroll_type: String,
    pub tags: Vec<String>,
    /// `@source` citations, in document order.
    pub source_lines: Vec<String>,
    /// Tags that are searchable but not shown by default.
    pub hidden: Vec<String>,
    /// Unrecognized `@` directives, prefix included.
    pub other_lines: Vec<String>,
}

impl Scroll {
    /// True when the scroll carries no metadata at all.
    pub fn has_no_metadata(&self) -> bool {
        self.scroll_type.is_empty()
            && self.tags.is_empty()
            && self.source_lines.is_empty()
            && self.hidden.is_empty()
            && self.other_lines.is_empty()
    }
}

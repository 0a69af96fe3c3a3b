use std::collections::BTreeMap;

use crate::scroll::{Scroll, ScrollId};

/// Scrolls staged for a single atomic commit.
///
/// Staging the same id twice keeps only the latest record. Nothing reaches
/// the index until [`crate::SearchIndex::commit_batch`] is called.
#[derive(Debug, Default)]
pub struct ScrollBatch {
    staged: BTreeMap<ScrollId, Scroll>,
}

impl ScrollBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an insert-or-replace for `scroll.id`.
    pub fn stage(&mut self, scroll: Scroll) {
        self.staged.insert(scroll.id.clone(), scroll);
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    #[cfg(test)]
    fn contains(&self, id: &ScrollId) -> bool {
        self.staged.contains_key(id)
    }

    pub(crate) fn into_scrolls(self) -> impl Iterator<Item = Scroll> {
        self.staged.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn restaging_replaces() {
        let mut batch = ScrollBatch::new();
        batch.stage(parse("a", "old"));
        batch.stage(parse("b", "other"));
        batch.stage(parse("a", "new"));

        assert_eq!(batch.len(), 2);
        assert!(batch.contains(&ScrollId::new("a")));

        let contents: Vec<_> =
            batch.into_scrolls().map(|s| s.content).collect();
        assert_eq!(contents, vec!["new", "other"]);
    }

    #[test]
    fn empty_batch() {
        let batch = ScrollBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.into_scrolls().count(), 0);
    }
}

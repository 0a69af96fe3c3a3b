use std::path::Path;

use serde::Serialize;

use crate::{error::Result, store::ScrollStore, tantivy_index::SearchIndex};

/// Size of the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Scrolls in the index.
    pub documents: u64,
    /// Bytes on disk below the knowledge directory.
    pub total_size: u64,
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The library contains {} scrolls with a total size of {:.1} kiB.",
            self.documents,
            self.total_size as f64 / 1024.0
        )
    }
}

/// Count indexed scrolls and measure the knowledge directory.
///
/// Both the index and the directory must exist.
pub fn compute_statistics(
    index_dir: &Path,
    store: &ScrollStore,
) -> Result<Statistics> {
    let index = SearchIndex::open_existing(index_dir)?;
    let total_size = store.total_size()?;
    let documents = index.doc_count()?;

    Ok(Statistics {
        documents,
        total_size,
    })
}

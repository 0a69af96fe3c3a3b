use crate::{
    config::Config,
    error::Result,
    incremental::{self, UpdateReport},
    parser,
    scroll::{Scroll, ScrollId},
    search,
    stats::{self, Statistics},
    store::ScrollStore,
    tantivy_index::{SearchIndex, SearchResults},
    watermark::Watermark,
};

/// Entry point tying the store, the index and the watermark together.
///
/// Every operation opens the index itself and drops it before returning, so
/// no index handle outlives a call.
#[derive(Debug, Clone)]
pub struct Library {
    config: Config,
    store: ScrollStore,
    watermark: Watermark,
}

impl Library {
    pub fn new(config: Config) -> Self {
        let store =
            ScrollStore::new(config.knowledge_dir(), config.extension.clone());
        let watermark = Watermark::new(config.marker_file());
        Self {
            config,
            store,
            watermark,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ScrollStore {
        &self.store
    }

    /// Index every scroll changed since the last pass.
    pub fn update_index(&self) -> Result<UpdateReport> {
        incremental::update_index(
            &self.config.index_dir(),
            &self.store,
            &self.watermark,
        )
    }

    /// Drop one scroll from the index.
    ///
    /// Update passes never notice deleted files, so this has to be called
    /// for each scroll removed from the knowledge directory.
    pub fn remove_from_index(&self, id: &ScrollId) -> Result<()> {
        let index = SearchIndex::open_existing(&self.config.index_dir())?;
        index.delete(id)?;
        tracing::info!(%id, "removed scroll from index");
        Ok(())
    }

    /// Search with the user query syntax, capped at `max_results` hits.
    pub fn search(&self, raw_query: &str) -> Result<SearchResults> {
        search::find_scrolls(
            &self.config.index_dir(),
            raw_query,
            self.config.max_results,
        )
    }

    pub fn statistics(&self) -> Result<Statistics> {
        stats::compute_statistics(&self.config.index_dir(), &self.store)
    }

    /// Read and parse one scroll straight from the knowledge directory.
    pub fn load_scroll(&self, id: &ScrollId) -> Result<Scroll> {
        let text = self.store.read(id)?;
        Ok(parser::parse(id.clone(), &text))
    }
}

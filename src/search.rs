use std::path::Path;

use crate::{
    error::Result,
    query::translate_query,
    tantivy_index::{SearchIndex, SearchResults},
};

/// Translate a user query and run it against the index in `index_dir`.
///
/// The index is opened for this one query and released afterwards.
pub fn find_scrolls(
    index_dir: &Path,
    raw_query: &str,
    limit: usize,
) -> Result<SearchResults> {
    let translated = translate_query(raw_query);
    tracing::debug!(raw = raw_query, translated = %translated, "searching");

    let index = SearchIndex::open_existing(index_dir)?;
    index.search(&translated, limit)
}

/// Format results for human-readable terminal output.
pub fn render_human(results: &SearchResults) -> String {
    if results.hits.is_empty() {
        return "No results found.\n".to_string();
    }

    let mut out = String::new();
    for hit in &results.hits {
        out.push_str(&format!(
            "{:>3}. [{:.3}] {}",
            hit.rank, hit.score, hit.id
        ));
        if !hit.scroll_type.is_empty() {
            out.push_str(&format!(" ({})", hit.scroll_type));
        }
        out.push('\n');
        if !hit.tags.is_empty() {
            out.push_str(&format!("     {}\n", hit.tags.join(", ")));
        }
    }
    out.push_str(&format!(
        "\nShowing {} of {} result(s)\n",
        results.hits.len(),
        results.total
    ));
    out
}

/// Format results as a JSON object carrying the query.
pub fn render_json(results: &SearchResults, query: &str) -> Result<String> {
    Ok(serde_json::to_string(&serde_json::json!({
        "query": query,
        "total": results.total,
        "results": results.hits,
    }))?)
}

use std::path::Path;

use serde::Serialize;
use tantivy::{
    Index,
    IndexReader,
    IndexWriter,
    TantivyDocument,
    TantivyError,
    Term,
    collector::{Count, TopDocs},
    directory::MmapDirectory,
    query::QueryParser,
    schema::*,
    tokenizer::{
        LowerCaser,
        RemoveLongFilter,
        SimpleTokenizer,
        Stemmer,
        TextAnalyzer,
    },
};

use crate::{
    batch::ScrollBatch,
    error::{Error, Result},
    scroll::{Scroll, ScrollId},
};

/// Field names used in the schema.
pub mod fields {
    /// Exact identifier, the key for upserts and deletes.
    pub const ID: &str = "id";
    /// Tokenized copy of the identifier for searching.
    pub const ID_TEXT: &str = "id_text";
    pub const CONTENT: &str = "content";
    pub const TYPE: &str = "type";
    pub const SOURCE: &str = "source";
    pub const TAG: &str = "tag";
    pub const HIDDEN: &str = "hidden";
    pub const OTHER: &str = "other";
}

/// Memory budget handed to every index writer.
pub const WRITER_MEMORY_BUDGET: usize = 15_000_000;

const EN_ANALYZER: &str = "scroll_en";
const ID_ANALYZER: &str = "scroll_id";
const KEYWORD_ANALYZER: &str = "raw";

/// A tantivy full-text index of scrolls.
///
/// The handle owns the index and its reader; dropping it releases both.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    fields: SchemaFields,
}

/// Resolved field handles for the schema.
#[derive(Clone, Copy)]
pub struct SchemaFields {
    pub id: Field,
    pub id_text: Field,
    pub content: Field,
    pub scroll_type: Field,
    pub source: Field,
    pub tag: Field,
    pub hidden: Field,
    pub other: Field,
}

impl SchemaFields {
    fn resolve(schema: &Schema) -> Result<Self> {
        Ok(Self {
            id: schema.get_field(fields::ID)?,
            id_text: schema.get_field(fields::ID_TEXT)?,
            content: schema.get_field(fields::CONTENT)?,
            scroll_type: schema.get_field(fields::TYPE)?,
            source: schema.get_field(fields::SOURCE)?,
            tag: schema.get_field(fields::TAG)?,
            hidden: schema.get_field(fields::HIDDEN)?,
            other: schema.get_field(fields::OTHER)?,
        })
    }

    /// Fields searched when a query term names no field.
    fn searchable(&self) -> Vec<Field> {
        vec![
            self.id_text,
            self.content,
            self.scroll_type,
            self.source,
            self.tag,
            self.hidden,
            self.other,
        ]
    }
}

/// One ranked match.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub score: f32,
    pub id: ScrollId,
    #[serde(rename = "type")]
    pub scroll_type: String,
    pub tags: Vec<String>,
}

/// A page of ranked matches plus the number of all matches.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

fn text_options(tokenizer: &str, record: IndexRecordOption) -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(tokenizer)
            .set_index_option(record),
    )
}

fn build_schema() -> Schema {
    let mut builder = Schema::builder();
    let positions = IndexRecordOption::WithFreqsAndPositions;

    builder.add_text_field(fields::ID, STRING | STORED);
    builder.add_text_field(fields::ID_TEXT, text_options(ID_ANALYZER, positions));
    builder.add_text_field(fields::CONTENT, text_options(EN_ANALYZER, positions));
    // Keyword analysis: the type is matched as a whole, never split or
    // stemmed.
    builder.add_text_field(
        fields::TYPE,
        text_options(KEYWORD_ANALYZER, IndexRecordOption::Basic).set_stored(),
    );
    builder.add_text_field(fields::SOURCE, text_options(EN_ANALYZER, positions));
    builder.add_text_field(
        fields::TAG,
        text_options(EN_ANALYZER, positions).set_stored(),
    );
    builder.add_text_field(fields::HIDDEN, text_options(EN_ANALYZER, positions));
    builder.add_text_field(fields::OTHER, text_options(EN_ANALYZER, positions));

    builder.build()
}

fn register_tokenizers(index: &Index) {
    let english = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser)
        .filter(Stemmer::new(tantivy::tokenizer::Language::English))
        .build();
    let identifier = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(EN_ANALYZER, english);
    index.tokenizers().register(ID_ANALYZER, identifier);
}

impl SearchIndex {
    /// Open the index stored in `dir`. Fails if there is none.
    pub fn open_existing(dir: &Path) -> Result<Self> {
        let mmap_dir = MmapDirectory::open(dir)?;
        if !Index::exists(&mmap_dir).map_err(TantivyError::from)? {
            return Err(Error::NotFound {
                kind: "index",
                name: dir.display().to_string(),
            });
        }
        Self::from_index(Index::open(mmap_dir)?)
    }

    /// Create a fresh, empty index in `dir`.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let mmap_dir = MmapDirectory::open(dir)?;
        let index = Index::create(
            mmap_dir,
            build_schema(),
            tantivy::IndexSettings::default(),
        )?;
        Self::from_index(index)
    }

    /// Open the index in `dir`, creating it when opening fails.
    ///
    /// The flag is `true` when a new index was created.
    pub fn open_or_create(dir: &Path) -> Result<(Self, bool)> {
        match Self::open_existing(dir) {
            Ok(index) => Ok((index, false)),
            Err(e) => {
                tracing::debug!(
                    dir = %dir.display(),
                    error = %e,
                    "no usable index, creating a new one"
                );
                Ok((Self::create(dir)?, true))
            }
        }
    }

    /// Create an in-memory search index (for testing).
    pub fn open_in_ram() -> Result<Self> {
        Self::from_index(Index::create_in_ram(build_schema()))
    }

    fn from_index(index: Index) -> Result<Self> {
        register_tokenizers(&index);
        let fields = SchemaFields::resolve(&index.schema())?;
        let reader = index.reader()?;

        Ok(Self {
            index,
            reader,
            fields,
        })
    }

    /// Get the resolved field handles.
    pub fn fields(&self) -> SchemaFields {
        self.fields
    }

    /// Apply every staged scroll in one commit, replacing records with the
    /// same id. Returns the number of scrolls written.
    ///
    /// If any document fails to be added the writer is dropped without
    /// committing, so the index is left untouched.
    pub fn commit_batch(&self, batch: ScrollBatch) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let count = batch.len();
        let mut writer: IndexWriter = self.index.writer(WRITER_MEMORY_BUDGET)?;
        for scroll in batch.into_scrolls() {
            writer.delete_term(Term::from_field_text(
                self.fields.id,
                scroll.id.as_str(),
            ));
            writer.add_document(self.to_document(&scroll))?;
        }
        writer.commit()?;
        self.reader.reload()?;

        Ok(count)
    }

    /// Delete the record for `id`, if any, and commit.
    pub fn delete(&self, id: &ScrollId) -> Result<()> {
        let mut writer: IndexWriter = self.index.writer(WRITER_MEMORY_BUDGET)?;
        writer.delete_term(Term::from_field_text(self.fields.id, id.as_str()));
        writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    /// Number of live documents in the index.
    pub fn doc_count(&self) -> Result<u64> {
        self.reader.reload()?;
        Ok(self.reader.searcher().num_docs())
    }

    /// Run a query in tantivy's query-parser syntax over all text fields.
    ///
    /// At most `limit` hits are returned, best first; `total` counts every
    /// match.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<SearchResults> {
        self.reader.reload()?;
        let searcher = self.reader.searcher();
        let f = self.fields;

        let parser = QueryParser::for_index(&self.index, f.searchable());
        let query = parser.parse_query(query_str)?;

        if limit == 0 {
            let total = searcher.search(&query, &Count)?;
            return Ok(SearchResults {
                total,
                hits: Vec::new(),
            });
        }

        let (top_docs, total) =
            searcher.search(&query, &(TopDocs::with_limit(limit), Count))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (i, (score, doc_address)) in top_docs.into_iter().enumerate() {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            hits.push(SearchHit {
                rank: i + 1,
                score,
                id: ScrollId::new(extract_text(&doc, f.id)),
                scroll_type: extract_text(&doc, f.scroll_type),
                tags: extract_all(&doc, f.tag),
            });
        }

        Ok(SearchResults { total, hits })
    }

    fn to_document(&self, scroll: &Scroll) -> TantivyDocument {
        let f = self.fields;
        let mut doc = TantivyDocument::default();

        doc.add_text(f.id, scroll.id.as_str());
        doc.add_text(f.id_text, scroll.id.as_str());
        doc.add_text(f.content, &scroll.content);
        if !scroll.scroll_type.is_empty() {
            doc.add_text(f.scroll_type, &scroll.scroll_type);
        }
        for source in &scroll.source_lines {
            doc.add_text(f.source, source);
        }
        for tag in &scroll.tags {
            doc.add_text(f.tag, tag);
        }
        for tag in &scroll.hidden {
            doc.add_text(f.hidden, tag);
        }
        for line in &scroll.other_lines {
            doc.add_text(f.other, line);
        }

        doc
    }
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex").finish_non_exhaustive()
    }
}

fn extract_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn extract_all(doc: &TantivyDocument, field: Field) -> Vec<String> {
    doc.get_all(field)
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn index_with(docs: &[(&str, &str)]) -> SearchIndex {
        let idx = SearchIndex::open_in_ram().unwrap();
        let mut batch = ScrollBatch::new();
        for (id, text) in docs {
            batch.stage(parse(*id, text));
        }
        idx.commit_batch(batch).unwrap();
        idx
    }

    fn ids(results: &SearchResults) -> Vec<&str> {
        results.hits.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn commit_and_search() {
        let idx = index_with(&[
            ("evt", "Continuous functions attain a maximum.\n\n% @type theorem\n% analysis"),
            ("gcd", "Euclid's algorithm computes the gcd.\n\n% @type algorithm\n% number theory"),
        ]);

        assert_eq!(idx.doc_count().unwrap(), 2);

        let results = idx.search("+maximum", 10).unwrap();
        assert_eq!(ids(&results), vec!["evt"]);
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].rank, 1);
        assert_eq!(results.hits[0].scroll_type, "theorem");
        assert_eq!(results.hits[0].tags, vec!["analysis"]);
    }

    #[test]
    fn stemming_on_content() {
        let idx = index_with(&[("a", "the functions were continuous")]);
        assert_eq!(ids(&idx.search("+function", 10).unwrap()), vec!["a"]);
    }

    #[test]
    fn type_is_matched_as_a_keyword() {
        let idx = index_with(&[
            ("a", "body\n\n% @type counter-example"),
            ("b", "body\n\n% @type example"),
        ]);

        let results = idx.search("type:counter-example", 10).unwrap();
        assert_eq!(ids(&results), vec!["a"]);

        // Not split on the hyphen.
        let results = idx.search("type:example", 10).unwrap();
        assert_eq!(ids(&results), vec!["b"]);
    }

    #[test]
    fn metadata_fields_are_searchable() {
        let idx = index_with(&[
            ("a", "body\n\n% @source Rudin: Analysis"),
            ("b", "body\n\n% @hidden secret"),
            ("c", "body\n\n% @proof compactness"),
            ("d", "body\n\n% topology"),
        ]);

        assert_eq!(ids(&idx.search("+rudin", 10).unwrap()), vec!["a"]);
        assert_eq!(ids(&idx.search("+secret", 10).unwrap()), vec!["b"]);
        assert_eq!(ids(&idx.search("+compactness", 10).unwrap()), vec!["c"]);
        assert_eq!(ids(&idx.search("+topology", 10).unwrap()), vec!["d"]);
    }

    #[test]
    fn identifier_is_searchable_by_word() {
        let idx = index_with(&[("Bolzano-Weierstrass", "body")]);
        assert_eq!(
            ids(&idx.search("+weierstrass", 10).unwrap()),
            vec!["Bolzano-Weierstrass"]
        );
    }

    #[test]
    fn required_and_excluded_terms() {
        let idx = index_with(&[
            ("a", "compact metric space"),
            ("b", "compact topological space"),
            ("c", "metric space"),
        ]);

        let results = idx.search("+compact +space", 10).unwrap();
        let mut found = ids(&results);
        found.sort();
        assert_eq!(found, vec!["a", "b"]);

        let results = idx.search("+compact -metric", 10).unwrap();
        assert_eq!(ids(&results), vec!["b"]);
    }

    #[test]
    fn total_counts_beyond_the_page() {
        let idx = index_with(&[
            ("a", "lemma one"),
            ("b", "lemma two"),
            ("c", "lemma three"),
        ]);

        let results = idx.search("+lemma", 2).unwrap();
        assert_eq!(results.hits.len(), 2);
        assert_eq!(results.total, 3);

        let results = idx.search("+lemma", 0).unwrap();
        assert!(results.hits.is_empty());
        assert_eq!(results.total, 3);
    }

    #[test]
    fn recommit_replaces_record() {
        let idx = index_with(&[("a", "old wording")]);

        let mut batch = ScrollBatch::new();
        batch.stage(parse("a", "new wording"));
        idx.commit_batch(batch).unwrap();

        assert_eq!(idx.doc_count().unwrap(), 1);
        assert!(idx.search("+old", 10).unwrap().hits.is_empty());
        assert_eq!(ids(&idx.search("+new", 10).unwrap()), vec!["a"]);
    }

    #[test]
    fn delete_removes_record() {
        let idx = index_with(&[("a", "hello"), ("b", "hello")]);

        idx.delete(&ScrollId::new("a")).unwrap();

        assert_eq!(idx.doc_count().unwrap(), 1);
        assert_eq!(ids(&idx.search("+hello", 10).unwrap()), vec!["b"]);

        // Deleting an unknown id is not an error.
        idx.delete(&ScrollId::new("missing")).unwrap();
        assert_eq!(idx.doc_count().unwrap(), 1);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let idx = SearchIndex::open_in_ram().unwrap();
        assert_eq!(idx.commit_batch(ScrollBatch::new()).unwrap(), 0);
        assert_eq!(idx.doc_count().unwrap(), 0);
    }

    #[test]
    fn invalid_query_is_an_error() {
        let idx = index_with(&[("a", "text")]);
        assert!(matches!(
            idx.search("nosuchfield:x", 10),
            Err(Error::Query(_))
        ));
    }

    #[test]
    fn open_existing_requires_an_index() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            SearchIndex::open_existing(tmp.path()),
            Err(Error::NotFound { kind: "index", .. })
        ));
        assert!(SearchIndex::open_existing(&tmp.path().join("absent")).is_err());
    }

    #[test]
    fn open_or_create_reports_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("index");

        {
            let (idx, created) = SearchIndex::open_or_create(&dir).unwrap();
            assert!(created);
            let mut batch = ScrollBatch::new();
            batch.stage(parse("a", "persistent data"));
            idx.commit_batch(batch).unwrap();
        }

        {
            let (idx, created) = SearchIndex::open_or_create(&dir).unwrap();
            assert!(!created);
            assert_eq!(ids(&idx.search("+persistent", 10).unwrap()), vec!["a"]);
        }
    }
}

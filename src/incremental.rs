use std::{path::Path, time::SystemTime};

use serde::Serialize;

use crate::{
    batch::ScrollBatch,
    error::Result,
    parser,
    store::{ScrollFile, ScrollStore},
    tantivy_index::SearchIndex,
    watermark::Watermark,
};

/// Outcome of one update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    /// The index did not exist before this pass.
    pub created: bool,
    /// Scrolls parsed and written to the index.
    pub processed: usize,
    /// Scrolls left alone because they are older than the watermark.
    pub skipped: usize,
    /// Scrolls that could not be read; they stay stale until a later pass.
    pub failed: usize,
}

impl std::fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Indexed {} scroll(s) ({} unchanged, {} failed)",
            self.processed, self.skipped, self.failed
        )?;
        if self.created {
            write!(f, " into a new index")?;
        }
        Ok(())
    }
}

/// Whether `file` has to be (re)indexed given the watermark `cutoff`.
///
/// A freshly created index needs everything.
pub fn needs_indexing(
    file: &ScrollFile,
    cutoff: SystemTime,
    index_created: bool,
) -> bool {
    index_created || file.modified >= cutoff
}

/// Bring the index in `index_dir` up to date with the knowledge directory.
///
/// Only scrolls modified since the last successful pass are parsed. All of
/// them are committed as one batch. The watermark is advanced to the time
/// this pass *started*, and only once the commit has succeeded, so scrolls
/// edited during the scan are picked up next time.
///
/// A newly created index also discards the previous watermark, so a pass
/// that dies after creating the index leaves the next one a full rebuild.
///
/// Scrolls deleted from disk are not noticed here; see
/// [`crate::Library::remove_from_index`].
pub fn update_index(
    index_dir: &Path,
    store: &ScrollStore,
    watermark: &Watermark,
) -> Result<UpdateReport> {
    let (index, created) = SearchIndex::open_or_create(index_dir)?;
    if created {
        // Stale once the index is new, even if this pass fails.
        watermark.clear()?;
    }
    let cutoff = watermark.read_or_epoch();
    let started = SystemTime::now();

    let files = store.list()?;
    let mut report = UpdateReport {
        created,
        ..UpdateReport::default()
    };

    let mut batch = ScrollBatch::new();
    for file in &files {
        if !needs_indexing(file, cutoff, created) {
            report.skipped += 1;
            continue;
        }

        let text = match store.read(&file.id) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(id = %file.id, error = %e, "skipping scroll");
                report.failed += 1;
                continue;
            }
        };

        tracing::debug!(id = %file.id, "indexing scroll");
        batch.stage(parser::parse(file.id.clone(), &text));
    }

    report.processed = index.commit_batch(batch)?;

    if let Err(e) = watermark.stamp(started) {
        tracing::warn!(
            path = %watermark.path().display(),
            error = %e,
            "cannot record index update time"
        );
    }

    tracing::info!(
        processed = report.processed,
        skipped = report.skipped,
        failed = report.failed,
        created = report.created,
        "index updated"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use super::*;
    use crate::scroll::ScrollId;

    fn make_file(id: &str, modified: SystemTime) -> ScrollFile {
        ScrollFile {
            id: ScrollId::new(id),
            path: PathBuf::from(format!("/abs/{id}.tex")),
            modified,
        }
    }

    #[test]
    fn new_index_needs_everything() {
        let cutoff = SystemTime::now();
        let old = make_file("a", SystemTime::UNIX_EPOCH);
        assert!(needs_indexing(&old, cutoff, true));
        assert!(!needs_indexing(&old, cutoff, false));
    }

    #[test]
    fn modified_at_or_after_cutoff_needs_indexing() {
        let cutoff = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let same = make_file("a", cutoff);
        let newer = make_file("b", cutoff + Duration::from_secs(1));
        let older = make_file("c", cutoff - Duration::from_secs(1));

        assert!(needs_indexing(&same, cutoff, false));
        assert!(needs_indexing(&newer, cutoff, false));
        assert!(!needs_indexing(&older, cutoff, false));
    }

    #[test]
    fn epoch_cutoff_reindexes_everything() {
        let file = make_file("a", SystemTime::UNIX_EPOCH + Duration::from_secs(1));
        assert!(needs_indexing(&file, SystemTime::UNIX_EPOCH, false));
    }

    #[test]
    fn report_display() {
        let report = UpdateReport {
            created: true,
            processed: 3,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(
            report.to_string(),
            "Indexed 3 scroll(s) (1 unchanged, 0 failed) into a new index"
        );
    }

    #[test]
    fn unreadable_scroll_is_counted_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let library = tmp.path().join("library");
        std::fs::create_dir(&library).unwrap();
        std::fs::write(library.join("good.tex"), "fine\n\n% ok").unwrap();
        std::fs::write(library.join("bad.tex"), [0xff, 0xfe, 0x00]).unwrap();

        let store = ScrollStore::new(&library, "tex");
        let watermark = Watermark::new(tmp.path().join("index_updated"));
        let report =
            update_index(&tmp.path().join("index"), &store, &watermark)
                .unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);
        assert!(watermark.read().is_ok());
    }

    #[test]
    fn missing_knowledge_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScrollStore::new(tmp.path().join("absent"), "tex");
        let watermark = Watermark::new(tmp.path().join("index_updated"));

        assert!(
            update_index(&tmp.path().join("index"), &store, &watermark)
                .is_err()
        );
        // A failed pass must not advance the watermark.
        assert!(watermark.read().is_err());
    }

    #[test]
    fn failed_first_pass_still_forces_full_rebuild() {
        let tmp = tempfile::tempdir().unwrap();
        let library = tmp.path().join("library");
        let index_dir = tmp.path().join("index");
        let store = ScrollStore::new(&library, "tex");
        let watermark = Watermark::new(tmp.path().join("index_updated"));
        watermark.stamp(SystemTime::now()).unwrap();

        // The index gets created, then listing the missing library fails.
        assert!(update_index(&index_dir, &store, &watermark).is_err());
        assert!(index_dir.is_dir());

        std::fs::create_dir(&library).unwrap();
        let path = library.join("old.tex");
        std::fs::write(&path, "written long ago").unwrap();
        std::fs::File::options()
            .append(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000))
            .unwrap();

        let report = update_index(&index_dir, &store, &watermark).unwrap();
        assert!(!report.created);
        assert_eq!(report.processed, 1);
        let index = SearchIndex::open_existing(&index_dir).unwrap();
        assert_eq!(index.doc_count().unwrap(), 1);
    }
}

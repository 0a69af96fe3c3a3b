//! scriptorium - incremental full-text search over a library of scrolls.
//!
//! A scroll is a small LaTeX fragment whose trailing `%` comment block
//! carries metadata (`@type`, `@source`, `@hidden` directives and a tag
//! list). scriptorium keeps a [Tantivy](https://github.com/quickwit-oss/tantivy)
//! index of the library up to date by re-indexing only the scrolls that
//! changed since the last pass.
//!
//! # Quick start
//!
//! ```no_run
//! use scriptorium::{Config, Library};
//!
//! let config = Config::resolve(None, None).unwrap();
//! let library = Library::new(config);
//!
//! let report = library.update_index().unwrap();
//! println!("{report}");
//!
//! let results = library.search("compact ~metric -finite").unwrap();
//! for hit in &results.hits {
//!     println!("{} (score: {:.3})", hit.id, hit.score);
//! }
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod incremental;
pub mod library;
pub mod parser;
pub mod query;
pub mod scroll;
pub mod search;
pub mod stats;
pub mod store;
pub mod tantivy_index;
pub mod watermark;

pub use batch::ScrollBatch;
pub use config::Config;
pub use error::{Error, Result};
pub use incremental::UpdateReport;
pub use library::Library;
pub use scroll::{Scroll, ScrollId};
pub use stats::Statistics;
pub use tantivy_index::SearchIndex;

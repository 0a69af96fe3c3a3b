use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Maximum number of hits returned by a search unless overridden.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// File extension of scrolls in the knowledge directory.
pub const DEFAULT_EXTENSION: &str = "tex";

/// Paths and limits shared by every component.
///
/// Built once at startup and handed to [`crate::Library::new`]; nothing in
/// the crate reads configuration from global state.
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    knowledge_dir: PathBuf,
    pub extension: String,
    pub max_results: usize,
}

impl Config {
    /// Resolve the data directory from, in order of priority:
    /// 1. An explicit path (from --data-dir)
    /// 2. The SCRIPTORIUM_DATA_DIR environment variable
    /// 3. The XDG data directory (~/.local/share/scriptorium/)
    ///
    /// The knowledge directory follows the same pattern with --library and
    /// SCRIPTORIUM_LIBRARY, falling back to `<data_dir>/library`.
    pub fn resolve(
        data_dir: Option<&Path>,
        knowledge_dir: Option<&Path>,
    ) -> Result<Self> {
        let root = if let Some(path) = data_dir {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var("SCRIPTORIUM_DATA_DIR") {
            PathBuf::from(val)
        } else {
            xdg::BaseDirectories::with_prefix("scriptorium")
                .get_data_home()
                .ok_or_else(|| {
                    Error::Config(
                        "could not determine XDG data home directory".into(),
                    )
                })?
        };

        let library = if let Some(path) = knowledge_dir {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var("SCRIPTORIUM_LIBRARY") {
            PathBuf::from(val)
        } else {
            root.join("library")
        };

        Self::new(root, library)
    }

    /// Build a configuration from explicit paths, creating the data
    /// directory if needed.
    pub fn new(data_dir: PathBuf, knowledge_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .map_err(|_| Error::DataDir(data_dir.clone()))?;

        Ok(Self {
            data_dir,
            knowledge_dir,
            extension: DEFAULT_EXTENSION.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn knowledge_dir(&self) -> &Path {
        &self.knowledge_dir
    }

    /// Directory holding the tantivy index files.
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Zero-length file whose mtime records the last update pass.
    pub fn marker_file(&self) -> PathBuf {
        self.data_dir.join("index_updated")
    }
}

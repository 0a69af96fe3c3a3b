use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::{error::Result, scroll::ScrollId};

/// A scroll file found in the knowledge directory.
#[derive(Debug, Clone)]
pub struct ScrollFile {
    pub id: ScrollId,
    pub path: PathBuf,
    /// Last modification time, `UNIX_EPOCH` when it could not be read.
    pub modified: SystemTime,
}

/// Read access to the flat directory of scroll sources.
#[derive(Debug, Clone)]
pub struct ScrollStore {
    root: PathBuf,
    extension: String,
}

impl ScrollStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Path of the source file backing `id`.
    pub fn path_of(&self, id: &ScrollId) -> PathBuf {
        self.root.join(format!("{id}.{}", self.extension))
    }

    /// Read the raw text of a scroll.
    pub fn read(&self, id: &ScrollId) -> Result<String> {
        Ok(std::fs::read_to_string(self.path_of(id))?)
    }

    /// List every scroll in the knowledge directory, sorted by id.
    ///
    /// Hidden files, directories and files with another extension are
    /// skipped. Subdirectories are not descended into.
    pub fn list(&self) -> Result<Vec<ScrollFile>> {
        let mut results = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            if name.starts_with('.') || !entry.file_type()?.is_file() {
                continue;
            }
            let Some(id) = self.id_of(&path) else {
                continue;
            };

            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(time) => time,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "cannot read modification time"
                    );
                    SystemTime::UNIX_EPOCH
                }
            };

            results.push(ScrollFile { id, path, modified });
        }

        results.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(results)
    }

    /// Sum of the sizes of all regular files below the knowledge directory.
    pub fn total_size(&self) -> Result<u64> {
        dir_size(&self.root)
    }

    fn id_of(&self, path: &Path) -> Option<ScrollId> {
        if path.extension()? != OsStr::new(&self.extension) {
            return None;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => Some(ScrollId::new(stem)),
            None => {
                tracing::warn!(
                    path = %path.display(),
                    "skipping scroll with a non UTF-8 name"
                );
                None
            }
        }
    }
}

fn dir_size(dir: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            total += dir_size(&entry.path())?;
        } else if file_type.is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Timestamp of the last update pass, kept as the mtime of an empty file.
#[derive(Debug, Clone)]
pub struct Watermark {
    path: PathBuf,
}

impl Watermark {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time of the marker file.
    pub fn read(&self) -> io::Result<SystemTime> {
        std::fs::metadata(&self.path)?.modified()
    }

    /// Like [`Watermark::read`], but an unreadable marker counts as the
    /// epoch so that every scroll looks modified.
    pub fn read_or_epoch(&self) -> SystemTime {
        match self.read() {
            Ok(time) => time,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cannot read index watermark, reindexing everything"
                );
                SystemTime::UNIX_EPOCH
            }
        }
    }

    /// Remove the marker so the next read falls back to the epoch.
    /// A missing marker is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Set the marker's mtime to `at`, creating it empty if missing.
    /// Existing content is never touched.
    pub fn stamp(&self, at: SystemTime) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.set_modified(at)
    }
}

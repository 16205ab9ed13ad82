//! Page sinks.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::export::errors::ExportError;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "json";

/// Destination for serialized pages.
pub trait PageSink {
    /// Stores `contents` under `name`, replacing any previous page of that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be stored.
    fn write_page(&mut self, name: &str, contents: &[u8]) -> Result<(), ExportError>;
}

/// Writes each page as a file in a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Opens `dir` as a sink, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;

        Ok(Self { dir })
    }

    /// Directory the pages are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PageSink for DirectorySink {
    fn write_page(&mut self, name: &str, contents: &[u8]) -> Result<(), ExportError> {
        let path = self.dir.join(name);

        debug!(path = %path.display(), bytes = contents.len(), "writing page");

        fs::write(&path, contents).map_err(|source| ExportError::Io { path, source })
    }
}

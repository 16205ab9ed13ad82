//! Export errors.

use std::{io, path::PathBuf};

use thiserror::Error;

use bargains::pages::PageError;

use crate::catalog::CatalogServiceError;

/// Errors raised while exporting the publication history.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The history could not be read from the catalog.
    #[error("failed to read published products")]
    Catalog(#[from] CatalogServiceError),

    /// The history cannot be laid out as a valid page chain.
    #[error(transparent)]
    Pages(#[from] PageError),

    /// A page could not be serialized.
    #[error("failed to serialize page {page}")]
    Serialize {
        /// Page file name.
        page: String,
        #[source]
        source: serde_json::Error,
    },

    /// A page or the output directory could not be written.
    #[error("failed to write {}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

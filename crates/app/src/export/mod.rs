//! Export
//!
//! Turns the publication history into the static JSON pages served to the
//! site.

use std::num::NonZeroUsize;

use tracing::info;

use bargains::{
    history::annotate,
    pages::{self, Emit},
};

use crate::catalog::CatalogService;

pub mod errors;
pub mod sink;

pub use errors::ExportError;
pub use sink::{DEFAULT_OUTPUT_DIR, DirectorySink, PageSink};

/// Pagination settings for one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Records per page after the index.
    pub page_size: NonZeroUsize,

    /// Which pages to write.
    pub emit: Emit,
}

/// What an export run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Published products in the history.
    pub records: usize,

    /// Page names, in chain order.
    pub pages: Vec<String>,
}

/// Reads the publication history and writes its pages to `sink`.
///
/// # Errors
///
/// Returns an error if the history cannot be read, two pages would share a
/// name, or a page cannot be serialized or written. Page names are checked
/// before anything is written.
#[tracing::instrument(
    name = "export.pages",
    skip(catalog, sink),
    fields(page_size = options.page_size.get(), emit = ?options.emit),
    err
)]
pub async fn export_pages<S>(
    catalog: &dyn CatalogService,
    sink: &mut S,
    options: ExportOptions,
) -> Result<ExportSummary, ExportError>
where
    S: PageSink + ?Sized,
{
    let history = annotate(catalog.published_products().await?);

    let mut written = Vec::new();

    for page in pages::build(&history, options.page_size, options.emit)? {
        let contents = page.to_json().map_err(|source| ExportError::Serialize {
            page: page.name().to_string(),
            source,
        })?;

        sink.write_page(page.name(), &contents)?;

        written.push(page.name().to_string());
    }

    info!(records = history.len(), pages = written.len(), "exported pages");

    Ok(ExportSummary {
        records: history.len(),
        pages: written,
    })
}

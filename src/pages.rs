//! Pages
//!
//! Slices the newest-first publication history into fixed-size JSON pages.
//!
//! The first page is always `index.json` and absorbs the remainder, so every
//! following page is exactly `page_size` long. A page's `nextPage` is the
//! token of the page that follows it, derived from the predecessor link of its
//! last record; consumers can walk the chain without knowing the page count.

use std::num::NonZeroUsize;

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;

use crate::history::LinkedProduct;

/// Name of the first page.
pub const INDEX_PAGE_NAME: &str = "index.json";

const PAGE_TOKEN_FORMAT: &str = "%Y%m%d-%H%M";

/// Formats a timestamp as a page token (`YYYYMMDD-HHMM`, UTC).
pub fn page_token(timestamp: Timestamp) -> String {
    timestamp.strftime(PAGE_TOKEN_FORMAT).to_string()
}

/// Errors raised while laying out pages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// Two pages would share a file name, because the newest records of both
    /// were published within the same minute.
    #[error("page {name} would be written more than once")]
    DuplicatePage {
        /// The colliding file name.
        name: String,
    },
}

/// Which pages to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emit {
    /// The index page and the page after it.
    #[default]
    Preview,

    /// Every page.
    All,
}

/// Page arithmetic for a history of `total` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// Number of records.
    pub total: usize,

    /// Size of every page after the index.
    pub page_size: NonZeroUsize,

    /// Number of records on the index page.
    pub index_len: usize,

    /// Number of pages, counting the index. An empty history still has its
    /// (empty) index page.
    pub total_pages: usize,
}

impl PageLayout {
    /// Computes the layout for `total` records.
    #[must_use]
    pub fn new(total: usize, page_size: NonZeroUsize) -> Self {
        let size = page_size.get();
        let remainder = total % size;

        let index_len = if remainder == 0 {
            size.min(total)
        } else {
            remainder
        };

        let total_pages = if total == 0 {
            1
        } else {
            total / size + usize::from(remainder != 0)
        };

        Self {
            total,
            page_size,
            index_len,
            total_pages,
        }
    }
}

/// One exported page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(skip)]
    name: String,

    products: Vec<LinkedProduct>,

    #[serde(skip_serializing_if = "Option::is_none")]
    next_page: Option<String>,
}

impl Page {
    fn new(name: String, products: Vec<LinkedProduct>) -> Self {
        let next_page = products
            .last()
            .and_then(|product| product.next_page.clone());

        Self {
            name,
            products,
            next_page,
        }
    }

    fn index(products: &[LinkedProduct]) -> Self {
        Self::new(INDEX_PAGE_NAME.to_string(), products.to_vec())
    }

    /// A non-index page is named after its newest record, which is what the
    /// previous page's `nextPage` points at.
    fn following(products: &[LinkedProduct]) -> Option<Self> {
        products
            .first()
            .map(|first| Self::new(format!("{}.json", first.page_token()), products.to_vec()))
    }

    /// File name, including the `.json` extension.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records on this page, newest first.
    #[must_use]
    pub fn products(&self) -> &[LinkedProduct] {
        &self.products
    }

    /// Token of the next (older) page, if there is one.
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Serializes the page as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// Builds pages from newest-first annotated records.
///
/// An empty history produces a single empty index page. Pages are never
/// emitted empty otherwise.
///
/// Every page name in the full chain is checked, whatever `emit` selects, so a
/// preview never links into a chain that could not be written completely.
///
/// # Errors
///
/// Returns [`PageError::DuplicatePage`] when two pages would get the same
/// name. Writing them would overwrite records and loop the `nextPage` chain.
pub fn build(
    records: &[LinkedProduct],
    page_size: NonZeroUsize,
    emit: Emit,
) -> Result<Vec<Page>, PageError> {
    let layout = PageLayout::new(records.len(), page_size);

    let (index, rest) = records.split_at(layout.index_len.min(records.len()));

    let mut names = FxHashSet::default();

    for first in rest.chunks(page_size.get()).filter_map(<[LinkedProduct]>::first) {
        let name = format!("{}.json", first.page_token());

        if !names.insert(name.clone()) {
            return Err(PageError::DuplicatePage { name });
        }
    }

    let following = match emit {
        Emit::Preview => 1,
        Emit::All => layout.total_pages.saturating_sub(1),
    };

    let mut pages = Vec::with_capacity(1 + following);

    pages.push(Page::index(index));

    pages.extend(
        rest.chunks(page_size.get())
            .take(following)
            .filter_map(Page::following),
    );

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
    }

    #[test]
    fn test_layout_with_remainder() {
        let layout = PageLayout::new(25, size(10));

        assert_eq!(layout.index_len, 5);
        assert_eq!(layout.total_pages, 3);
    }

    #[test]
    fn test_layout_without_remainder() {
        let layout = PageLayout::new(20, size(10));

        assert_eq!(layout.index_len, 10);
        assert_eq!(layout.total_pages, 2);
    }

    #[test]
    fn test_layout_smaller_than_page() {
        let layout = PageLayout::new(3, size(10));

        assert_eq!(layout.index_len, 3);
        assert_eq!(layout.total_pages, 1);
    }

    #[test]
    fn test_layout_empty() {
        let layout = PageLayout::new(0, size(10));

        assert_eq!(layout.index_len, 0);
        assert_eq!(layout.total_pages, 1);
    }

    #[test]
    fn test_empty_history_yields_empty_index() -> TestResult {
        let pages = build(&[], size(10), Emit::All)?;

        assert_eq!(pages.len(), 1);

        let index = pages.first().ok_or("missing index page")?;

        assert_eq!(index.name(), INDEX_PAGE_NAME);
        assert!(index.products().is_empty());
        assert_eq!(index.next_page(), None);
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&index.to_json()?)?,
            serde_json::json!({ "products": [] })
        );

        Ok(())
    }

    #[test]
    fn test_page_token_format() -> TestResult {
        let timestamp: Timestamp = "2020-07-20T13:03:44.123Z".parse()?;

        assert_eq!(page_token(timestamp), "20200720-1303");

        Ok(())
    }
}

//! Publication History
//!
//! Links every published product to the one announced just before it, which
//! is what lets each exported page point at the next-older page.

use jiff::Timestamp;
use serde::Serialize;

use crate::{pages::page_token, products::Product};

/// A published product annotated with its chronological predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProduct {
    /// The published product.
    #[serde(flatten)]
    pub product: Product,

    /// When the product was announced.
    #[serde(skip)]
    pub posted_at: Timestamp,

    /// When the previous (one step older) product was announced.
    #[serde(skip)]
    pub prev_posted_at: Option<Timestamp>,

    /// Page token of the predecessor, absent for the oldest publication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

impl LinkedProduct {
    fn new(product: Product, posted_at: Timestamp, prev_posted_at: Option<Timestamp>) -> Self {
        Self {
            product,
            posted_at,
            prev_posted_at,
            next_page: prev_posted_at.map(page_token),
        }
    }

    /// Page token for this product's own publication time.
    #[must_use]
    pub fn page_token(&self) -> String {
        page_token(self.posted_at)
    }
}

/// Annotates published products with their predecessor and returns them
/// newest first.
///
/// Products that were never published are ignored. Publications sharing a
/// timestamp are ordered by key so the result is deterministic.
pub fn annotate(products: impl IntoIterator<Item = Product>) -> Vec<LinkedProduct> {
    let mut published: Vec<(Timestamp, Product)> = products
        .into_iter()
        .filter_map(|product| product.last_posted_utc.map(|posted_at| (posted_at, product)))
        .collect();

    published.sort_by(|(a_posted, a), (b_posted, b)| {
        a_posted.cmp(b_posted).then_with(|| a.key().cmp(&b.key()))
    });

    let mut previous = None;

    let mut linked: Vec<LinkedProduct> = published
        .into_iter()
        .map(|(posted_at, product)| {
            let linked = LinkedProduct::new(product, posted_at, previous);

            previous = Some(posted_at);

            linked
        })
        .collect();

    linked.reverse();

    linked
}

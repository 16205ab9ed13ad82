//! Catalog synchronisation
//!
//! Reconciles a scraped batch with existing catalog rows. Storage lives
//! elsewhere; these functions decide *what* to write.

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::products::{Listing, Product, ProductKey};

/// Outcome of merging one listing into the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Merge {
    /// The key was not in the catalog; insert this row.
    Insert(Product),

    /// The key was already present; overwrite the row with this value.
    Update(Product),
}

impl Merge {
    /// The row to persist.
    #[must_use]
    pub fn product(&self) -> &Product {
        match self {
            Self::Insert(product) | Self::Update(product) => product,
        }
    }

    /// Consumes the merge, returning the row to persist.
    #[must_use]
    pub fn into_product(self) -> Product {
        match self {
            Self::Insert(product) | Self::Update(product) => product,
        }
    }
}

/// Normalises a wall-clock reading into a batch timestamp.
///
/// Catalog timestamps are stored with microsecond precision, so the batch
/// timestamp is truncated to match what a read will return.
///
/// # Errors
///
/// Returns an error when the truncated value is out of range.
pub fn batch_timestamp(now: Timestamp) -> Result<Timestamp, jiff::Error> {
    Timestamp::from_microsecond(now.as_microsecond())
}

/// Collapses listings sharing a key, keeping the last value at the position of
/// the first occurrence.
pub fn dedup_batch(batch: impl IntoIterator<Item = Listing>) -> Vec<Listing> {
    let mut positions: FxHashMap<ProductKey, usize> = FxHashMap::default();
    let mut listings: Vec<Listing> = Vec::new();

    for listing in batch {
        match positions.get(&listing.key()) {
            Some(&position) => {
                if let Some(slot) = listings.get_mut(position) {
                    *slot = listing;
                }
            }
            None => {
                positions.insert(listing.key(), listings.len());
                listings.push(listing);
            }
        }
    }

    listings
}

/// Merges a scraped listing with the existing row for its key.
///
/// Descriptive fields and prices are refreshed and `last_updated_utc` is set to
/// `now`. `created_utc` and `last_posted_utc` are never changed for an existing
/// row.
#[must_use]
pub fn merge(existing: Option<Product>, listing: Listing, now: Timestamp) -> Merge {
    match existing {
        None => Merge::Insert(Product {
            id: listing.id,
            category: listing.category,
            name: listing.name,
            link: listing.link,
            image: listing.image,
            price: listing.price,
            sale_price: listing.sale_price,
            savings: listing.savings,
            created_utc: now,
            last_updated_utc: Some(now),
            last_posted_utc: None,
        }),
        Some(product) => Merge::Update(Product {
            name: listing.name,
            link: listing.link,
            image: listing.image,
            price: listing.price,
            sale_price: listing.sale_price,
            savings: listing.savings,
            last_updated_utc: Some(now),
            ..product
        }),
    }
}

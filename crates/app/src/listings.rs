//! Listing batches
//!
//! Scrapers hand over a batch as a JSON array of listings for one category.

use std::{fs, io, path::Path};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use bargains::{
    categories::Category,
    products::{Listing, ProductKey},
};

/// Errors raised while reading a listing batch.
#[derive(Debug, Error)]
pub enum ListingsError {
    /// The batch file could not be read.
    #[error("failed to read listings from {path}")]
    Io {
        /// Path of the batch file.
        path: String,
        #[source]
        source: io::Error,
    },

    /// The batch is not a JSON array of complete listings.
    #[error("malformed listings")]
    Json(#[from] serde_json::Error),

    /// The batch holds no listings.
    #[error("listing batch is empty")]
    Empty,
}

/// One scraped listing as it appears in a batch file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    /// Retailer product id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Product page URL.
    pub link: String,

    /// Image URL, when the retailer shows one.
    #[serde(default)]
    pub image: Option<String>,

    /// Full price.
    pub price: Decimal,

    /// Discounted price.
    pub sale_price: Decimal,
}

impl ListingInput {
    /// Attaches the batch category and computes savings.
    #[must_use]
    pub fn into_listing(self, category: Category) -> Listing {
        Listing::new(
            ProductKey::new(self.id, category),
            self.name,
            self.link,
            self.image,
            self.price,
            self.sale_price,
        )
    }
}

/// Parses a batch of listings scraped from `category`.
///
/// # Errors
///
/// Returns an error if the JSON is malformed, a listing is missing a field, or
/// the batch is empty.
pub fn parse_batch(json: &str, category: Category) -> Result<Vec<Listing>, ListingsError> {
    let inputs: Vec<ListingInput> = serde_json::from_str(json)?;

    if inputs.is_empty() {
        return Err(ListingsError::Empty);
    }

    Ok(inputs
        .into_iter()
        .map(|input| input.into_listing(category))
        .collect())
}

/// Reads and parses a batch file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or [`parse_batch`] rejects it.
pub fn load_batch(path: &Path, category: Category) -> Result<Vec<Listing>, ListingsError> {
    let json = fs::read_to_string(path).map_err(|source| ListingsError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_batch(&json, category)
}

//! Products

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::categories::Category;

/// Composite catalog key.
///
/// Listing ids are only unique within a category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductKey {
    /// Identifier taken from the source listing.
    pub id: String,

    /// Category the listing was scraped from.
    pub category: Category,
}

impl ProductKey {
    /// Creates a key from its parts.
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
        }
    }
}

/// A freshly scraped listing, before it is reconciled with the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Identifier taken from the source listing.
    pub id: String,

    /// Category the listing was scraped from.
    pub category: Category,

    /// Display name.
    pub name: String,

    /// Link to the listing.
    pub link: String,

    /// Listing image, when the source provides one.
    pub image: Option<String>,

    /// Original price.
    pub price: Decimal,

    /// Marked-down price.
    pub sale_price: Decimal,

    /// `price - sale_price`, computed when the listing is scraped.
    pub savings: Decimal,
}

impl Listing {
    /// Creates a listing, computing its savings from the two prices.
    #[must_use]
    pub fn new(
        key: ProductKey,
        name: String,
        link: String,
        image: Option<String>,
        price: Decimal,
        sale_price: Decimal,
    ) -> Self {
        Self {
            id: key.id,
            category: key.category,
            name,
            link,
            image,
            price,
            sale_price,
            savings: price - sale_price,
        }
    }

    /// Composite key of this listing.
    #[must_use]
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.id.clone(), self.category)
    }
}

/// Persistent catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier taken from the source listing.
    pub id: String,

    /// Category the listing was scraped from.
    pub category: Category,

    /// Display name, refreshed on every sync.
    pub name: String,

    /// Link to the listing, refreshed on every sync.
    pub link: String,

    /// Listing image, refreshed on every sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Original price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Marked-down price.
    #[serde(with = "rust_decimal::serde::float")]
    pub sale_price: Decimal,

    /// Savings as stored at scrape time.
    #[serde(with = "rust_decimal::serde::float")]
    pub savings: Decimal,

    /// First time the product was observed. Never changes.
    pub created_utc: Timestamp,

    /// Timestamp of the latest batch that contained the product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_utc: Option<Timestamp>,

    /// When the product was announced, if ever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_posted_utc: Option<Timestamp>,
}

impl Product {
    /// Composite key of this product.
    #[must_use]
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.id.clone(), self.category)
    }

    /// Whether the product has already been announced.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.last_posted_utc.is_some()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_listing_computes_savings() {
        let listing = Listing::new(
            ProductKey::new("A1", Category::CoachBags),
            "Tote".to_string(),
            "https://example.com/a1".to_string(),
            None,
            dec!(450.00),
            dec!(315.50),
        );

        assert_eq!(listing.savings, dec!(134.50));
        assert_eq!(listing.key(), ProductKey::new("A1", Category::CoachBags));
    }

    #[test]
    fn test_product_json_omits_nulls_and_uses_camel_case() -> TestResult {
        let product = Product {
            id: "A1".to_string(),
            category: Category::FwrdShoes,
            name: "Mule".to_string(),
            link: "https://example.com/a1".to_string(),
            image: None,
            price: dec!(200),
            sale_price: dec!(150.5),
            savings: dec!(49.5),
            created_utc: "2020-07-20T13:03:44Z".parse()?,
            last_updated_utc: Some("2020-07-20T13:03:44Z".parse()?),
            last_posted_utc: None,
        };

        let json = serde_json::to_value(&product)?;

        assert_eq!(json["salePrice"], serde_json::json!(150.5));
        assert_eq!(json["category"], serde_json::json!(1));
        assert_eq!(json["createdUtc"], serde_json::json!("2020-07-20T13:03:44Z"));
        assert!(json.get("image").is_none(), "null image must be omitted");
        assert!(
            json.get("lastPostedUtc").is_none(),
            "null lastPostedUtc must be omitted"
        );

        Ok(())
    }
}

//! Selection
//!
//! Picks the next product to announce for a category.

use jiff::Timestamp;
use rand::Rng;

use crate::{categories::Category, products::Product};

/// Whether `product` may be announced for `category` after the batch stamped
/// at `now`.
///
/// The product must belong to the category, have been seen in that batch, and
/// never have been announced.
#[must_use]
pub fn is_eligible(product: &Product, category: Category, now: Timestamp) -> bool {
    product.category == category
        && product
            .last_updated_utc
            .is_some_and(|last_updated| last_updated >= now)
        && product.last_posted_utc.is_none()
}

/// Chooses uniformly at random among the eligible products.
///
/// Returns `None` when nothing is eligible.
pub fn choose_candidate<R>(
    products: impl IntoIterator<Item = Product>,
    category: Category,
    now: Timestamp,
    rng: &mut R,
) -> Option<Product>
where
    R: Rng + ?Sized,
{
    let mut eligible: Vec<Product> = products
        .into_iter()
        .filter(|product| is_eligible(product, category, now))
        .collect();

    if eligible.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..eligible.len());

    Some(eligible.swap_remove(index))
}

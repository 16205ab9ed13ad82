//! Announcement text for a chosen product.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::products::Product;

/// Savings relative to the original price, in whole percent points.
#[must_use]
pub fn savings_percent(product: &Product) -> Decimal {
    if product.price.is_zero() {
        return Decimal::ZERO;
    }

    let percentage = Percentage::from(product.savings / product.price);

    (percentage * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// The text posted when `product` is announced.
#[must_use]
pub fn announcement_text(product: &Product) -> String {
    format!(
        "{} - {}% off, was ${}, now ${} {}",
        product.name,
        savings_percent(product),
        product.price,
        product.sale_price,
        product.link
    )
}

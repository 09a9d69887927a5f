//! Retail pricing for storefront products.
//!
//! The storefront price is the distributor net price plus a tiered markup:
//!
//! | net price        | markup |
//! |------------------|--------|
//! | `<= 24.99`       | 30 %   |
//! | `<= 50.00`       | 25 %   |
//! | above `50.00`    | 20 %   |
//!
//! The marked-up price is always rounded **up** to the cent so rounding never
//! eats into the margin. The compare-at price is the distributor retail price
//! rounded to two decimal places, without markup.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("negative {field} price: {value}")]
    NegativePrice { field: &'static str, value: Decimal },
}

/// Final storefront prices for one distributor item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    /// Sale price, scale 2.
    pub price: Decimal,
    /// "Was" price shown next to the sale price, scale 2.
    pub compare_at_price: Decimal,
    /// Markup tier applied to the net price, in percent.
    pub markup_percent: Decimal,
}

/// Markup percentage for a net price. Tier boundaries belong to the lower tier.
#[must_use]
pub fn markup_percent(net_price: Decimal) -> Decimal {
    if net_price <= Decimal::new(2499, 2) {
        Decimal::from(30)
    } else if net_price <= Decimal::new(5000, 2) {
        Decimal::from(25)
    } else {
        Decimal::from(20)
    }
}

/// Computes the storefront price and compare-at price.
///
/// # Errors
///
/// Returns [`PricingError::NegativePrice`] if either input is negative.
pub fn compute_price(net_price: Decimal, retail_price: Decimal) -> Result<PriceQuote, PricingError> {
    if net_price < Decimal::ZERO {
        return Err(PricingError::NegativePrice {
            field: "net",
            value: net_price,
        });
    }
    if retail_price < Decimal::ZERO {
        return Err(PricingError::NegativePrice {
            field: "retail",
            value: retail_price,
        });
    }

    let markup = markup_percent(net_price);
    let marked_up = net_price * (Decimal::ONE_HUNDRED + markup) / Decimal::ONE_HUNDRED;

    let mut price = marked_up.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
    price.rescale(2);

    let mut compare_at_price =
        retail_price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    compare_at_price.rescale(2);

    Ok(PriceQuote {
        price,
        compare_at_price,
        markup_percent: markup,
    })
}

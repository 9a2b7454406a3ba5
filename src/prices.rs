//! Prices
//!
//! Every monetary value in a product table is a [`Decimal`] with exactly two decimal places, and
//! every rating carries exactly one. Sampling happens in `f64`; these helpers are the only place
//! a sampled value crosses into fixed-point.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};

/// Decimal places kept on prices.
pub const PRICE_DP: u32 = 2;

/// Decimal places kept on ratings.
pub const RATING_DP: u32 = 1;

/// Largest discount percentage a record may carry.
pub const MAX_DISCOUNT_PERCENT: u8 = 40;

/// Round a value half-to-even and pad it to exactly `dp` decimal places.
///
/// Returns `None` when `value` is not finite or is out of range for a [`Decimal`].
pub fn round_to(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64(value).map(|value| fixed(value, dp))
}

/// Round a sampled price to two decimal places.
pub fn round_price(value: f64) -> Option<Decimal> {
    round_to(value, PRICE_DP)
}

/// Round a sampled rating to one decimal place.
pub fn round_rating(value: f64) -> Option<Decimal> {
    round_to(value, RATING_DP)
}

/// Apply an integer percentage discount to a price.
///
/// The result is `actual * (1 - percent / 100)` rounded to two decimal places. The multiplication
/// is exact in decimal space, so the same inputs always give the same output.
pub fn apply_discount(actual: Decimal, percent: u8) -> Decimal {
    let fraction = Decimal::from(percent) / Decimal::ONE_HUNDRED;

    fixed(actual * (Decimal::ONE - fraction), PRICE_DP)
}

/// Express a two-place decimal price as [`Money`] for display.
///
/// Returns `None` when the price has no `i64` minor-unit representation.
pub fn to_money(price: Decimal, currency: &Currency) -> Option<Money<'_, Currency>> {
    let minor = price
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()?;

    Some(Money::from_minor(minor, currency))
}

fn fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);

    rounded.rescale(dp);
    rounded
}

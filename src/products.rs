//! Products

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors parsing a [`ProductId`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductIdError {
    /// The identifier does not start with `P`.
    #[error("product id {0:?} does not start with 'P'")]
    MissingPrefix(String),

    /// The numeric part is missing, malformed or zero.
    #[error("product id {0:?} does not carry a positive sequence number")]
    InvalidSequence(String),
}

/// Sequential, 1-based product identifier, rendered as `P` followed by at least four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(u32);

impl ProductId {
    /// Create an identifier from its 1-based sequence number.
    ///
    /// Returns `None` for zero.
    pub fn new(sequence: u32) -> Option<Self> {
        (sequence > 0).then_some(Self(sequence))
    }

    /// The 1-based sequence number.
    pub fn sequence(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:04}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('P')
            .ok_or_else(|| ProductIdError::MissingPrefix(s.to_string()))?;

        let padded_past_width = digits.len() > 4 && digits.starts_with('0');

        if digits.len() < 4 || padded_past_width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProductIdError::InvalidSequence(s.to_string()));
        }

        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ProductIdError::InvalidSequence(s.to_string()))
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.to_string()
    }
}

/// A single synthetic product listing.
///
/// Field order is the column order of the flat table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Sequential identifier
    pub product_id: ProductId,

    /// `"{adjective} {product type}"`
    pub product_name: String,

    /// Catalog category
    pub category: String,

    /// List price, two decimal places
    pub actual_price: Decimal,

    /// Price after discount, two decimal places
    pub discounted_price: Decimal,

    /// Whole-number discount, 0 to 40 inclusive
    pub discount_percentage: u8,

    /// Rating between 1.0 and 5.0, one decimal place
    pub rating: Decimal,

    /// Number of ratings, below 10000
    pub rating_count: u32,
}

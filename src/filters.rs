//! Filters
//!
//! A [`Filter`] is the conjunction the dashboard controls: the record's category is selected,
//! its discounted price lies within the price range and its rating within the rating range. Both
//! ranges are inclusive at each end.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::{products::ProductRecord, table::ProductTable};

/// Filter predicate over product records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    categories: FxHashSet<String>,
    price: RangeInclusive<Decimal>,
    rating: RangeInclusive<Decimal>,
}

impl Filter {
    /// Create a filter from its three parts.
    pub fn new<I, S>(
        categories: I,
        price: RangeInclusive<Decimal>,
        rating: RangeInclusive<Decimal>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            price,
            rating,
        }
    }

    /// The dashboard's opening state for a table.
    ///
    /// Every category in the table is selected, the price range spans the table's discounted
    /// prices and the rating range is the full 1.0 to 5.0 scale. Every row of the table matches.
    pub fn unrestricted(table: &ProductTable) -> Self {
        let (min, max) = table
            .discounted_price_range()
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));

        Self::new(table.categories(), min..=max, full_rating_range())
    }

    /// Replace the selected categories.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the discounted price range.
    #[must_use]
    pub fn with_price_range(mut self, price: RangeInclusive<Decimal>) -> Self {
        self.price = price;
        self
    }

    /// Replace the rating range.
    #[must_use]
    pub fn with_rating_range(mut self, rating: RangeInclusive<Decimal>) -> Self {
        self.rating = rating;
        self
    }

    /// Selected categories.
    pub fn categories(&self) -> &FxHashSet<String> {
        &self.categories
    }

    /// Discounted price range.
    pub fn price_range(&self) -> &RangeInclusive<Decimal> {
        &self.price
    }

    /// Rating range.
    pub fn rating_range(&self) -> &RangeInclusive<Decimal> {
        &self.rating
    }

    /// Whether a record satisfies all three conditions.
    pub fn matches(&self, record: &ProductRecord) -> bool {
        self.categories.contains(&record.category)
            && self.price.contains(&record.discounted_price)
            && self.rating.contains(&record.rating)
    }

    /// Apply the filter to a table, keeping table order.
    pub fn apply<'a>(&self, table: &'a ProductTable) -> Selection<'a> {
        let rows: Vec<&ProductRecord> = table
            .records()
            .iter()
            .filter(|record| self.matches(record))
            .collect();

        debug!(
            matched = rows.len(),
            total = table.len(),
            "applied product filter"
        );

        Selection { rows }
    }
}

/// The 1.0 to 5.0 rating scale.
pub fn full_rating_range() -> RangeInclusive<Decimal> {
    Decimal::ONE..=Decimal::from(5)
}

/// Records from a table that matched a filter, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection<'a> {
    rows: Vec<&'a ProductRecord>,
}

impl<'a> Selection<'a> {
    /// Select every row of a table.
    pub fn all(table: &'a ProductTable) -> Self {
        Self {
            rows: table.records().iter().collect(),
        }
    }

    /// Selected rows.
    pub fn rows(&self) -> &[&'a ProductRecord] {
        &self.rows
    }

    /// Iterate the selected rows.
    pub fn iter(&self) -> impl Iterator<Item = &'a ProductRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` selected rows.
    pub fn head(&self, n: usize) -> &[&'a ProductRecord] {
        self.rows.get(..n).unwrap_or(&self.rows)
    }
}

impl<'a> FromIterator<&'a ProductRecord> for Selection<'a> {
    fn from_iter<T: IntoIterator<Item = &'a ProductRecord>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

//! Stats
//!
//! Aggregate views over a [`Selection`]. Every function accepts an empty selection and returns
//! an empty, or all-absent, result rather than an error.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{filters::Selection, prices::PRICE_DP, products::ProductRecord};

/// Number of bins in the discounted price histogram.
pub const PRICE_BINS: usize = 30;

/// Number of bins in the rating histogram.
pub const RATING_BINS: usize = 20;

/// Discounted price bins in the price against rating grid.
pub const GRID_PRICE_BINS: usize = 10;

/// Rating bins in the price against rating grid.
pub const GRID_RATING_BINS: usize = 8;

/// Numeric columns of the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    /// `actual_price`
    ActualPrice,

    /// `discounted_price`
    DiscountedPrice,

    /// `discount_percentage`
    DiscountPercentage,

    /// `rating`
    Rating,

    /// `rating_count`
    RatingCount,
}

impl NumericColumn {
    /// Every numeric column, in table order.
    pub const ALL: [Self; 5] = [
        Self::ActualPrice,
        Self::DiscountedPrice,
        Self::DiscountPercentage,
        Self::Rating,
        Self::RatingCount,
    ];

    /// Column name as it appears in the table header.
    pub fn name(self) -> &'static str {
        match self {
            Self::ActualPrice => "actual_price",
            Self::DiscountedPrice => "discounted_price",
            Self::DiscountPercentage => "discount_percentage",
            Self::Rating => "rating",
            Self::RatingCount => "rating_count",
        }
    }

    /// The column's value for a record.
    pub fn value(self, record: &ProductRecord) -> f64 {
        match self {
            Self::ActualPrice => decimal_to_f64(record.actual_price),
            Self::DiscountedPrice => decimal_to_f64(record.discounted_price),
            Self::DiscountPercentage => f64::from(record.discount_percentage),
            Self::Rating => decimal_to_f64(record.rating),
            Self::RatingCount => f64::from(record.rating_count),
        }
    }

    /// The column's values across a selection, in selection order.
    pub fn values(self, selection: &Selection<'_>) -> Vec<f64> {
        selection.iter().map(|record| self.value(record)).collect()
    }
}

/// Descriptive statistics of a non-empty column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Arithmetic mean
    pub mean: f64,

    /// Sample standard deviation; absent for a single value
    pub std: Option<f64>,

    /// Smallest value
    pub min: f64,

    /// 25th percentile
    pub q1: f64,

    /// Median
    pub median: f64,

    /// 75th percentile
    pub q3: f64,

    /// Largest value
    pub max: f64,
}

/// Statistics for one column of a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    /// Column described
    pub column: NumericColumn,

    /// Number of values
    pub count: usize,

    /// Statistics; absent when `count` is zero
    pub summary: Option<Summary>,
}

/// Describe every numeric column of a selection.
pub fn describe(selection: &Selection<'_>) -> Vec<ColumnSummary> {
    NumericColumn::ALL
        .iter()
        .map(|&column| {
            let values = column.values(selection);

            ColumnSummary {
                column,
                count: values.len(),
                summary: summarize(&values),
            }
        })
        .collect()
}

/// Summarize a set of values, or `None` if there are none.
pub fn summarize(values: &[f64]) -> Option<Summary> {
    let mut sorted = values.to_vec();

    sorted.sort_by(f64::total_cmp);

    let n = as_f64(sorted.len());
    let mean = sorted.iter().sum::<f64>() / n;

    let std = (sorted.len() > 1).then(|| {
        let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();

        (squares / (n - 1.0)).sqrt()
    });

    Some(Summary {
        mean,
        std,
        min: *sorted.first()?,
        q1: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q3: quantile(&sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

/// Linearly interpolated quantile of ascending `sorted` values.
///
/// Returns `None` for an empty slice or a `q` outside `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }

    let position = q * as_f64(sorted.len().checked_sub(1)?);
    let lower_idx = floor_index(position);
    let lower = *sorted.get(lower_idx)?;
    let upper = sorted.get(lower_idx + 1).copied().unwrap_or(lower);

    Some(lower + (upper - lower) * (position - position.floor()))
}

/// Per-category means, rounded to two decimal places.
///
/// A mean is `None` when its column sum does not fit in a [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMeans {
    /// Category name
    pub category: String,

    /// Number of rows in the category
    pub count: usize,

    /// Mean discounted price
    pub avg_price: Option<Decimal>,

    /// Mean rating
    pub avg_rating: Option<Decimal>,

    /// Mean rating count
    pub avg_reviews: Option<Decimal>,
}

struct MeanAccumulator {
    count: usize,
    price: Option<Decimal>,
    rating: Option<Decimal>,
    reviews: Option<Decimal>,
}

impl Default for MeanAccumulator {
    fn default() -> Self {
        Self {
            count: 0,
            price: Some(Decimal::ZERO),
            rating: Some(Decimal::ZERO),
            reviews: Some(Decimal::ZERO),
        }
    }
}

impl MeanAccumulator {
    fn push(&mut self, record: &ProductRecord) {
        self.count += 1;
        self.price = self.price.and_then(|sum| sum.checked_add(record.discounted_price));
        self.rating = self.rating.and_then(|sum| sum.checked_add(record.rating));
        self.reviews = self
            .reviews
            .and_then(|sum| sum.checked_add(Decimal::from(record.rating_count)));
    }

    fn mean(sum: Option<Decimal>, count: Decimal) -> Option<Decimal> {
        sum?.checked_div(count).map(|mean| mean.round_dp(PRICE_DP))
    }
}

/// Means of discounted price, rating and rating count for each category, ordered by name.
pub fn category_means(selection: &Selection<'_>) -> Vec<CategoryMeans> {
    let mut groups: FxHashMap<&str, MeanAccumulator> = FxHashMap::default();

    for record in selection.iter() {
        groups
            .entry(record.category.as_str())
            .or_default()
            .push(record);
    }

    let mut means: Vec<CategoryMeans> = groups
        .into_iter()
        .map(|(category, acc)| {
            let count = Decimal::from(acc.count);

            CategoryMeans {
                category: category.to_string(),
                count: acc.count,
                avg_price: MeanAccumulator::mean(acc.price, count),
                avg_rating: MeanAccumulator::mean(acc.rating, count),
                avg_reviews: MeanAccumulator::mean(acc.reviews, count),
            }
        })
        .collect();

    means.sort_by(|a, b| a.category.cmp(&b.category));
    means
}

/// Number of rows in a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    /// Category name
    pub category: String,

    /// Rows in the category
    pub count: usize,
}

/// Rows per category, most common first, ties broken by name.
pub fn category_counts(selection: &Selection<'_>) -> Vec<CategoryCount> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();

    for record in selection.iter() {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }

    let mut counts: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    counts
}

/// The `k` most reviewed rows, ties kept in selection order.
pub fn top_by_rating_count<'a>(
    selection: &Selection<'a>,
    k: usize,
) -> SmallVec<[&'a ProductRecord; 10]> {
    let mut rows = selection.rows().to_vec();

    rows.sort_by(|a, b| b.rating_count.cmp(&a.rating_count));
    rows.into_iter().take(k).collect()
}

/// Count of empty values per column, in table order.
///
/// Numeric columns are typed and can never be empty; text columns count blank strings.
pub fn missing_values(selection: &Selection<'_>) -> [(&'static str, usize); 8] {
    let blank_names = selection
        .iter()
        .filter(|r| r.product_name.trim().is_empty())
        .count();

    let blank_categories = selection
        .iter()
        .filter(|r| r.category.trim().is_empty())
        .count();

    [
        ("product_id", 0),
        ("product_name", blank_names),
        ("category", blank_categories),
        ("actual_price", 0),
        ("discounted_price", 0),
        ("discount_percentage", 0),
        ("rating", 0),
        ("rating_count", 0),
    ]
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges
    pub edges: Vec<f64>,

    /// Values per bin; the final bin is closed on the right
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Total number of values counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterate `(lower edge, upper edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .filter_map(|(edge, &count)| Some((*edge.first()?, *edge.last()?, count)))
    }
}

/// Bin values into `bins` equal-width bins spanning their minimum and maximum.
///
/// With no values the range is `[0, 1]`; when every value is equal the range is widened by one
/// half either side.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if bins == 0 {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let min = values.iter().copied().reduce(f64::min);
    let max = values.iter().copied().reduce(f64::max);

    let (lower, upper) = match (min, max) {
        (Some(min), Some(max)) if min < max => (min, max),
        (Some(min), Some(max)) => (min - 0.5, max + 0.5),
        _ => (0.0, 1.0),
    };

    let width = (upper - lower) / as_f64(bins);
    let edges: Vec<f64> = (0..=bins).map(|idx| lower + width * as_f64(idx)).collect();
    let mut counts = vec![0; bins];

    for idx in values.iter().filter_map(|&value| bin_index(&edges, value)) {
        if let Some(count) = counts.get_mut(idx) {
            *count += 1;
        }
    }

    Histogram { edges, counts }
}

/// Discounted price against rating, binned on both axes, with the mean rating count per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRatingGrid {
    /// Discounted price bin edges
    pub price_edges: Vec<f64>,

    /// Rating bin edges
    pub rating_edges: Vec<f64>,

    /// Rows per cell, indexed `[price bin][rating bin]`
    pub counts: Vec<Vec<usize>>,

    /// Mean rating count per cell, `None` for an empty cell
    pub mean_rating_counts: Vec<Vec<Option<f64>>>,
}

impl PriceRatingGrid {
    /// Total number of rows placed in the grid.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Bin a selection by discounted price and rating and average `rating_count` in each cell.
///
/// Bin edges follow [`histogram`].
pub fn price_rating_grid(
    selection: &Selection<'_>,
    price_bins: usize,
    rating_bins: usize,
) -> PriceRatingGrid {
    let prices = histogram(&NumericColumn::DiscountedPrice.values(selection), price_bins).edges;
    let ratings = histogram(&NumericColumn::Rating.values(selection), rating_bins).edges;

    let mut counts = vec![vec![0_usize; rating_bins]; price_bins];
    let mut sums = vec![vec![0.0_f64; rating_bins]; price_bins];

    for record in selection.iter() {
        let row = bin_index(&prices, NumericColumn::DiscountedPrice.value(record));
        let col = bin_index(&ratings, NumericColumn::Rating.value(record));

        let Some((row, col)) = row.zip(col) else {
            continue;
        };

        if let Some(count) = counts.get_mut(row).and_then(|r| r.get_mut(col)) {
            *count += 1;
        }

        if let Some(sum) = sums.get_mut(row).and_then(|r| r.get_mut(col)) {
            *sum += NumericColumn::RatingCount.value(record);
        }
    }

    let mean_rating_counts = counts
        .iter()
        .zip(&sums)
        .map(|(counts, sums)| {
            counts
                .iter()
                .zip(sums)
                .map(|(&count, &sum)| (count > 0).then(|| sum / as_f64(count)))
                .collect()
        })
        .collect();

    PriceRatingGrid {
        price_edges: prices,
        rating_edges: ratings,
        counts,
        mean_rating_counts,
    }
}

fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let bins = edges.len().checked_sub(1).filter(|&n| n > 0)?;
    let lower = *edges.first()?;
    let upper = *edges.last()?;
    let width = (upper - lower) / as_f64(bins);

    Some(floor_index((value - lower) / width).min(bins - 1))
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "row counts stay far below 2^52"
)]
fn as_f64(n: usize) -> f64 {
    n as f64
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "callers pass non-negative positions within a slice"
)]
fn floor_index(position: f64) -> usize {
    position.floor().max(0.0) as usize
}

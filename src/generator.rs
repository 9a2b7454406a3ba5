//! Generator
//!
//! Produces product records from a [`Catalog`] by drawing from a caller-supplied random stream.
//! Each record consumes exactly seven draws, always in this order: category, list price,
//! discount percentage, rating, rating count, adjective, product type. Two generators fed the
//! same stream state therefore emit the same records.

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::{
    catalog::{Catalog, CatalogError},
    prices::{MAX_DISCOUNT_PERCENT, apply_discount, round_price, round_rating},
    products::{ProductId, ProductRecord},
};

/// Default number of records.
pub const DEFAULT_COUNT: usize = 1000;

/// Default seed for the random stream.
pub const DEFAULT_SEED: u64 = 42;

/// Exclusive upper bound on `rating_count`.
pub const RATING_COUNT_LIMIT: u32 = 10_000;

/// Lowest possible rating.
pub const MIN_RATING: f64 = 1.0;

/// Highest possible rating.
pub const MAX_RATING: f64 = 5.0;

/// Seedable random stream used for generation.
pub type RandomStream = ChaCha8Rng;

/// Errors raised before or during generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Zero records were requested.
    #[error("record count must be positive")]
    EmptyCount,

    /// More records were requested than product ids can number.
    #[error("record count {0} exceeds the product id range")]
    CountTooLarge(usize),

    /// The catalog cannot produce records.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A sampled value could not be represented as a decimal.
    #[error("sampled {field} {value} is not representable")]
    Unrepresentable {
        /// Field being sampled
        field: &'static str,

        /// The raw draw
        value: f64,
    },
}

/// Create the random stream for a seed.
pub fn random_stream(seed: u64) -> RandomStream {
    RandomStream::seed_from_u64(seed)
}

/// How many records to generate, and from which seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of records
    pub count: usize,

    /// Seed for the random stream
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

/// Generate records from a fresh stream seeded by `config.seed`.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_seeded(
    catalog: &Catalog,
    config: GeneratorConfig,
) -> Result<Vec<ProductRecord>, GenerateError> {
    info!(
        count = config.count,
        seed = config.seed,
        "generating product records"
    );

    let mut rng = random_stream(config.seed);

    generate(catalog, config.count, &mut rng)
}

/// Generate `count` records, numbered from `P0001`, drawing from `rng`.
///
/// # Errors
///
/// Returns an error, before drawing anything, if `count` is zero or too large, or if the catalog
/// is invalid.
pub fn generate<R: Rng>(
    catalog: &Catalog,
    count: usize,
    rng: &mut R,
) -> Result<Vec<ProductRecord>, GenerateError> {
    if count == 0 {
        return Err(GenerateError::EmptyCount);
    }

    let last = u32::try_from(count).map_err(|_err| GenerateError::CountTooLarge(count))?;

    catalog.validate()?;

    let mut records = Vec::with_capacity(count);

    for sequence in 1..=last {
        let id = ProductId::new(sequence).ok_or(GenerateError::CountTooLarge(count))?;
        let record = draw_record(catalog, id, rng)?;

        trace!(id = %record.product_id, category = %record.category, "generated record");

        records.push(record);
    }

    debug!(records = records.len(), "generation complete");

    Ok(records)
}

fn draw_record<R: Rng>(
    catalog: &Catalog,
    product_id: ProductId,
    rng: &mut R,
) -> Result<ProductRecord, GenerateError> {
    let category = catalog
        .categories()
        .choose(rng)
        .ok_or(CatalogError::NoCategories)?;

    let raw_price = rng.gen_range(category.price.min..category.price.max);
    let actual_price = round_price(raw_price).ok_or(GenerateError::Unrepresentable {
        field: "actual_price",
        value: raw_price,
    })?;

    let discount_percentage = rng.gen_range(0..=MAX_DISCOUNT_PERCENT);
    let discounted_price = apply_discount(actual_price, discount_percentage);

    let raw_rating = rng.gen_range(MIN_RATING..=MAX_RATING);
    let rating = round_rating(raw_rating).ok_or(GenerateError::Unrepresentable {
        field: "rating",
        value: raw_rating,
    })?;

    let rating_count = rng.gen_range(0..RATING_COUNT_LIMIT);

    let adjective = catalog
        .adjectives()
        .choose(rng)
        .ok_or(CatalogError::NoAdjectives)?;

    let product_type = category
        .product_types
        .choose(rng)
        .ok_or_else(|| CatalogError::NoProductTypes(category.name.clone()))?;

    Ok(ProductRecord {
        product_id,
        product_name: format!("{adjective} {product_type}"),
        category: category.name.clone(),
        actual_price,
        discounted_price,
        discount_percentage,
        rating,
        rating_count,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::prices::PRICE_DP;

    use super::*;

    fn storefront_records() -> Result<Vec<ProductRecord>, GenerateError> {
        generate_seeded(&Catalog::storefront(), GeneratorConfig::default())
    }

    #[test]
    fn default_config() {
        assert_eq!(
            GeneratorConfig::default(),
            GeneratorConfig {
                count: 1000,
                seed: 42
            }
        );
    }

    #[test]
    fn generates_requested_count() -> TestResult {
        let records = storefront_records()?;

        assert_eq!(records.len(), 1000);

        Ok(())
    }

    #[test]
    fn same_seed_same_records() -> TestResult {
        let config = GeneratorConfig {
            count: 250,
            seed: 7,
        };

        let first = generate_seeded(&Catalog::storefront(), config)?;
        let second = generate_seeded(&Catalog::storefront(), config)?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn different_seeds_diverge() -> TestResult {
        let catalog = Catalog::storefront();
        let first = generate_seeded(&catalog, GeneratorConfig { count: 50, seed: 1 })?;
        let second = generate_seeded(&catalog, GeneratorConfig { count: 50, seed: 2 })?;

        assert_ne!(first, second);

        Ok(())
    }

    #[test]
    fn ids_are_sequential_from_one() -> TestResult {
        let records = storefront_records()?;

        for (idx, record) in records.iter().enumerate() {
            assert_eq!(record.product_id.to_string(), format!("P{:04}", idx + 1));
        }

        assert_eq!(
            records.last().map(|r| r.product_id.to_string()),
            Some("P1000".to_string())
        );

        Ok(())
    }

    #[test]
    fn discount_fields_are_consistent() -> TestResult {
        for record in storefront_records()? {
            let fraction = Decimal::from(record.discount_percentage) / Decimal::ONE_HUNDRED;
            let expected = (record.actual_price * (Decimal::ONE - fraction)).round_dp(PRICE_DP);

            assert!(record.discount_percentage <= MAX_DISCOUNT_PERCENT);
            assert_eq!(record.discounted_price, expected, "{}", record.product_id);
            assert!(record.discounted_price <= record.actual_price);
        }

        Ok(())
    }

    #[test]
    fn ratings_and_counts_in_range() -> TestResult {
        let lowest = Decimal::ONE;
        let highest = Decimal::from(5);

        for record in storefront_records()? {
            assert!(
                (lowest..=highest).contains(&record.rating),
                "{} rating {}",
                record.product_id,
                record.rating
            );
            assert!(record.rating_count < RATING_COUNT_LIMIT);
        }

        Ok(())
    }

    #[test]
    fn prices_respect_category_bounds() -> TestResult {
        let catalog = Catalog::storefront();

        for record in storefront_records()? {
            let category = catalog
                .category(&record.category)
                .ok_or("record category missing from catalog")?;

            let min = Decimal::try_from(category.price.min)?;
            let max = Decimal::try_from(category.price.max)?;

            assert!(
                (min..=max).contains(&record.actual_price),
                "{} priced {} outside [{min}, {max}]",
                record.product_id,
                record.actual_price
            );
        }

        Ok(())
    }

    #[test]
    fn names_combine_adjective_and_category_type() -> TestResult {
        let catalog = Catalog::storefront();

        for record in storefront_records()? {
            let category = catalog
                .category(&record.category)
                .ok_or("record category missing from catalog")?;

            let matched = catalog.adjectives().iter().any(|adjective| {
                record
                    .product_name
                    .strip_prefix(adjective.as_str())
                    .and_then(|rest| rest.strip_prefix(' '))
                    .is_some_and(|noun| category.product_types.iter().any(|t| t == noun))
            });

            assert!(matched, "unexpected product name {:?}", record.product_name);
        }

        Ok(())
    }

    #[test]
    fn draws_follow_documented_order() -> TestResult {
        let catalog = Catalog::storefront();
        let records = generate(&catalog, 1, &mut random_stream(99))?;
        let record = records.first().ok_or("no record generated")?;

        let mut rng = random_stream(99);
        let category = catalog.categories().choose(&mut rng).ok_or("no category")?;
        let price = round_price(rng.gen_range(category.price.min..category.price.max));
        let discount = rng.gen_range(0..=MAX_DISCOUNT_PERCENT);
        let rating = round_rating(rng.gen_range(MIN_RATING..=MAX_RATING));
        let rating_count = rng.gen_range(0..RATING_COUNT_LIMIT);
        let adjective = catalog.adjectives().choose(&mut rng).ok_or("no adjective")?;
        let noun = category.product_types.choose(&mut rng).ok_or("no type")?;

        assert_eq!(record.category, category.name);
        assert_eq!(Some(record.actual_price), price);
        assert_eq!(record.discount_percentage, discount);
        assert_eq!(Some(record.rating), rating);
        assert_eq!(record.rating_count, rating_count);
        assert_eq!(record.product_name, format!("{adjective} {noun}"));

        Ok(())
    }

    #[test]
    fn continues_an_existing_stream() -> TestResult {
        let catalog = Catalog::storefront();
        let mut rng = random_stream(3);

        let first = generate(&catalog, 5, &mut rng)?;
        let second = generate(&catalog, 5, &mut rng)?;

        assert_ne!(first, second);
        assert_eq!(
            second.first().map(|r| r.product_id.to_string()),
            Some("P0001".to_string())
        );

        Ok(())
    }

    #[test]
    fn zero_count_fails_fast() {
        let result = generate(&Catalog::storefront(), 0, &mut random_stream(1));

        assert!(matches!(result, Err(GenerateError::EmptyCount)));
    }
}

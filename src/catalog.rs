//! Catalog
//!
//! The category catalog drives generation: each category has a price band and a list of product
//! type nouns, and a shared pool of adjectives names the products. Categories keep their
//! declaration order, which is the order uniform category draws index into.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

/// Largest list price a category may declare.
pub const MAX_LIST_PRICE: f64 = 1e12;

/// Catalog validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The catalog has no categories.
    #[error("catalog has no categories")]
    NoCategories,

    /// The adjective pool is empty.
    #[error("catalog has no adjectives")]
    NoAdjectives,

    /// The same category name is declared twice.
    #[error("category {0:?} is declared more than once")]
    DuplicateCategory(String),

    /// A category has no admissible product types.
    #[error("category {0:?} has no product types")]
    NoProductTypes(String),

    /// A category's price band is empty, negative or not finite.
    #[error("category {category:?} has invalid price bounds [{min}, {max}]")]
    InvalidPriceBounds {
        /// Category name
        category: String,

        /// Lower bound
        min: f64,

        /// Upper bound
        max: f64,
    },

    /// A category's upper price bound exceeds [`MAX_LIST_PRICE`].
    #[error("category {category:?} allows prices up to {max}, above the list price limit")]
    PriceTooLarge {
        /// Category name
        category: String,

        /// Upper bound
        max: f64,
    },
}

/// Price band a category's list prices are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PriceBounds {
    /// Lowest list price
    pub min: f64,

    /// Highest list price
    pub max: f64,
}

impl PriceBounds {
    /// Create a new price band.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min < self.max
    }
}

/// A single category in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    /// Category name
    pub name: String,

    /// List price band
    pub price: PriceBounds,

    /// Admissible product type nouns
    pub product_types: Vec<String>,
}

impl Category {
    /// Create a new category.
    pub fn new(name: impl Into<String>, price: PriceBounds, product_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            price,
            product_types: product_types.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Validated category catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    adjectives: Vec<String>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Create a catalog, validating every category.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog could not produce a well-formed record.
    pub fn new(adjectives: Vec<String>, categories: Vec<Category>) -> Result<Self, CatalogError> {
        let catalog = Self {
            adjectives,
            categories,
        };

        catalog.validate()?;

        Ok(catalog)
    }

    /// The storefront catalog: seven categories, five product types each, ten adjectives.
    pub fn storefront() -> Self {
        let categories = vec![
            Category::new(
                "Electronics",
                PriceBounds::new(100.0, 2000.0),
                &["Laptop", "Smartphone", "Headphones", "Tablet", "Camera"],
            ),
            Category::new(
                "Books",
                PriceBounds::new(5.0, 50.0),
                &["Novel", "Cookbook", "Biography", "Guide", "Textbook"],
            ),
            Category::new(
                "Clothing",
                PriceBounds::new(10.0, 150.0),
                &["T-Shirt", "Jeans", "Jacket", "Sweater", "Dress"],
            ),
            Category::new(
                "Home & Kitchen",
                PriceBounds::new(15.0, 300.0),
                &["Blender", "Toaster", "Pillow", "Pan", "Lamp"],
            ),
            Category::new(
                "Sports",
                PriceBounds::new(20.0, 500.0),
                &["Yoga Mat", "Dumbbell", "Bicycle", "Tent", "Soccer Ball"],
            ),
            Category::new(
                "Toys",
                PriceBounds::new(5.0, 100.0),
                &["Action Figure", "Board Game", "Puzzle", "Doll", "Car"],
            ),
            Category::new(
                "Beauty",
                PriceBounds::new(8.0, 80.0),
                &["Shampoo", "Moisturizer", "Lipstick", "Perfume", "Face Wash"],
            ),
        ];

        let adjectives = [
            "Amazing",
            "Premium",
            "Eco-friendly",
            "Compact",
            "Advanced",
            "Stylish",
            "Durable",
            "Affordable",
            "Lightweight",
            "Ergonomic",
        ]
        .map(String::from)
        .to_vec();

        Self {
            adjectives,
            categories,
        }
    }

    /// Check the catalog can produce well-formed records.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::NoCategories);
        }

        if self.adjectives.is_empty() {
            return Err(CatalogError::NoAdjectives);
        }

        let mut seen = FxHashSet::default();

        for category in &self.categories {
            if !seen.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }

            if category.product_types.is_empty() {
                return Err(CatalogError::NoProductTypes(category.name.clone()));
            }

            if !category.price.is_valid() {
                return Err(CatalogError::InvalidPriceBounds {
                    category: category.name.clone(),
                    min: category.price.min,
                    max: category.price.max,
                });
            }

            if category.price.max > MAX_LIST_PRICE {
                return Err(CatalogError::PriceTooLarge {
                    category: category.name.clone(),
                    max: category.price.max,
                });
            }
        }

        Ok(())
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Adjective pool.
    pub fn adjectives(&self) -> &[String] {
        &self.adjectives
    }

    /// Lookup a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Whether `name` is one of the catalog's categories.
    pub fn contains(&self, name: &str) -> bool {
        self.category(name).is_some()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::storefront()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjectives() -> Vec<String> {
        vec!["Shiny".to_string()]
    }

    #[test]
    fn storefront_catalog_is_valid() {
        let catalog = Catalog::storefront();

        assert_eq!(catalog.validate(), Ok(()));
        assert_eq!(catalog.categories().len(), 7);
        assert_eq!(catalog.adjectives().len(), 10);
        assert!(
            catalog
                .categories()
                .iter()
                .all(|category| category.product_types.len() == 5),
            "every storefront category has five product types"
        );
    }

    #[test]
    fn storefront_catalog_keeps_declaration_order() {
        let catalog = Catalog::storefront();
        let names: Vec<&str> = catalog
            .categories()
            .iter()
            .map(|category| category.name.as_str())
            .collect();

        assert_eq!(
            names,
            [
                "Electronics",
                "Books",
                "Clothing",
                "Home & Kitchen",
                "Sports",
                "Toys",
                "Beauty"
            ]
        );
    }

    #[test]
    fn category_lookup() {
        let catalog = Catalog::storefront();

        assert_eq!(
            catalog.category("Books").map(|c| c.price),
            Some(PriceBounds::new(5.0, 50.0))
        );
        assert!(!catalog.contains("Groceries"));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(
            Catalog::new(adjectives(), Vec::new()),
            Err(CatalogError::NoCategories)
        );
    }

    #[test]
    fn rejects_empty_adjectives() {
        let categories = vec![Category::new("Books", PriceBounds::new(5.0, 50.0), &["Novel"])];

        assert_eq!(
            Catalog::new(Vec::new(), categories),
            Err(CatalogError::NoAdjectives)
        );
    }

    #[test]
    fn rejects_category_without_product_types() {
        let categories = vec![Category::new("Books", PriceBounds::new(5.0, 50.0), &[])];

        assert_eq!(
            Catalog::new(adjectives(), categories),
            Err(CatalogError::NoProductTypes("Books".to_string()))
        );
    }

    #[test]
    fn rejects_duplicate_categories() {
        let categories = vec![
            Category::new("Books", PriceBounds::new(5.0, 50.0), &["Novel"]),
            Category::new("Books", PriceBounds::new(1.0, 2.0), &["Guide"]),
        ];

        assert_eq!(
            Catalog::new(adjectives(), categories),
            Err(CatalogError::DuplicateCategory("Books".to_string()))
        );
    }

    #[test]
    fn rejects_invalid_price_bounds() {
        for bounds in [
            PriceBounds::new(50.0, 5.0),
            PriceBounds::new(5.0, 5.0),
            PriceBounds::new(-1.0, 5.0),
            PriceBounds::new(0.0, f64::INFINITY),
            PriceBounds::new(f64::NAN, 5.0),
        ] {
            let categories = vec![Category::new("Books", bounds, &["Novel"])];

            assert!(
                matches!(
                    Catalog::new(adjectives(), categories),
                    Err(CatalogError::InvalidPriceBounds { .. })
                ),
                "{bounds:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_prices_beyond_limit() {
        let categories = vec![Category::new("Yachts", PriceBounds::new(1.0, 1e30), &["Yacht"])];

        assert_eq!(
            Catalog::new(adjectives(), categories),
            Err(CatalogError::PriceTooLarge {
                category: "Yachts".to_string(),
                max: 1e30,
            })
        );

        let at_limit = vec![Category::new(
            "Yachts",
            PriceBounds::new(1.0, MAX_LIST_PRICE),
            &["Yacht"],
        )];

        assert!(Catalog::new(adjectives(), at_limit).is_ok());
    }
}

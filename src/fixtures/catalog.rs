//! Catalog Fixtures

use serde::Deserialize;

use crate::{
    catalog::{Catalog, Category},
    fixtures::FixtureError,
};

/// Catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Adjectives used to name products
    pub adjectives: Vec<String>,

    /// Categories, in draw order
    pub categories: Vec<Category>,
}

impl TryFrom<CatalogFixture> for Catalog {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        Ok(Catalog::new(fixture.adjectives, fixture.categories)?)
    }
}

/// Parse a catalog from YAML text.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or the catalog fails validation.
pub fn parse_catalog(contents: &str) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    fixture.try_into()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::{CatalogError, PriceBounds};

    use super::*;

    #[test]
    fn parse_catalog_keeps_category_order() -> TestResult {
        let catalog = parse_catalog(
            "
adjectives: [Bold]
categories:
  - name: Toys
    price: { min: 5, max: 100 }
    product_types: [Puzzle]
  - name: Books
    price: { min: 5.5, max: 50 }
    product_types: [Novel, Guide]
",
        )?;

        let names: Vec<&str> = catalog
            .categories()
            .iter()
            .map(|category| category.name.as_str())
            .collect();

        assert_eq!(names, ["Toys", "Books"]);
        assert_eq!(
            catalog.category("Books").map(|c| c.price),
            Some(PriceBounds::new(5.5, 50.0))
        );

        Ok(())
    }

    #[test]
    fn parse_catalog_rejects_invalid_catalog() {
        let result = parse_catalog(
            "
adjectives: [Bold]
categories:
  - name: Toys
    price: { min: 5, max: 100 }
    product_types: []
",
        );

        assert!(matches!(
            result,
            Err(FixtureError::Catalog(CatalogError::NoProductTypes(name))) if name == "Toys"
        ));
    }

    #[test]
    fn parse_catalog_rejects_oversized_price_band() {
        let result = parse_catalog(
            "
adjectives: [Bold]
categories:
  - name: Toys
    price: { min: 5, max: 1.0e30 }
    product_types: [Puzzle]
",
        );

        assert!(matches!(
            result,
            Err(FixtureError::Catalog(CatalogError::PriceTooLarge { category, .. })) if category == "Toys"
        ));
    }

    #[test]
    fn parse_catalog_rejects_missing_fields() {
        let result = parse_catalog("adjectives: [Bold]\n");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));
    }
}

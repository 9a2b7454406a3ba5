//! Shopfront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, Category, PriceBounds},
    filters::{Filter, Selection, full_rating_range},
    fixtures::{Fixture, FixtureError, load_catalog_file},
    generator::{
        GenerateError, GeneratorConfig, RandomStream, generate, generate_seeded, random_stream,
    },
    products::{ProductId, ProductRecord},
    report::{Report, ReportError, ReportOptions},
    stats::{
        CategoryCount, CategoryMeans, ColumnSummary, Histogram, NumericColumn, PriceRatingGrid,
        Summary, category_counts, category_means, describe, histogram, price_rating_grid,
        top_by_rating_count,
    },
    table::{COLUMNS, ProductTable, TableError, write_records, write_table},
};

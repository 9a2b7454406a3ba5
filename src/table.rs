//! Table
//!
//! The flat, comma-separated product table shared by the generator and the view: UTF-8, one
//! header row, no index column, columns in [`COLUMNS`] order.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::products::ProductRecord;

/// Default output path for the generated table.
pub const DEFAULT_TABLE_PATH: &str = "amazon_products.csv";

/// Column names, in table order.
pub const COLUMNS: [&str; 8] = [
    "product_id",
    "product_name",
    "category",
    "actual_price",
    "discounted_price",
    "discount_percentage",
    "rating",
    "rating_count",
];

/// Errors writing or loading a product table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be opened, written or renamed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted
        action: &'static str,

        /// File involved
        path: PathBuf,

        /// Underlying IO error
        source: io::Error,
    },

    /// CSV encoding or decoding failed.
    #[error("malformed product table: {0}")]
    Csv(#[from] csv::Error),

    /// The header row does not match the product schema.
    #[error("unexpected columns {found:?}, expected {expected:?}")]
    Schema {
        /// Expected header
        expected: Vec<String>,

        /// Header found in the file
        found: Vec<String>,
    },

    /// A text field is empty.
    #[error("row {row} is missing a value for {column}")]
    MissingValue {
        /// 1-based data row
        row: usize,

        /// Column name
        column: &'static str,
    },
}

/// Write records as a CSV table to any writer.
///
/// The header is written even when `records` is empty.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_records<W: io::Write>(writer: W, records: &[ProductRecord]) -> Result<(), TableError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(COLUMNS)?;

    for record in records {
        out.serialize(record)?;
    }

    out.flush().map_err(csv::Error::from)?;

    Ok(())
}

/// Write records to `path`, replacing any existing file only once the whole table is written.
///
/// # Errors
///
/// Returns an error if the table cannot be written; the target path is left untouched.
pub fn write_table(path: &Path, records: &[ProductRecord]) -> Result<(), TableError> {
    let staging = staging_path(path);

    let result = File::create(&staging)
        .map_err(|source| TableError::Io {
            action: "failed to create",
            path: staging.clone(),
            source,
        })
        .and_then(|file| write_records(io::BufWriter::new(file), records))
        .and_then(|()| {
            fs::rename(&staging, path).map_err(|source| TableError::Io {
                action: "failed to move table into place at",
                path: path.to_path_buf(),
                source,
            })
        });

    if result.is_err()
        && staging.exists()
        && let Err(err) = fs::remove_file(&staging)
    {
        warn!(path = %staging.display(), error = %err, "failed to remove staging file");
    }

    result?;

    info!(path = %path.display(), rows = records.len(), "wrote product table");

    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();

    name.push(".partial");

    path.with_file_name(name)
}

/// An immutable, loaded product table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductTable {
    records: Vec<ProductRecord>,
}

impl ProductTable {
    /// Wrap already-generated records.
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    /// Load a table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, does not carry the product columns, or any row
    /// is malformed or incomplete.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|source| TableError::Io {
            action: "failed to open",
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(io::BufReader::new(file))?;

        info!(path = %path.display(), rows = table.len(), "loaded product table");

        Ok(table)
    }

    /// Load a table from any CSV reader.
    ///
    /// # Errors
    ///
    /// See [`ProductTable::from_path`].
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, TableError> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let found: Vec<String> = rows.headers()?.iter().map(str::to_string).collect();

        if found.iter().map(String::as_str).ne(COLUMNS) {
            return Err(TableError::Schema {
                expected: COLUMNS.map(String::from).to_vec(),
                found,
            });
        }

        let mut records = Vec::new();

        for (idx, row) in rows.deserialize::<ProductRecord>().enumerate() {
            let record = row?;
            let row = idx + 1;

            if record.product_name.trim().is_empty() {
                return Err(TableError::MissingValue {
                    row,
                    column: "product_name",
                });
            }

            if record.category.trim().is_empty() {
                return Err(TableError::MissingValue {
                    row,
                    column: "category",
                });
            }

            records.push(record);
        }

        Ok(Self { records })
    }

    /// All records, in table order.
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();

        for record in &self.records {
            if !seen.contains(&record.category.as_str()) {
                seen.push(record.category.as_str());
            }
        }

        seen
    }

    /// Lowest and highest discounted price, or `None` for an empty table.
    pub fn discounted_price_range(&self) -> Option<(Decimal, Decimal)> {
        let min = self.records.iter().map(|r| r.discounted_price).min()?;
        let max = self.records.iter().map(|r| r.discounted_price).max()?;

        Some((min, max))
    }
}

impl From<Vec<ProductRecord>> for ProductTable {
    fn from(records: Vec<ProductRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use testresult::TestResult;

    use crate::{
        catalog::Catalog,
        generator::{GeneratorConfig, generate_seeded},
    };

    use super::*;

    const HEADER: &str = "product_id,product_name,category,actual_price,discounted_price,discount_percentage,rating,rating_count";

    fn sample(count: usize) -> Result<Vec<ProductRecord>, crate::generator::GenerateError> {
        generate_seeded(&Catalog::storefront(), GeneratorConfig { count, seed: 42 })
    }

    #[test]
    fn header_matches_columns() {
        assert_eq!(COLUMNS.join(","), HEADER);
    }

    #[test]
    fn writes_header_for_empty_table() -> TestResult {
        let mut out = Vec::new();

        write_records(&mut out, &[])?;

        assert_eq!(String::from_utf8(out)?, format!("{HEADER}\n"));

        Ok(())
    }

    #[test]
    fn writes_fixed_decimal_places() -> TestResult {
        let records = sample(3)?;
        let mut out = Vec::new();

        write_records(&mut out, &records)?;

        let text = String::from_utf8(out)?;
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some(HEADER));

        for (line, record) in lines.zip(&records) {
            assert!(line.starts_with(&format!("{},", record.product_id)));
            assert_eq!(line.split(',').count(), 8, "{line}");

            let fields: Vec<&str> = line.rsplitn(6, ',').collect();
            let rating = fields.get(1).ok_or("missing rating")?;
            let discounted = fields.get(3).ok_or("missing discounted price")?;

            assert_eq!(rating.split_once('.').map(|(_, dp)| dp.len()), Some(1));
            assert_eq!(discounted.split_once('.').map(|(_, dp)| dp.len()), Some(2));
        }

        Ok(())
    }

    #[test]
    fn reads_back_written_records() -> TestResult {
        let records = sample(20)?;
        let mut out = Vec::new();

        write_records(&mut out, &records)?;

        let table = ProductTable::from_reader(Cursor::new(out))?;

        assert_eq!(table.records(), records.as_slice());

        Ok(())
    }

    #[test]
    fn quotes_names_containing_commas() -> TestResult {
        let mut records = sample(1)?;

        if let Some(record) = records.first_mut() {
            record.product_name = "Compact, Durable Lamp".to_string();
        }

        let mut out = Vec::new();

        write_records(&mut out, &records)?;

        let table = ProductTable::from_reader(Cursor::new(out))?;

        assert_eq!(
            table.records().first().map(|r| r.product_name.as_str()),
            Some("Compact, Durable Lamp")
        );

        Ok(())
    }

    #[test]
    fn rejects_wrong_columns() {
        let csv = "product_id,name\nP0001,Lamp\n";
        let result = ProductTable::from_reader(Cursor::new(csv));

        assert!(matches!(result, Err(TableError::Schema { .. })));
    }

    #[test]
    fn rejects_malformed_numbers() {
        let csv = format!("{HEADER}\nP0001,Amazing Lamp,Home & Kitchen,abc,1.00,0,4.0,10\n");
        let result = ProductTable::from_reader(Cursor::new(csv));

        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn rejects_missing_numbers() {
        let csv = format!("{HEADER}\nP0001,Amazing Lamp,Home & Kitchen,20.00,,0,4.0,10\n");
        let result = ProductTable::from_reader(Cursor::new(csv));

        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn rejects_missing_text() {
        let csv = format!("{HEADER}\nP0001,Amazing Lamp,Books,20.00,18.00,10,4.0,10\nP0002,,Books,20.00,18.00,10,4.0,10\n");
        let result = ProductTable::from_reader(Cursor::new(csv));

        assert!(matches!(
            result,
            Err(TableError::MissingValue {
                row: 2,
                column: "product_name"
            })
        ));
    }

    #[test]
    fn rejects_bad_product_id() {
        let csv = format!("{HEADER}\nX0001,Amazing Lamp,Books,20.00,18.00,10,4.0,10\n");
        let result = ProductTable::from_reader(Cursor::new(csv));

        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn missing_file_names_path() {
        let result = ProductTable::from_path(Path::new("does/not/exist.csv"));

        assert!(matches!(
            result,
            Err(TableError::Io { ref path, .. }) if path == Path::new("does/not/exist.csv")
        ));
    }

    #[test]
    fn write_table_replaces_target_atomically() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("products.csv");

        fs::write(&path, "stale")?;
        write_table(&path, &sample(10)?)?;

        assert_eq!(ProductTable::from_path(&path)?.len(), 10);
        assert!(!staging_path(&path).exists());

        Ok(())
    }

    #[test]
    fn write_table_leaves_nothing_on_failure() {
        let path = Path::new("does/not/exist/products.csv");
        let result = write_table(path, &[]);

        assert!(matches!(result, Err(TableError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn categories_in_first_appearance_order() -> TestResult {
        let table = ProductTable::new(sample(200)?);
        let categories = table.categories();
        let first = table.records().first().map(|r| r.category.as_str());

        assert_eq!(categories.first().copied(), first);
        assert_eq!(categories.len(), 7);

        Ok(())
    }

    #[test]
    fn discounted_price_range_covers_every_row() -> TestResult {
        let table = ProductTable::new(sample(100)?);
        let (min, max) = table.discounted_price_range().ok_or("empty table")?;

        assert!(
            table
                .records()
                .iter()
                .all(|r| (min..=max).contains(&r.discounted_price))
        );
        assert_eq!(ProductTable::default().discounted_price_range(), None);

        Ok(())
    }
}

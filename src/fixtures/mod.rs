//! Fixtures

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,

        /// Underlying IO error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The catalog parsed but is not usable
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a new fixture loader with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new fixture loader with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a named catalog from `catalogs/{name}.yml` under the base path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog, FixtureError> {
        let file_path = self
            .base_path
            .join("catalogs")
            .join(format!("{name}.yml"));

        load_catalog_file(&file_path)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a catalog from an explicit YAML file path
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_catalog_file(path: &Path) -> Result<Catalog, FixtureError> {
    let contents = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = catalog::parse_catalog(&contents)?;

    debug!(
        path = %path.display(),
        categories = catalog.categories().len(),
        "loaded catalog fixture"
    );

    Ok(catalog)
}

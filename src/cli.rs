//! Command line interface
//!
//! Running the binary with no subcommand generates the default table. `report` loads a table and
//! writes a filtered report to stdout.

use std::{io, path::PathBuf, time::Instant};

use clap::{Args, Parser, Subcommand};
use humanize_duration::{Truncate, prelude::DurationExt};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::Catalog,
    filters::Filter,
    fixtures::{FixtureError, load_catalog_file},
    generator::{DEFAULT_COUNT, DEFAULT_SEED, GenerateError, GeneratorConfig, generate_seeded},
    logging::LoggingArgs,
    report::{Report, ReportError, ReportOptions},
    table::{DEFAULT_TABLE_PATH, ProductTable, TableError, write_table},
};

/// Errors surfaced by the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Generation was misconfigured.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The table could not be written or loaded.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The report could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Shopfront command line
#[derive(Debug, Parser)]
#[command(
    name = "shopfront",
    about = "Synthetic product listings and a filtered report over them",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Subcommand; generates the table when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Generation settings used when no subcommand is given
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the product table
    Generate(GenerateArgs),

    /// Filter a product table and report on it
    Report(ReportArgs),
}

/// Generation settings
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Number of records
    #[arg(short = 'n', long, env = "SHOPFRONT_COUNT", default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Random seed
    #[arg(short, long, env = "SHOPFRONT_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output CSV path
    #[arg(short, long, env = "SHOPFRONT_OUTPUT", default_value = DEFAULT_TABLE_PATH)]
    pub output: PathBuf,

    /// YAML catalog fixture; the built-in storefront catalog when omitted
    #[arg(short, long, env = "SHOPFRONT_CATALOG")]
    pub catalog: Option<PathBuf>,
}

impl GenerateArgs {
    /// Generator configuration from these settings.
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            count: self.count,
            seed: self.seed,
        }
    }

    /// Load the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog fixture was given and cannot be loaded.
    pub fn load_catalog(&self) -> Result<Catalog, FixtureError> {
        self.catalog
            .as_deref()
            .map_or_else(|| Ok(Catalog::storefront()), load_catalog_file)
    }
}

/// Report settings
#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Input CSV path
    #[arg(short, long, env = "SHOPFRONT_INPUT", default_value = DEFAULT_TABLE_PATH)]
    pub input: PathBuf,

    /// Category to include; repeat for several, all categories when omitted
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Lowest discounted price
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest discounted price
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Lowest rating
    #[arg(long)]
    pub min_rating: Option<Decimal>,

    /// Highest rating
    #[arg(long)]
    pub max_rating: Option<Decimal>,

    /// Rows in the data preview
    #[arg(long, default_value_t = 100)]
    pub rows: usize,

    /// Rows in the most-reviewed table
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

impl ReportArgs {
    /// Build the filter for a table, starting from the dashboard's defaults.
    pub fn filter(&self, table: &ProductTable) -> Filter {
        let mut filter = Filter::unrestricted(table);

        if !self.categories.is_empty() {
            filter = filter.with_categories(self.categories.iter().cloned());
        }

        let price = filter.price_range().clone();
        let rating = filter.rating_range().clone();

        filter
            .with_price_range(
                self.min_price.unwrap_or(*price.start())..=self.max_price.unwrap_or(*price.end()),
            )
            .with_rating_range(
                self.min_rating.unwrap_or(*rating.start())
                    ..=self.max_rating.unwrap_or(*rating.end()),
            )
    }

    /// Report options from these settings.
    pub fn options(&self) -> ReportOptions {
        ReportOptions {
            preview_rows: self.rows,
            top: self.top,
        }
    }
}

/// Run a parsed command line, writing program output to `out`.
///
/// # Errors
///
/// Returns the first error raised by the selected command.
pub fn run(cli: Cli, out: impl io::Write) -> Result<(), CliError> {
    match cli.command {
        Some(Command::Generate(args)) => run_generate(&args, out),
        Some(Command::Report(args)) => run_report(&args, out),
        None => run_generate(&cli.generate, out),
    }
}

/// Generate a table and write it to the configured path.
///
/// Nothing is written when the configuration is rejected.
///
/// # Errors
///
/// Returns an error if the catalog or count is invalid, or the table cannot be written.
pub fn run_generate(args: &GenerateArgs, mut out: impl io::Write) -> Result<(), CliError> {
    let start = Instant::now();
    let catalog = args.load_catalog()?;
    let records = generate_seeded(&catalog, args.config())?;

    write_table(&args.output, &records)?;

    let elapsed = start.elapsed();

    info!(
        rows = records.len(),
        elapsed = %elapsed.human(Truncate::Nano),
        "generation finished"
    );

    writeln!(
        out,
        "Synthetic product data saved to '{}'",
        args.output.display()
    )?;

    Ok(())
}

/// Load a table, apply the configured filter and write the report.
///
/// # Errors
///
/// Returns an error if the table is missing or malformed, or output cannot be written.
pub fn run_report(args: &ReportArgs, out: impl io::Write) -> Result<(), CliError> {
    let start = Instant::now();
    let table = ProductTable::from_path(&args.input)?;
    let filter = args.filter(&table);
    let report = Report::new(&table, &filter, args.options());

    report.write_to(out)?;

    info!(
        matched = report.selection().len(),
        elapsed = %start.elapsed().human(Truncate::Nano),
        "report finished"
    );

    Ok(())
}

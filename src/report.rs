//! Report
//!
//! Renders a filtered view of a product table as plain terminal tables: a data overview, the
//! distributions the dashboard charts, and summary statistics.

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::USD;
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    filters::{Filter, Selection},
    prices::to_money,
    products::ProductRecord,
    stats::{
        self, ColumnSummary, GRID_PRICE_BINS, GRID_RATING_BINS, Histogram, NumericColumn,
        PRICE_BINS, PriceRatingGrid, RATING_BINS, category_counts, category_means, describe,
        histogram, missing_values, price_rating_grid, top_by_rating_count,
    },
    table::{COLUMNS, ProductTable},
};

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Output could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// How much of the view to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Rows shown in the data preview
    pub preview_rows: usize,

    /// Rows shown in the most-reviewed table
    pub top: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            preview_rows: 100,
            top: 10,
        }
    }
}

/// A filtered view of a product table, ready to render.
#[derive(Debug)]
pub struct Report<'a> {
    selection: Selection<'a>,
    total_rows: usize,
    options: ReportOptions,
}

impl<'a> Report<'a> {
    /// Apply `filter` to `table` and prepare the report.
    pub fn new(table: &'a ProductTable, filter: &Filter, options: ReportOptions) -> Self {
        Self {
            selection: filter.apply(table),
            total_rows: table.len(),
            options,
        }
    }

    /// Rows that passed the filter.
    pub fn selection(&self) -> &Selection<'a> {
        &self.selection
    }

    /// Write every section of the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        writeln!(
            out,
            "Products after filter: {} of {}",
            self.selection.len(),
            self.total_rows
        )?;

        self.write_overview(&mut out)?;
        self.write_distributions(&mut out)?;
        self.write_summary(&mut out)?;

        Ok(())
    }

    fn write_overview(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let preview = self.selection.head(self.options.preview_rows);

        write_heading(out, "Data Overview")?;
        writeln!(out, "Raw data (first {} rows)", preview.len())?;
        writeln!(out, "{}", preview_table(preview))?;
        writeln!(
            out,
            "Shape: ({}, {})",
            self.selection.len(),
            COLUMNS.len()
        )?;

        let mut builder = Builder::default();

        builder.push_record(["Column", "Missing"]);

        for (column, missing) in missing_values(&self.selection) {
            builder.push_record([column.to_string(), missing.to_string()]);
        }

        writeln!(out, "{}", styled(builder.build(), 1))?;

        Ok(())
    }

    fn write_distributions(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        write_heading(out, "Distributions")?;

        let prices = NumericColumn::DiscountedPrice.values(&self.selection);
        let ratings = NumericColumn::Rating.values(&self.selection);

        writeln!(out, "Discounted price")?;
        writeln!(out, "{}", histogram_table(&histogram(&prices, PRICE_BINS)))?;

        writeln!(out, "Rating")?;
        writeln!(out, "{}", histogram_table(&histogram(&ratings, RATING_BINS)))?;

        let grid = price_rating_grid(&self.selection, GRID_PRICE_BINS, GRID_RATING_BINS);

        writeln!(out, "Price vs rating (mean rating count)")?;
        writeln!(out, "{}", grid_table(&grid))?;

        let mut builder = Builder::default();

        builder.push_record(["Category", "Count"]);

        for count in category_counts(&self.selection) {
            builder.push_record([count.category, count.count.to_string()]);
        }

        writeln!(out, "Products per category")?;
        writeln!(out, "{}", styled(builder.build(), 1))?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        write_heading(out, "Summary Statistics")?;
        writeln!(out, "{}", describe_table(&describe(&self.selection)))?;

        let mut builder = Builder::default();

        builder.push_record(["Category", "Avg Price", "Avg Rating", "Avg Reviews"]);

        for means in category_means(&self.selection) {
            builder.push_record([
                means.category,
                or_dash(means.avg_price),
                or_dash(means.avg_rating),
                or_dash(means.avg_reviews),
            ]);
        }

        writeln!(out, "Average metrics by category")?;
        writeln!(out, "{}", styled(builder.build(), 1))?;

        let mut builder = Builder::default();

        builder.push_record(["Product", "Category", "Rating", "Rating Count"]);

        for record in top_by_rating_count(&self.selection, self.options.top) {
            builder.push_record([
                record.product_name.clone(),
                record.category.clone(),
                record.rating.to_string(),
                record.rating_count.to_string(),
            ]);
        }

        writeln!(out, "Top {} most reviewed products", self.options.top)?;
        writeln!(out, "{}", styled(builder.build(), 2))?;

        Ok(())
    }
}

fn write_heading(out: &mut impl io::Write, title: &str) -> Result<(), ReportError> {
    writeln!(out, "\n== {title} ==")?;

    Ok(())
}

fn preview_table(rows: &[&ProductRecord]) -> Table {
    let mut builder = Builder::default();

    builder.push_record(COLUMNS);

    for record in rows {
        builder.push_record([
            record.product_id.to_string(),
            record.product_name.clone(),
            record.category.clone(),
            money(record.actual_price),
            money(record.discounted_price),
            format!("{}%", record.discount_percentage),
            record.rating.to_string(),
            record.rating_count.to_string(),
        ]);
    }

    styled(builder.build(), 3)
}

fn describe_table(summaries: &[ColumnSummary]) -> Table {
    let mut builder = Builder::default();
    let mut header = vec![String::new()];

    header.extend(summaries.iter().map(|s| s.column.name().to_string()));
    builder.push_record(header);

    let stat_rows: [(&str, fn(&stats::Summary) -> Option<f64>); 7] = [
        ("mean", |s| Some(s.mean)),
        ("std", |s| s.std),
        ("min", |s| Some(s.min)),
        ("25%", |s| Some(s.q1)),
        ("50%", |s| Some(s.median)),
        ("75%", |s| Some(s.q3)),
        ("max", |s| Some(s.max)),
    ];

    let mut count_row = vec!["count".to_string()];

    count_row.extend(summaries.iter().map(|s| s.count.to_string()));
    builder.push_record(count_row);

    for (label, stat) in stat_rows {
        let mut row = vec![label.to_string()];

        row.extend(summaries.iter().map(|s| {
            s.summary
                .as_ref()
                .and_then(stat)
                .map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
        }));

        builder.push_record(row);
    }

    styled(builder.build(), 1)
}

fn histogram_table(hist: &Histogram) -> Table {
    let mut builder = Builder::default();
    let peak = hist.counts.iter().copied().max().unwrap_or(0);

    builder.push_record(["Range", "Count", ""]);

    for (lower, upper, count) in hist.bins() {
        let bar = (peak > 0)
            .then(|| "█".repeat(count * BAR_WIDTH / peak))
            .unwrap_or_default();

        builder.push_record([
            format!("{lower:.2} - {upper:.2}"),
            count.to_string(),
            bar,
        ]);
    }

    styled(builder.build(), 1)
}

fn grid_table(grid: &PriceRatingGrid) -> Table {
    let mut builder = Builder::default();
    let mut header = vec!["Price \\ Rating".to_string()];

    header.extend(
        grid.rating_edges
            .windows(2)
            .filter_map(|edge| Some(format!("{:.1}-{:.1}", edge.first()?, edge.last()?))),
    );
    builder.push_record(header);

    for (edge, means) in grid.price_edges.windows(2).zip(&grid.mean_rating_counts) {
        let (Some(lower), Some(upper)) = (edge.first(), edge.last()) else {
            continue;
        };

        let mut row = vec![format!("{lower:.2} - {upper:.2}")];

        row.extend(
            means
                .iter()
                .map(|mean| mean.map_or_else(|| "-".to_string(), |v| format!("{v:.0}"))),
        );
        builder.push_record(row);
    }

    styled(builder.build(), 1)
}

fn or_dash(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn styled(mut table: Table, first_numeric_column: usize) -> Table {
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(first_numeric_column..), Alignment::right());
    table
}

fn money(price: Decimal) -> String {
    to_money(price, USD).map_or_else(|| price.to_string(), |m| m.to_string())
}

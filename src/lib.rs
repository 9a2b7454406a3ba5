//! Shopfront
//!
//! Shopfront generates a reproducible table of synthetic product listings from a category
//! catalog and a seeded random stream, then filters and summarises that table.

pub mod catalog;
pub mod cli;
pub mod filters;
pub mod fixtures;
pub mod generator;
pub mod logging;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod report;
pub mod stats;
pub mod table;

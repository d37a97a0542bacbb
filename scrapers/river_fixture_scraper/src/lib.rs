//! Fixtures ETL for a tracked football club: scrape the results page,
//! normalize the raw rows, replace the Postgres table and report on it.

pub mod config;
pub mod extract;
pub mod load;
pub mod normalize;
pub mod report;
pub mod transform;
pub mod types;

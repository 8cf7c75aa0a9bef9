//! Adapter implementations
//!
//! Adapters back the core with concrete technologies:
//! - DuckDB for the persistence layer
//! - Static sample data for demo mode

pub mod demo;
pub mod duckdb;

//! App-level modules on top of the domain core
//!
//! - export: CSV/JSON export of dashboard data
//! - reports: per-course completion aggregation

pub mod export;
pub mod reports;

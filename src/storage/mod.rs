//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - media(id, title, type, rating, comment, date_watched, created_at)

pub mod schema;
pub mod sqlite;

pub use sqlite::{MediaStore, SearchOptions, YearSummary};

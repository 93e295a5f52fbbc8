//! # Morama - a personal log of watched movies and dramas
//!
//! Morama provides:
//! - A typed record model for watched movies and dramas
//! - SQLite-backed storage with CRUD, year grouping and title search
//! - A statistics engine computing fresh snapshots over the stored records
//! - YAML configuration and daily rolling log files under `~/.morama`

pub mod media;
pub mod storage;
pub mod stats;
pub mod config;
pub mod logging;
pub mod ui;

// Re-exports for convenient access
pub use config::Config;
pub use media::{MediaEntry, MediaType, NewEntry};
pub use stats::{StatsEngine, StatsSnapshot};
pub use storage::MediaStore;

/// Result type alias for Morama operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Morama operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UserInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad error categories, each mapped to a process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UserInput,
    NotFound,
    Database,
    System,
}

impl ErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Validation => 1,
            ErrorKind::UserInput => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::Database => 5,
            ErrorKind::System => 6,
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::UserInput(_) => ErrorKind::UserInput,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Storage(_) | Error::Timestamp(_) => ErrorKind::Database,
            Error::Config(_) | Error::Io(_) => ErrorKind::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_kind() {
        assert_eq!(Error::Validation("bad".into()).kind().exit_code(), 1);
        assert_eq!(Error::UserInput("cancelled".into()).kind().exit_code(), 2);
        assert_eq!(Error::NotFound("missing".into()).kind().exit_code(), 3);
        assert_eq!(Error::Timestamp("??".into()).kind().exit_code(), 5);
        assert_eq!(
            Error::Storage(rusqlite::Error::QueryReturnedNoRows).kind(),
            ErrorKind::Database
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(Error::Io(io).kind().exit_code(), 6);
    }
}

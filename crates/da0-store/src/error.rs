use thiserror::Error;

use da0_shared::constants::UNIQUE_VIOLATION_CODE;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error from the local backend.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Transport-level failure talking to the hosted backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The hosted backend answered with an error body.
    #[error("Backend error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// An insert hit a uniqueness constraint.
    #[error("Unique constraint violated")]
    UniqueViolation,

    /// JSON (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend settings that cannot be used (bad URL, bad header value).
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the failed write collided with an existing row, which for
    /// votes means the voter already voted.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::UniqueViolation => true,
            StoreError::Api { code, .. } => code.as_deref() == Some(UNIQUE_VIOLATION_CODE),
            _ => false,
        }
    }

    /// Classify a SQLite error raised by an INSERT.
    pub(crate) fn from_insert(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            let unique = err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY;
            if err.code == rusqlite::ErrorCode::ConstraintViolation && unique {
                return StoreError::UniqueViolation;
            }
        }
        StoreError::Sqlite(e)
    }

    /// Map "no rows" onto [`StoreError::NotFound`].
    pub(crate) fn from_query(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            other => StoreError::Sqlite(other),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_unique_code_detected() {
        let err = StoreError::Api {
            status: 409,
            code: Some("23505".into()),
            message: "duplicate key value violates unique constraint".into(),
        };
        assert!(err.is_unique_violation());

        let other = StoreError::Api {
            status: 400,
            code: Some("23503".into()),
            message: "foreign key".into(),
        };
        assert!(!other.is_unique_violation());
        assert!(!StoreError::NotFound.is_unique_violation());
    }
}

//! Error types for SQLite book storage.
//!
//! Provides a unified error type covering database access, migration, and
//! constraint failures, and its mapping onto the store-neutral
//! [`StoreError`].

use bookshelf_core::{BookId, Field, StoreError};
use thiserror::Error;

/// Errors that can occur during SQLite book operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Schema creation or column migration failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Table name contains invalid characters.
    #[error("invalid table name '{0}': must contain only alphanumeric characters and underscores")]
    InvalidTableName(String),

    /// Another row already uses this ISBN.
    #[error("duplicate ISBN: {0}")]
    DuplicateIsbn(String),

    /// A NOT NULL column would be stored empty.
    #[error("empty required columns: {0:?}")]
    EmptyColumns(Vec<Field>),

    /// No row has this id.
    #[error("book not found: {0}")]
    BookNotFound(BookId),
}

impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::DuplicateIsbn(isbn) => StoreError::UniqueConstraintViolation(isbn),
            SqliteError::EmptyColumns(fields) => StoreError::ValidationFailure(fields),
            SqliteError::BookNotFound(id) => StoreError::NotFound(id),
            other => StoreError::Storage(other.to_string()),
        }
    }
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;

//! Error types for store access and user-facing commands.
//!
//! [`StoreError`] is what any [`BookStore`](crate::BookStore) backend
//! reports. [`CommandError`] adds the precondition failures the command
//! layer detects before reaching the store. None of them are fatal to a
//! running session; each is meant to be shown to the user and dismissed.

use thiserror::Error;

use crate::validate::join_fields;
use crate::{BookId, Field};

/// Errors reported by a record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Another row already uses this ISBN.
    #[error("a book with ISBN '{0}' already exists")]
    UniqueConstraintViolation(String),

    /// A NOT NULL column would be stored empty.
    #[error("required columns are empty: {}", join_fields(.0))]
    ValidationFailure(Vec<Field>),

    /// No row has this id.
    #[error("no book with id {0}")]
    NotFound(BookId),

    /// Any other storage failure (I/O, locking, schema).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors reported by the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Required fields are blank.
    #[error("all fields must be filled out (missing: {})", join_fields(.0))]
    ValidationFailure(Vec<Field>),

    /// Delete was requested with no book selected.
    #[error("no book selected")]
    NoSelection,

    /// Update was requested with no book selected, blank fields, or both.
    #[error("no book selected or fields are empty")]
    SelectionOrValidation {
        selected: Option<BookId>,
        missing: Vec<Field>,
    },

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CommandError {
    /// Short title for a notification, e.g. `Input Error`.
    pub fn title(&self) -> &'static str {
        match self {
            CommandError::ValidationFailure(_) => "Input Error",
            CommandError::NoSelection => "Selection Error",
            CommandError::SelectionOrValidation { .. } => "Selection/Error",
            CommandError::Store(StoreError::UniqueConstraintViolation(_)) => "Duplicate ISBN",
            CommandError::Store(StoreError::ValidationFailure(_)) => "Input Error",
            CommandError::Store(StoreError::NotFound(_)) => "Not Found",
            CommandError::Store(StoreError::Storage(_)) => "Storage Error",
        }
    }
}

/// Convenience alias for store results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convenience alias for command results.
pub type Result<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failed_precondition() {
        let err = CommandError::ValidationFailure(vec![Field::Title, Field::Isbn]);
        assert_eq!(err.to_string(), "all fields must be filled out (missing: title, isbn)");
        assert_eq!(CommandError::NoSelection.to_string(), "no book selected");

        let err: CommandError = StoreError::NotFound(BookId(5)).into();
        assert_eq!(err.to_string(), "no book with id 5");
        assert_eq!(err.title(), "Not Found");
    }
}

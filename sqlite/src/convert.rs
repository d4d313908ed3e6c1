//! Conversions between SQL rows and book records.
//!
//! Reading is tolerant of the storage classes an older table may use: a
//! `year` declared `INTEGER` comes back as an integer value and is rendered
//! as text here, and NULL reads as the empty string.

use bookshelf_core::{Book, BookFields, BookId, Field, Variant};
use rusqlite::types::ValueRef;
use rusqlite::{Row, ffi};

use crate::error::SqliteError;
use crate::schema::NOT_NULL_COLUMNS;

/// Comma-separated select list for `variant`, starting with `id`.
pub(crate) fn select_list(variant: Variant) -> String {
    std::iter::once("id")
        .chain(variant.fields().iter().map(|f| f.column()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a [`Book`] from a row selected with [`select_list`].
///
/// Fields the variant does not store are left empty.
pub(crate) fn book_from_row(row: &Row<'_>, variant: Variant) -> rusqlite::Result<Book> {
    let id = BookId(row.get(0)?);
    let mut fields = BookFields::default();
    for (offset, &field) in variant.fields().iter().enumerate() {
        fields.set(field, text_at(row, offset + 1)?);
    }
    Ok(Book::new(id, fields))
}

/// Reads any storage class as text.
fn text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}

/// NOT NULL columns that `fields` would leave empty.
pub(crate) fn empty_required_columns(fields: &BookFields) -> Vec<Field> {
    NOT_NULL_COLUMNS
        .into_iter()
        .filter(|&f| fields.get(f).is_empty())
        .collect()
}

/// Classifies an insert/update failure, recognizing ISBN collisions.
pub(crate) fn write_error(err: rusqlite::Error, isbn: &str) -> SqliteError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            SqliteError::DuplicateIsbn(isbn.to_string())
        }
        _ => SqliteError::DatabaseError(err),
    }
}

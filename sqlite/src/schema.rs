//! SQL schema generation with a customizable table name.
//!
//! Generates the `CREATE TABLE`, `DROP TABLE`, and additive
//! `ALTER TABLE ... ADD COLUMN` statements for the book table. The table
//! name is the only identifier that is not a compile-time constant, so it is
//! validated before it is ever formatted into SQL.
//!
//! # Table structure
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS books (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     title TEXT NOT NULL,
//!     author TEXT NOT NULL,
//!     year TEXT,
//!     isbn TEXT NOT NULL UNIQUE,
//!     notes TEXT NOT NULL DEFAULT '',        -- full variant only
//!     current_page TEXT NOT NULL DEFAULT ''  -- full variant only
//! );
//! ```
//!
//! `AUTOINCREMENT` keeps ids from being reused after the highest row is
//! deleted.

use bookshelf_core::{Field, Variant};

use crate::error::{Result, SqliteError};

/// Default table name.
pub const DEFAULT_TABLE: &str = "books";

/// Columns an older table may lack and that can be added in place.
pub(crate) const ADDITIVE_COLUMNS: [Field; 2] = [Field::Notes, Field::CurrentPage];

/// Columns stored with a NOT NULL constraint and no default.
pub(crate) const NOT_NULL_COLUMNS: [Field; 3] = [Field::Title, Field::Author, Field::Isbn];

/// Validates that a table name contains only alphanumeric characters and underscores.
pub(crate) fn validate_table_name(table: &str) -> Result<()> {
    if table.is_empty() {
        return Err(SqliteError::InvalidTableName(table.to_string()));
    }
    if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidTableName(table.to_string()));
    }
    Ok(())
}

/// Quotes a validated table name for use in a statement.
///
/// Quoting keeps names such as `select` or `1books` from being parsed as
/// keywords or literals.
pub(crate) fn quote_identifier(table: &str) -> String {
    format!("\"{table}\"")
}

/// Column definition used by both `CREATE TABLE` and `ADD COLUMN`.
pub(crate) fn column_definition(field: Field) -> &'static str {
    match field {
        Field::Title => "title TEXT NOT NULL",
        Field::Author => "author TEXT NOT NULL",
        Field::Year => "year TEXT",
        Field::Isbn => "isbn TEXT NOT NULL UNIQUE",
        Field::Notes => "notes TEXT NOT NULL DEFAULT ''",
        Field::CurrentPage => "current_page TEXT NOT NULL DEFAULT ''",
    }
}

/// Generates the `CREATE TABLE IF NOT EXISTS` statement for `variant`.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidTableName`] if the table name is empty or
/// contains characters other than alphanumerics and underscores.
pub fn generate_schema_sql(table: &str, variant: Variant) -> Result<String> {
    validate_table_name(table)?;

    let columns: Vec<&str> = std::iter::once("id INTEGER PRIMARY KEY AUTOINCREMENT")
        .chain(variant.fields().iter().map(|&f| column_definition(f)))
        .collect();

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        quote_identifier(table),
        columns.join(",\n    ")
    ))
}

/// Generates SQL to drop the book table.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidTableName`] if the table name is invalid.
pub fn generate_drop_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;
    Ok(format!("DROP TABLE IF EXISTS {};", quote_identifier(table)))
}

/// Generates an additive column migration for `field`.
pub(crate) fn add_column_sql(table: &str, field: Field) -> Result<String> {
    validate_table_name(table)?;
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {}",
        quote_identifier(table),
        column_definition(field)
    ))
}

//! Schema lifecycle operations for the book table.
//!
//! Provides [`Migration`] for creating ([`up`](Migration::up)), dropping
//! ([`down`](Migration::down)), and inspecting
//! ([`status`](Migration::status)) the table. `up` is the
//! `ensure_schema` step run on every startup.
//!
//! # Example
//!
//! ```no_run
//! use bookshelf_core::Variant;
//! use bookshelf_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("library.db").unwrap();
//! let mut migration = Migration::new(conn, "books", Variant::Full).unwrap();
//!
//! // Create the table, or add columns missing from an older one
//! let added = migration.up().unwrap();
//! println!("added {} columns", added.len());
//!
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//! ```

use bookshelf_core::{Field, Variant};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, SqliteError};
use crate::schema::{
    ADDITIVE_COLUMNS, add_column_sql, generate_drop_sql, generate_schema_sql, quote_identifier,
    validate_table_name,
};

/// Manages the lifecycle of the book table.
///
/// Mutating operations run inside a transaction, so a failed migration
/// leaves the table as it was.
///
/// # Additive migration
///
/// A table created by an older, minimal layout lacks `notes` and
/// `current_page`. When the full layout is requested, [`up`](Self::up)
/// inspects the existing columns with `PRAGMA table_info` and issues
/// `ALTER TABLE ... ADD COLUMN` only for the ones that are absent. A column
/// that already exists is never re-added, and any error from a statement
/// that does run is returned.
///
/// Existing columns keep their declared types. A legacy `year INTEGER`
/// column stays INTEGER after migration, so SQLite converts numeric-looking
/// text on write: a year of `0042` reads back as `42`. Tables created by
/// [`up`](Self::up) declare `year TEXT` and store the text unchanged.
pub struct Migration {
    conn: Connection,
    table: String,
    variant: Variant,
}

impl Migration {
    /// Creates a migration manager for the given connection, table, and layout.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidTableName`] if the table name contains invalid characters.
    pub fn new(conn: Connection, table: impl Into<String>, variant: Variant) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self {
            conn,
            table,
            variant,
        })
    }

    /// Creates the table if absent and adds missing columns.
    ///
    /// Safe to call on every startup. Returns the columns that were added
    /// (empty when the table was already current or was just created).
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::MigrationError`] if the table cannot be
    /// created, if an existing table lacks one of the base columns (title,
    /// author, year, isbn), or if adding a column fails.
    pub fn up(&mut self) -> Result<Vec<Field>> {
        let sql = generate_schema_sql(&self.table, self.variant)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql).map_err(|e| {
            SqliteError::MigrationError(format!("failed to create table {}: {e}", self.table))
        })?;

        let existing = table_columns(&tx, &self.table)?;
        if let Some(missing) = Variant::Minimal
            .fields()
            .iter()
            .find(|f| !existing.iter().any(|c| c == f.column()))
        {
            return Err(SqliteError::MigrationError(format!(
                "table {} has no {} column",
                self.table,
                missing.column()
            )));
        }

        let mut added = Vec::new();
        for field in ADDITIVE_COLUMNS {
            if !self.variant.has(field) {
                continue;
            }
            if existing.iter().any(|c| c == field.column()) {
                debug!(table = %self.table, column = field.column(), "column present");
                continue;
            }
            tx.execute(&add_column_sql(&self.table, field)?, [])
                .map_err(|e| {
                    SqliteError::MigrationError(format!(
                        "failed to add column {} to {}: {e}",
                        field.column(),
                        self.table
                    ))
                })?;
            info!(table = %self.table, column = field.column(), "added column");
            added.push(field);
        }

        tx.commit()?;
        Ok(added)
    }

    /// Drops the book table.
    ///
    /// Uses `DROP TABLE IF EXISTS` so it is safe to call when the table
    /// does not exist.
    pub fn down(&mut self) -> Result<()> {
        let sql = generate_drop_sql(&self.table)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql).map_err(|e| {
            SqliteError::MigrationError(format!("failed to drop table {}: {e}", self.table))
        })?;
        tx.commit()?;
        info!(table = %self.table, "dropped table");
        Ok(())
    }

    /// Reports whether the table exists, its columns, and its row count.
    pub fn status(&self) -> Result<MigrationStatus> {
        let columns = table_columns(&self.conn, &self.table)?;
        if columns.is_empty() {
            return Ok(MigrationStatus {
                tables_exist: false,
                columns,
                book_count: 0,
            });
        }

        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(&self.table)),
            [],
            |row| row.get(0),
        )?;

        Ok(MigrationStatus {
            tables_exist: true,
            columns,
            book_count: count as usize,
        })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migration and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

/// Column names of `table` in declaration order; empty if the table does not exist.
pub(crate) fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Snapshot of the book table returned by [`Migration::status`].
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Whether the book table exists.
    pub tables_exist: bool,
    /// Column names in declaration order.
    pub columns: Vec<String>,
    /// Number of stored books.
    pub book_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::BookQuery;
    use bookshelf_core::BookFields;

    const LEGACY_SQL: &str = "CREATE TABLE books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        year INTEGER,
        isbn TEXT UNIQUE
    )";

    fn migration(variant: Variant) -> Migration {
        let conn = Connection::open_in_memory().unwrap();
        Migration::new(conn, "books", variant).unwrap()
    }

    #[test]
    fn test_migration_new_validates_table_name() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(Migration::new(conn, "books", Variant::Full).is_ok());

        let conn = Connection::open_in_memory().unwrap();
        assert!(Migration::new(conn, "", Variant::Full).is_err());

        let conn = Connection::open_in_memory().unwrap();
        assert!(Migration::new(conn, "drop;--", Variant::Full).is_err());
    }

    #[test]
    fn test_status_on_empty_database() {
        let status = migration(Variant::Full).status().unwrap();
        assert!(!status.tables_exist);
        assert!(status.columns.is_empty());
        assert_eq!(status.book_count, 0);
    }

    #[test]
    fn test_up_creates_full_table() {
        let mut migration = migration(Variant::Full);
        assert!(migration.up().unwrap().is_empty());
        let status = migration.status().unwrap();
        assert!(status.tables_exist);
        assert_eq!(
            status.columns,
            vec!["id", "title", "author", "year", "isbn", "notes", "current_page"]
        );
    }

    #[test]
    fn test_up_is_idempotent() {
        let mut migration = migration(Variant::Full);
        migration.up().unwrap();
        assert!(migration.up().unwrap().is_empty());
        assert_eq!(migration.status().unwrap().columns.len(), 7);
    }

    #[test]
    fn test_up_adds_missing_columns_to_legacy_table() {
        let mut migration = migration(Variant::Full);
        migration.connection().execute_batch(LEGACY_SQL).unwrap();
        migration
            .connection()
            .execute(
                "INSERT INTO books (title, author, year, isbn) \
                 VALUES ('Dune', 'Herbert', 1965, '0001')",
                [],
            )
            .unwrap();

        assert_eq!(migration.up().unwrap(), vec![Field::Notes, Field::CurrentPage]);
        assert!(migration.up().unwrap().is_empty());

        let notes: String = migration
            .connection()
            .query_row("SELECT notes FROM books", [], |row| row.get(0))
            .unwrap();
        assert_eq!(notes, "");
        assert_eq!(migration.status().unwrap().book_count, 1);
    }

    #[test]
    fn test_legacy_year_column_keeps_integer_affinity() {
        let mut migration = migration(Variant::Full);
        migration.connection().execute_batch(LEGACY_SQL).unwrap();
        migration.up().unwrap();

        let fields = BookFields::new("Dune", "Herbert", "0042", "0001")
            .with(Field::Notes, "n")
            .with(Field::CurrentPage, "1");
        let query = BookQuery::new(migration.connection(), "books", Variant::Full).unwrap();
        let book = query.insert(&fields).unwrap();
        assert_eq!(book.fields.year, "42");
    }

    #[test]
    fn test_new_table_keeps_year_text() {
        let mut migration = migration(Variant::Minimal);
        migration.up().unwrap();

        let fields = BookFields::new("Dune", "Herbert", "0042", "0001");
        let query = BookQuery::new(migration.connection(), "books", Variant::Minimal).unwrap();
        assert_eq!(query.insert(&fields).unwrap().fields.year, "0042");
    }

    #[test]
    fn test_minimal_variant_leaves_legacy_table_alone() {
        let mut migration = migration(Variant::Minimal);
        migration.connection().execute_batch(LEGACY_SQL).unwrap();
        assert!(migration.up().unwrap().is_empty());
        assert_eq!(migration.status().unwrap().columns.len(), 5);
    }

    #[test]
    fn test_up_rejects_foreign_table_shape() {
        let mut migration = migration(Variant::Full);
        migration
            .connection()
            .execute_batch("CREATE TABLE books (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();
        let err = migration.up().unwrap_err();
        assert!(matches!(err, SqliteError::MigrationError(_)));
        assert_eq!(migration.status().unwrap().columns, vec!["id", "name"]);
    }

    #[test]
    fn test_down_removes_table() {
        let mut migration = migration(Variant::Full);
        migration.up().unwrap();
        migration.down().unwrap();
        assert!(!migration.status().unwrap().tables_exist);
    }

    #[test]
    fn test_down_is_idempotent() {
        let mut migration = migration(Variant::Full);
        migration.down().unwrap();
    }
}

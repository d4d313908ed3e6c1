//! [`BookStore`] implementation over a SQLite file.
//!
//! [`SqliteBookStore`] keeps only the file path, table name, and layout.
//! Each operation opens a fresh connection, runs one statement, and drops
//! the connection before returning, whether it succeeded or not.

use std::path::{Path, PathBuf};

use bookshelf_core::{Book, BookFields, BookId, BookStore, Predicate, StoreResult, Variant};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::Result;
use crate::migration::{Migration, MigrationStatus};
use crate::query::BookQuery;
use crate::schema::{DEFAULT_TABLE, validate_table_name};

/// A book store backed by a SQLite database file.
///
/// # Examples
///
/// ```no_run
/// use bookshelf_core::{BookFields, BookStore, Variant};
/// use bookshelf_sqlite::SqliteBookStore;
///
/// let store = SqliteBookStore::new("library.db", Variant::Minimal);
/// store.ensure_schema().unwrap();
/// store.insert(&BookFields::new("Dune", "Herbert", "1965", "0001")).unwrap();
/// assert_eq!(store.select_all().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteBookStore {
    path: PathBuf,
    table: String,
    variant: Variant,
}

impl SqliteBookStore {
    /// Creates a store for the default `books` table.
    pub fn new(path: impl Into<PathBuf>, variant: Variant) -> Self {
        Self {
            path: path.into(),
            table: DEFAULT_TABLE.to_string(),
            variant,
        }
    }

    /// Uses a different table name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTableName`](crate::SqliteError::InvalidTableName) if
    /// the name contains anything but alphanumerics and underscores.
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        self.table = table;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Reports the table's presence, columns, and row count.
    ///
    /// A missing database file reports an absent table and is not created.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "database file absent");
            return Ok(MigrationStatus {
                tables_exist: false,
                columns: Vec::new(),
                book_count: 0,
            });
        }
        self.migration()?.status()
    }

    /// Drops the book table. A missing database file is left missing.
    pub fn reset(&self) -> Result<()> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "database file absent, nothing to drop");
            return Ok(());
        }
        self.migration()?.down()
    }

    fn connect(&self) -> Result<Connection> {
        debug!(path = %self.path.display(), "opening connection");
        Ok(Connection::open(&self.path)?)
    }

    fn migration(&self) -> Result<Migration> {
        Migration::new(self.connect()?, self.table.as_str(), self.variant)
    }

    /// Runs `f` against a query bound to a connection scoped to this call.
    fn with_query<T>(&self, f: impl FnOnce(&BookQuery<'_>) -> Result<T>) -> Result<T> {
        let conn = self.connect()?;
        let query = BookQuery::new(&conn, self.table.as_str(), self.variant)?;
        f(&query)
    }
}

impl BookStore for SqliteBookStore {
    fn ensure_schema(&self) -> StoreResult<()> {
        let added = self.migration()?.up()?;
        if !added.is_empty() {
            info!(table = %self.table, ?added, "migrated book table");
        }
        Ok(())
    }

    fn insert(&self, fields: &BookFields) -> StoreResult<Book> {
        Ok(self.with_query(|q| q.insert(fields))?)
    }

    fn select_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.with_query(|q| q.select_all())?)
    }

    fn select_filtered(&self, predicate: &Predicate) -> StoreResult<Vec<Book>> {
        Ok(self.with_query(|q| q.select_filtered(predicate))?)
    }

    fn update(&self, id: BookId, fields: &BookFields) -> StoreResult<()> {
        Ok(self.with_query(|q| q.update(id, fields))?)
    }

    fn delete(&self, id: BookId) -> StoreResult<()> {
        Ok(self.with_query(|q| q.delete(id))?)
    }
}


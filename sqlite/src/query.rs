//! Parameterized book queries on an open connection.
//!
//! Provides [`BookQuery`] for create/read/update/delete on the book table.
//! Every value reaches SQLite as a bound parameter; the only text formatted
//! into statements is the validated table name and column names taken from
//! [`Field`].
//!
//! # Example
//!
//! ```no_run
//! use bookshelf_core::{BookFields, Field, Predicate, Variant};
//! use bookshelf_sqlite::BookQuery;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("library.db").unwrap();
//! let query = BookQuery::new(&conn, "books", Variant::Minimal).unwrap();
//!
//! let book = query.insert(&BookFields::new("Dune", "Herbert", "1965", "0001")).unwrap();
//! let hits = query
//!     .select_filtered(&Predicate::new().contains(Field::Author, "Herb"))
//!     .unwrap();
//! assert_eq!(hits[0].id, book.id);
//!
//! query.delete(book.id).unwrap();
//! ```

use bookshelf_core::{Book, BookFields, BookId, Predicate, Variant};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use tracing::debug;

use crate::convert::{book_from_row, empty_required_columns, select_list, write_error};
use crate::error::{Result, SqliteError};
use crate::schema::{quote_identifier, validate_table_name};

/// Query interface for reading and writing books on a borrowed connection.
pub struct BookQuery<'a> {
    conn: &'a Connection,
    table: String,
    variant: Variant,
}

impl<'a> BookQuery<'a> {
    /// Creates a query interface for the given connection, table, and layout.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidTableName`] if the table name is invalid.
    pub fn new(conn: &'a Connection, table: impl Into<String>, variant: Variant) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self {
            conn,
            table,
            variant,
        })
    }

    /// Inserts a book and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::EmptyColumns`] if title, author, or isbn is
    /// empty, and [`SqliteError::DuplicateIsbn`] if the isbn is taken.
    pub fn insert(&self, fields: &BookFields) -> Result<Book> {
        let empty = empty_required_columns(fields);
        if !empty.is_empty() {
            return Err(SqliteError::EmptyColumns(empty));
        }

        let columns = self.variant.fields();
        let names: Vec<&str> = columns.iter().map(|f| f.column()).collect();
        let slots: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(&self.table),
            names.join(", "),
            slots.join(", ")
        );
        debug!(%sql, "insert");

        self.conn
            .execute(&sql, params_from_iter(columns.iter().map(|&f| fields.get(f))))
            .map_err(|e| write_error(e, &fields.isbn))?;

        let id = BookId(self.conn.last_insert_rowid());
        self.get(id)?.ok_or(SqliteError::BookNotFound(id))
    }

    /// Loads a single book by id.
    pub fn get(&self, id: BookId) -> Result<Option<Book>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            select_list(self.variant),
            quote_identifier(&self.table)
        );
        let variant = self.variant;
        let book = self
            .conn
            .query_row(&sql, params![id.0], |row| book_from_row(row, variant))
            .optional()?;
        Ok(book)
    }

    /// Returns every book ordered by id.
    pub fn select_all(&self) -> Result<Vec<Book>> {
        self.select_filtered(&Predicate::new())
    }

    /// Returns the books matching every condition, ordered by id.
    ///
    /// Matching is a case-sensitive substring test (`instr`), unlike
    /// SQLite's `LIKE`, which folds ASCII case.
    pub fn select_filtered(&self, predicate: &Predicate) -> Result<Vec<Book>> {
        let (clause, values) = self.where_clause(predicate);
        let sql = format!(
            "SELECT {} FROM {}{clause} ORDER BY id",
            select_list(self.variant),
            quote_identifier(&self.table)
        );
        debug!(%sql, "select");

        let variant = self.variant;
        let mut stmt = self.conn.prepare(&sql)?;
        let books = stmt
            .query_map(params_from_iter(values), |row| book_from_row(row, variant))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// Replaces every stored field of book `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::BookNotFound`] if no row has that id,
    /// [`SqliteError::DuplicateIsbn`] if another row has the new isbn, and
    /// [`SqliteError::EmptyColumns`] for empty NOT NULL columns.
    pub fn update(&self, id: BookId, fields: &BookFields) -> Result<()> {
        let empty = empty_required_columns(fields);
        if !empty.is_empty() {
            return Err(SqliteError::EmptyColumns(empty));
        }

        let columns = self.variant.fields();
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} = ?{}", f.column(), i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            quote_identifier(&self.table),
            assignments.join(", "),
            columns.len() + 1
        );
        debug!(%sql, "update");

        let values: Vec<Value> = columns
            .iter()
            .map(|&f| Value::Text(fields.get(f).to_string()))
            .chain(std::iter::once(Value::Integer(id.0)))
            .collect();
        let rows = self
            .conn
            .execute(&sql, params_from_iter(values))
            .map_err(|e| write_error(e, &fields.isbn))?;

        if rows == 0 {
            return Err(SqliteError::BookNotFound(id));
        }
        Ok(())
    }

    /// Deletes book `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::BookNotFound`] if no row has that id.
    pub fn delete(&self, id: BookId) -> Result<()> {
        let rows = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", quote_identifier(&self.table)),
            params![id.0],
        )?;

        if rows == 0 {
            return Err(SqliteError::BookNotFound(id));
        }
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        self.conn
    }

    /// Renders `predicate` as ` WHERE ...` plus its bound values.
    ///
    /// A field the layout does not store is compared against the empty
    /// string, matching how such fields read back.
    fn where_clause(&self, predicate: &Predicate) -> (String, Vec<String>) {
        if predicate.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut terms = Vec::with_capacity(predicate.len());
        let mut values = Vec::with_capacity(predicate.len());
        for (i, condition) in predicate.conditions().iter().enumerate() {
            let target = if self.variant.has(condition.field) {
                condition.field.column()
            } else {
                "''"
            };
            // Operator::Contains is the only operator.
            terms.push(format!("instr({target}, ?{}) > 0", i + 1));
            values.push(condition.value.clone());
        }
        (format!(" WHERE {}", terms.join(" AND ")), values)
    }
}

//! SQLite record store for book records.
//!
//! This crate implements [`BookStore`](bookshelf_core::BookStore) on top of
//! a single SQLite table. It includes schema generation, an additive
//! migration step, tolerant row conversion, and a parameterized query
//! interface.
//!
//! # Architecture
//!
//! The crate is organized into five modules:
//!
//! - **`schema`**: SQL generation with a customizable table name
//! - **`migration`**: Lifecycle operations (up/down/status)
//! - **`convert`**: SQL row ↔ [`Book`](bookshelf_core::Book) conversion
//! - **`query`**: Parameterized CRUD on an open connection
//! - **`store`**: Connection-per-operation [`SqliteBookStore`]
//!
//! # Quick start
//!
//! ```no_run
//! use bookshelf_core::{BookFields, Library, Variant};
//! use bookshelf_sqlite::SqliteBookStore;
//!
//! let store = SqliteBookStore::new("library.db", Variant::Full);
//! let library = Library::new(store, Variant::Full);
//! library.ensure_schema().unwrap();
//!
//! for book in library.list_all().unwrap() {
//!     println!("{} {}", book.id, book.fields.title);
//! }
//! ```
//!
//! # Table name customization
//!
//! The table defaults to `books`. Other names must contain only ASCII
//! alphanumerics and underscores, since the name is the one identifier
//! formatted into SQL text.

mod convert;
mod error;
mod migration;
mod query;
mod schema;
mod store;

pub use error::{Result, SqliteError};
pub use migration::{Migration, MigrationStatus};
pub use query::BookQuery;
pub use schema::{DEFAULT_TABLE, generate_drop_sql, generate_schema_sql};
pub use store::SqliteBookStore;

//! Book records, validation, and the command layer.
//!
//! This crate defines everything about managing book records that does not
//! depend on a particular storage engine:
//!
//! - [`Book`], [`BookFields`], [`BookId`], [`Field`]: the data model.
//! - [`Variant`]: minimal (four fields) or full (six fields) layout.
//! - [`Placeholders`] and [`missing_fields`]: blank-field validation,
//!   where a value equal to its hint text counts as blank.
//! - [`Predicate`]: a structured conjunction of substring conditions for
//!   search, rendered by the storage backend with bound parameters.
//! - [`BookStore`]: the trait a record store implements.
//! - [`Library`]: the five intents (add, search, list all, update, delete).
//! - [`FormState`] and [`Session`]: explicit front-end state.
//!
//! # Example
//!
//! ```no_run
//! # fn demo<S: bookshelf_core::BookStore>(store: S) -> bookshelf_core::Result<()> {
//! use bookshelf_core::*;
//!
//! let mut session = Session::new(Library::new(store, Variant::Minimal));
//! session.library().ensure_schema()?;
//!
//! let form = session.form_mut();
//! form.set_field(Field::Title, "Dune");
//! form.set_field(Field::Author, "Herbert");
//! form.set_field(Field::Year, "1965");
//! form.set_field(Field::Isbn, "0001");
//!
//! let listing = session.add()?;
//! assert_eq!(listing.len(), 1);
//! # Ok(())
//! # }
//! ```

mod error;
mod library;
mod predicate;
mod session;
mod store;
mod types;
mod validate;

pub use error::{CommandError, Result, StoreError, StoreResult};
pub use library::Library;
pub use predicate::{Condition, Operator, Predicate};
pub use session::{FormState, Session};
pub use store::BookStore;
pub use types::*;
pub use validate::{Placeholders, missing_fields};

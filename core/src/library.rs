//! The command layer.
//!
//! [`Library`] turns the five user intents (add, search, list all, update,
//! delete) into [`BookStore`] calls. Mutating intents are validated first;
//! every successful mutation returns the refreshed full listing so the
//! caller can redraw. The library holds no durable state of its own.

use tracing::{debug, warn};

use crate::error::{CommandError, Result};
use crate::{Book, BookFields, BookId, BookStore, Placeholders, Predicate, Variant, missing_fields};

/// Intent dispatch and pre-store validation over a [`BookStore`].
///
/// # Examples
///
/// ```no_run
/// # fn demo<S: bookshelf_core::BookStore>(store: S) -> bookshelf_core::Result<()> {
/// use bookshelf_core::*;
///
/// let library = Library::new(store, Variant::Minimal);
/// library.ensure_schema()?;
///
/// let listing = library.add(&BookFields::new("Dune", "Herbert", "1965", "0001"))?;
/// assert_eq!(listing.len(), 1);
///
/// let hits = library.search(&BookFields::default().with(Field::Author, "Herb"))?;
/// assert_eq!(hits.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Library<S> {
    store: S,
    variant: Variant,
    placeholders: Placeholders,
}

impl<S: BookStore> Library<S> {
    /// Creates a library using the default placeholder hints.
    pub fn new(store: S, variant: Variant) -> Self {
        Self {
            store,
            variant,
            placeholders: Placeholders::default(),
        }
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates or migrates the underlying table.
    pub fn ensure_schema(&self) -> Result<()> {
        Ok(self.store.ensure_schema()?)
    }

    /// Adds a book and returns the refreshed listing.
    ///
    /// # Errors
    ///
    /// [`CommandError::ValidationFailure`] if a required field is blank;
    /// store errors (duplicate ISBN, storage failure) otherwise.
    pub fn add(&self, fields: &BookFields) -> Result<Vec<Book>> {
        let missing = missing_fields(fields, self.variant, &self.placeholders);
        if !missing.is_empty() {
            warn!(?missing, "add rejected: blank fields");
            return Err(CommandError::ValidationFailure(missing));
        }
        let book = self.store.insert(fields)?;
        debug!(id = %book.id, isbn = %book.fields.isbn, "book added");
        self.list_all()
    }

    /// Returns the books matching every non-blank field of `fields`.
    ///
    /// Blank fields impose no constraint, so an empty form lists everything.
    pub fn search(&self, fields: &BookFields) -> Result<Vec<Book>> {
        let predicate = Predicate::from_fields(fields, &self.placeholders);
        debug!(conditions = predicate.len(), "search");
        Ok(self.store.select_filtered(&predicate)?)
    }

    /// Returns every book.
    pub fn list_all(&self) -> Result<Vec<Book>> {
        Ok(self.store.select_all()?)
    }

    /// Replaces every field of the selected book and returns the refreshed listing.
    ///
    /// # Errors
    ///
    /// [`CommandError::SelectionOrValidation`] if nothing is selected or a
    /// required field is blank; store errors otherwise.
    pub fn update(&self, selected: Option<BookId>, fields: &BookFields) -> Result<Vec<Book>> {
        let missing = missing_fields(fields, self.variant, &self.placeholders);
        let id = match selected {
            Some(id) if missing.is_empty() => id,
            _ => {
                warn!(?selected, ?missing, "update rejected");
                return Err(CommandError::SelectionOrValidation { selected, missing });
            }
        };
        self.store.update(id, fields)?;
        debug!(%id, "book updated");
        self.list_all()
    }

    /// Removes the selected book and returns the refreshed listing.
    ///
    /// # Errors
    ///
    /// [`CommandError::NoSelection`] if nothing is selected; store errors otherwise.
    pub fn delete(&self, selected: Option<BookId>) -> Result<Vec<Book>> {
        let Some(id) = selected else {
            warn!("delete rejected: no selection");
            return Err(CommandError::NoSelection);
        };
        self.store.delete(id)?;
        debug!(%id, "book deleted");
        self.list_all()
    }
}

//! Explicit application state for an interactive front end.
//!
//! [`FormState`] is what a window would hold in its widgets: the values in
//! the six inputs, the selected row, and the rows currently shown.
//! [`Session`] pairs it with a [`Library`] and exposes the six user-facing
//! operations, reading and writing the form through accessors.

use crate::error::Result;
use crate::{Book, BookFields, BookId, BookStore, Field, Library};

/// Form inputs, selection, and the listing on display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BookFields,
    selected: Option<BookId>,
    listing: Vec<Book>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    pub fn fields(&self) -> &BookFields {
        &self.fields
    }

    /// Empties all six inputs. The selection is kept.
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    pub fn select(&mut self, id: Option<BookId>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<BookId> {
        self.selected
    }

    pub fn listing(&self) -> &[Book] {
        &self.listing
    }

    pub fn set_listing(&mut self, listing: Vec<Book>) {
        self.listing = listing;
    }

    /// Selects `id` and copies its fields from the current listing into the form.
    ///
    /// Returns `false`, leaving the form untouched, if `id` is not listed.
    pub fn load_selected(&mut self, id: BookId) -> bool {
        match self.listing.iter().find(|book| book.id == id) {
            Some(book) => {
                self.fields = book.fields.clone();
                self.selected = Some(id);
                true
            }
            None => false,
        }
    }
}

/// A [`Library`] driven by a [`FormState`].
pub struct Session<S> {
    library: Library<S>,
    form: FormState,
}

impl<S: BookStore> Session<S> {
    pub fn new(library: Library<S>) -> Self {
        Self {
            library,
            form: FormState::new(),
        }
    }

    pub fn library(&self) -> &Library<S> {
        &self.library
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Adds the book in the form, then clears the inputs.
    pub fn add(&mut self) -> Result<&[Book]> {
        let listing = self.library.add(self.form.fields())?;
        self.form.clear_fields();
        self.form.set_listing(listing);
        Ok(self.form.listing())
    }

    /// Lists books matching the non-blank inputs.
    pub fn search(&mut self) -> Result<&[Book]> {
        let listing = self.library.search(self.form.fields())?;
        self.form.set_listing(listing);
        Ok(self.form.listing())
    }

    pub fn show_all(&mut self) -> Result<&[Book]> {
        let listing = self.library.list_all()?;
        self.form.set_listing(listing);
        Ok(self.form.listing())
    }

    /// Replaces the selected book with the form's values, then clears the inputs.
    pub fn update(&mut self) -> Result<&[Book]> {
        let listing = self
            .library
            .update(self.form.selected(), self.form.fields())?;
        self.form.clear_fields();
        self.form.set_listing(listing);
        Ok(self.form.listing())
    }

    /// Deletes the selected book and drops the selection.
    pub fn delete(&mut self) -> Result<&[Book]> {
        let listing = self.library.delete(self.form.selected())?;
        self.form.select(None);
        self.form.set_listing(listing);
        Ok(self.form.listing())
    }

    pub fn clear_fields(&mut self) {
        self.form.clear_fields();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::{CommandError, Variant};

    fn session() -> Session<MemoryStore> {
        Session::new(Library::new(MemoryStore::default(), Variant::Minimal))
    }

    fn fill(form: &mut FormState, title: &str, isbn: &str) {
        form.set_field(Field::Title, title);
        form.set_field(Field::Author, "Herbert");
        form.set_field(Field::Year, "1965");
        form.set_field(Field::Isbn, isbn);
    }

    #[test]
    fn test_add_clears_inputs_and_refreshes_listing() {
        let mut session = session();
        fill(session.form_mut(), "Dune", "0001");
        assert_eq!(session.add().unwrap().len(), 1);
        assert_eq!(session.form().fields(), &BookFields::default());
        assert_eq!(session.form().listing()[0].fields.title, "Dune");
    }

    #[test]
    fn test_failed_add_keeps_inputs() {
        let mut session = session();
        session.form_mut().set_field(Field::Title, "Dune");
        let err = session.add().unwrap_err();
        assert!(matches!(err, CommandError::ValidationFailure(_)));
        assert_eq!(session.form().field(Field::Title), "Dune");
    }

    #[test]
    fn test_select_update_delete_flow() {
        let mut session = session();
        fill(session.form_mut(), "Dune", "0001");
        session.add().unwrap();

        assert!(session.form_mut().load_selected(BookId(1)));
        assert_eq!(session.form().field(Field::Author), "Herbert");
        session.form_mut().set_field(Field::Title, "Dune (1st ed.)");
        session.update().unwrap();
        assert_eq!(session.form().listing()[0].fields.title, "Dune (1st ed.)");
        assert_eq!(session.form().selected(), Some(BookId(1)));

        assert!(session.delete().unwrap().is_empty());
        assert_eq!(session.form().selected(), None);
        assert_eq!(session.delete().unwrap_err(), CommandError::NoSelection);
    }

    #[test]
    fn test_load_selected_unknown_id() {
        let mut form = FormState::new();
        assert!(!form.load_selected(BookId(9)));
        assert_eq!(form.selected(), None);
    }

    #[test]
    fn test_clear_fields_keeps_selection() {
        let mut session = session();
        session.form_mut().select(Some(BookId(3)));
        session.form_mut().set_field(Field::Notes, "x");
        session.clear_fields();
        assert_eq!(session.form().field(Field::Notes), "");
        assert_eq!(session.form().selected(), Some(BookId(3)));
    }

    #[test]
    fn test_search_uses_form_inputs() {
        let mut session = session();
        fill(session.form_mut(), "Dune", "0001");
        session.add().unwrap();
        fill(session.form_mut(), "Emma", "0002");
        session.add().unwrap();

        session.form_mut().set_field(Field::Title, "Em");
        let hits = session.search().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields.isbn, "0002");
        assert_eq!(session.show_all().unwrap().len(), 2);
    }
}

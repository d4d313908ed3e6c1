//! The storage seam.
//!
//! [`BookStore`] is the contract between the command layer and a record
//! store. Implementations own the on-disk representation and are expected
//! to acquire and release their resources per call; the command layer never
//! holds a connection across operations.

use crate::error::StoreResult;
use crate::{Book, BookFields, BookId, Predicate};

/// Raw create/read/update/delete access to book rows.
pub trait BookStore {
    /// Creates or migrates the book table. Must be idempotent.
    fn ensure_schema(&self) -> StoreResult<()>;

    /// Inserts a new row and returns it with its assigned id.
    fn insert(&self, fields: &BookFields) -> StoreResult<Book>;

    /// Returns every row in a deterministic order.
    fn select_all(&self) -> StoreResult<Vec<Book>>;

    /// Returns the rows matching every condition of `predicate`.
    ///
    /// An empty predicate returns the same rows as [`select_all`](Self::select_all).
    fn select_filtered(&self, predicate: &Predicate) -> StoreResult<Vec<Book>>;

    /// Replaces all fields of row `id`.
    fn update(&self, id: BookId, fields: &BookFields) -> StoreResult<()>;

    /// Removes row `id`.
    fn delete(&self, id: BookId) -> StoreResult<()>;
}

impl<S: BookStore + ?Sized> BookStore for &S {
    fn ensure_schema(&self) -> StoreResult<()> {
        (**self).ensure_schema()
    }

    fn insert(&self, fields: &BookFields) -> StoreResult<Book> {
        (**self).insert(fields)
    }

    fn select_all(&self) -> StoreResult<Vec<Book>> {
        (**self).select_all()
    }

    fn select_filtered(&self, predicate: &Predicate) -> StoreResult<Vec<Book>> {
        (**self).select_filtered(predicate)
    }

    fn update(&self, id: BookId, fields: &BookFields) -> StoreResult<()> {
        (**self).update(id, fields)
    }

    fn delete(&self, id: BookId) -> StoreResult<()> {
        (**self).delete(id)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store used by the command layer tests.

    use std::cell::RefCell;

    use super::*;
    use crate::StoreError;

    #[derive(Default)]
    struct Inner {
        rows: Vec<Book>,
        last_id: i64,
    }

    #[derive(Default)]
    pub(crate) struct MemoryStore {
        inner: RefCell<Inner>,
    }

    impl MemoryStore {
        pub(crate) fn len(&self) -> usize {
            self.inner.borrow().rows.len()
        }

        fn isbn_taken(inner: &Inner, isbn: &str, except: Option<BookId>) -> bool {
            inner
                .rows
                .iter()
                .any(|b| b.fields.isbn == isbn && Some(b.id) != except)
        }
    }

    impl BookStore for MemoryStore {
        fn ensure_schema(&self) -> StoreResult<()> {
            Ok(())
        }

        fn insert(&self, fields: &BookFields) -> StoreResult<Book> {
            let mut inner = self.inner.borrow_mut();
            if Self::isbn_taken(&inner, &fields.isbn, None) {
                return Err(StoreError::UniqueConstraintViolation(fields.isbn.clone()));
            }
            inner.last_id += 1;
            let book = Book::new(BookId(inner.last_id), fields.clone());
            inner.rows.push(book.clone());
            Ok(book)
        }

        fn select_all(&self) -> StoreResult<Vec<Book>> {
            Ok(self.inner.borrow().rows.clone())
        }

        fn select_filtered(&self, predicate: &Predicate) -> StoreResult<Vec<Book>> {
            Ok(self
                .inner
                .borrow()
                .rows
                .iter()
                .filter(|b| predicate.matches(&b.fields))
                .cloned()
                .collect())
        }

        fn update(&self, id: BookId, fields: &BookFields) -> StoreResult<()> {
            let mut inner = self.inner.borrow_mut();
            if !inner.rows.iter().any(|b| b.id == id) {
                return Err(StoreError::NotFound(id));
            }
            if Self::isbn_taken(&inner, &fields.isbn, Some(id)) {
                return Err(StoreError::UniqueConstraintViolation(fields.isbn.clone()));
            }
            if let Some(row) = inner.rows.iter_mut().find(|b| b.id == id) {
                row.fields = fields.clone();
            }
            Ok(())
        }

        fn delete(&self, id: BookId) -> StoreResult<()> {
            let mut inner = self.inner.borrow_mut();
            let before = inner.rows.len();
            inner.rows.retain(|b| b.id != id);
            if inner.rows.len() == before {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        }
    }
}

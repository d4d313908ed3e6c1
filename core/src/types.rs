//! Record type definitions for the book table.
//!
//! A [`Book`] is a store-assigned [`BookId`] plus the six user-editable
//! [`BookFields`]. Fields are addressed through the closed [`Field`] enum so
//! that column names never come from user input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned identifier of a book row.
///
/// Assigned once at creation and never reused, even after the row is
/// deleted.
///
/// # Examples
///
/// ```
/// use bookshelf_core::BookId;
///
/// let id: BookId = "42".parse().unwrap();
/// assert_eq!(id, BookId(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(BookId)
    }
}

/// One of the six user-editable book fields.
///
/// The variant order is the column order of the book table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Author,
    Year,
    Isbn,
    Notes,
    CurrentPage,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Author,
        Field::Year,
        Field::Isbn,
        Field::Notes,
        Field::CurrentPage,
    ];

    /// Column name in the book table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Year => "year",
            Field::Isbn => "isbn",
            Field::Notes => "notes",
            Field::CurrentPage => "current_page",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Year => "Year",
            Field::Isbn => "ISBN",
            Field::Notes => "Notes",
            Field::CurrentPage => "Current Page",
        }
    }

    /// Hint text shown in an empty input for this field.
    pub fn default_hint(self) -> &'static str {
        match self {
            Field::Title => "Enter Title",
            Field::Author => "Enter Author",
            Field::Year => "Enter Year",
            Field::Isbn => "Enter ISBN",
            Field::Notes => "Enter Notes",
            Field::CurrentPage => "Enter Current Page",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Returned when a string names no known [`Field`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}' (expected one of: title, author, year, isbn, notes, current_page)")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts column names, case-insensitively, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Field::ALL
            .into_iter()
            .find(|field| field.column() == normalized)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// The user-editable values of a book.
///
/// Every field is free-form text. Emptiness and placeholder handling are
/// decided by validation, not by this type.
///
/// # Examples
///
/// ```
/// use bookshelf_core::{BookFields, Field};
///
/// let fields = BookFields::new("Dune", "Herbert", "1965", "0001")
///     .with(Field::CurrentPage, "12");
/// assert_eq!(fields.get(Field::Author), "Herbert");
/// assert_eq!(fields.get(Field::Notes), "");
/// assert_eq!(fields.get(Field::CurrentPage), "12");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year: String,
    pub isbn: String,
    pub notes: String,
    pub current_page: String,
}

impl BookFields {
    /// Creates fields with the four core values set and the rest empty.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: year.into(),
            isbn: isbn.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Year => &self.year,
            Field::Isbn => &self.isbn,
            Field::Notes => &self.notes,
            Field::CurrentPage => &self.current_page,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Year => &mut self.year,
            Field::Isbn => &mut self.isbn,
            Field::Notes => &mut self.notes,
            Field::CurrentPage => &mut self.current_page,
        };
        *slot = value.into();
    }

    /// Iterates `(field, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// Resets every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A stored book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(flatten)]
    pub fields: BookFields,
}

impl Book {
    pub fn new(id: BookId, fields: BookFields) -> Self {
        Self { id, fields }
    }
}

/// Table layout and validation strictness.
///
/// `Minimal` keeps only title, author, year, and isbn. `Full` adds notes
/// and the current page, and requires all six fields when adding or
/// updating.
///
/// # Examples
///
/// ```
/// use bookshelf_core::{Field, Variant};
///
/// assert_eq!(Variant::default(), Variant::Full);
/// assert!(!Variant::Minimal.has(Field::Notes));
/// assert_eq!(Variant::Full.fields().len(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Minimal,
    #[default]
    Full,
}

impl Variant {
    /// Fields stored (and required) by this variant, in column order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Variant::Minimal => &Field::ALL[..4],
            Variant::Full => &Field::ALL,
        }
    }

    pub fn has(self, field: Field) -> bool {
        self.fields().contains(&field)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Minimal => f.write_str("minimal"),
            Variant::Full => f.write_str("full"),
        }
    }
}

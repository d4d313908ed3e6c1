//! Field validation and placeholder handling.
//!
//! A field counts as blank when it is the empty string or when it is
//! exactly equal to the hint text shown in its empty input. The second rule
//! means a user who deliberately types `Enter Title` is treated as having
//! typed nothing.
//!
//! # Examples
//!
//! ```
//! use bookshelf_core::*;
//!
//! let hints = Placeholders::default();
//! let fields = BookFields::new("Enter Title", "Herbert", "1965", "0001");
//! assert_eq!(
//!     missing_fields(&fields, Variant::Minimal, &hints),
//!     vec![Field::Title]
//! );
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BookFields, Field, Variant};

/// Hint text per field.
///
/// Defaults to [`Field::default_hint`] for every field. A map loaded from
/// configuration replaces the defaults entirely; fields missing from it
/// have no placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placeholders(BTreeMap<Field, String>);

impl Default for Placeholders {
    fn default() -> Self {
        Self(
            Field::ALL
                .into_iter()
                .map(|field| (field, field.default_hint().to_string()))
                .collect(),
        )
    }
}

impl Placeholders {
    /// No hints at all: only the empty string counts as blank.
    pub fn none() -> Self {
        Self(BTreeMap::new())
    }

    pub fn hint(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: Field, hint: impl Into<String>) {
        self.0.insert(field, hint.into());
    }

    /// Returns `true` if `value` should be treated as an empty input for `field`.
    pub fn is_blank(&self, field: Field, value: &str) -> bool {
        value.is_empty() || self.hint(field) == Some(value)
    }
}

/// Returns the fields required by `variant` that are blank, in column order.
///
/// An empty result means the fields are complete enough to add or update.
pub fn missing_fields(
    fields: &BookFields,
    variant: Variant,
    placeholders: &Placeholders,
) -> Vec<Field> {
    variant
        .fields()
        .iter()
        .copied()
        .filter(|&field| placeholders.is_blank(field, fields.get(field)))
        .collect()
}

/// Formats a list of fields as `title, author`.
pub(crate) fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.column())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Structured search predicates.
//!
//! A [`Predicate`] is an ordered conjunction of `(field, operator, value)`
//! conditions. Storage backends render it into their own query language and
//! must bind every value as a parameter; the predicate never carries SQL.
//!
//! # Examples
//!
//! ```
//! use bookshelf_core::*;
//!
//! let form = BookFields::default()
//!     .with(Field::Author, "Herb")
//!     .with(Field::Year, "Enter Year");
//! let predicate = Predicate::from_fields(&form, &Placeholders::default());
//!
//! assert_eq!(predicate.len(), 1);
//! assert_eq!(predicate.conditions()[0].field, Field::Author);
//! ```

use serde::{Deserialize, Serialize};

use crate::{BookFields, Field, Placeholders};

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Case-sensitive substring match.
    Contains,
}

impl Operator {
    /// Evaluates the operator against a stored value.
    pub fn matches(self, stored: &str, value: &str) -> bool {
        match self {
            Operator::Contains => stored.contains(value),
        }
    }
}

/// A single `(field, operator, value)` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: Field,
    pub operator: Operator,
    pub value: String,
}

/// Conjunction of conditions. Empty means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a predicate from the non-blank fields of a search form, in
    /// column order.
    pub fn from_fields(fields: &BookFields, placeholders: &Placeholders) -> Self {
        fields
            .iter()
            .filter(|&(field, value)| !placeholders.is_blank(field, value))
            .fold(Self::new(), |predicate, (field, value)| {
                predicate.contains(field, value)
            })
    }

    /// Adds a substring condition.
    pub fn contains(mut self, field: Field, value: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field,
            operator: Operator::Contains,
            value: value.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Evaluates the predicate against in-memory fields.
    pub fn matches(&self, fields: &BookFields) -> bool {
        self.conditions
            .iter()
            .all(|c| c.operator.matches(fields.get(c.field), &c.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_yields_empty_predicate() {
        let predicate = Predicate::from_fields(&BookFields::default(), &Placeholders::default());
        assert!(predicate.is_empty());
        assert!(predicate.matches(&BookFields::new("a", "b", "c", "d")));
    }

    #[test]
    fn test_conditions_follow_column_order() {
        let form = BookFields::default()
            .with(Field::Isbn, "00")
            .with(Field::Title, "Du");
        let predicate = Predicate::from_fields(&form, &Placeholders::default());
        let fields: Vec<_> = predicate.conditions().iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![Field::Title, Field::Isbn]);
    }

    #[test]
    fn test_placeholder_values_are_skipped() {
        let form = BookFields::new("Enter Title", "Enter Author", "Enter Year", "Enter ISBN");
        assert!(Predicate::from_fields(&form, &Placeholders::default()).is_empty());
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let book = BookFields::new("Dune", "Herbert", "1965", "0001");
        assert!(Predicate::new().contains(Field::Author, "Herb").matches(&book));
        assert!(!Predicate::new().contains(Field::Author, "herb").matches(&book));
    }

    #[test]
    fn test_conditions_are_conjunctive() {
        let book = BookFields::new("Dune", "Herbert", "1965", "0001");
        let predicate = Predicate::new()
            .contains(Field::Title, "Dune")
            .contains(Field::Year, "1966");
        assert!(!predicate.matches(&book));
    }
}

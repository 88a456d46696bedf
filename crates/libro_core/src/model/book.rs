//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record.
//! - Provide the JSON wire shape used by the seed fixture.
//!
//! # Invariants
//! - `isbn` is the unique business key; no surrogate key is exposed.
//! - A persisted book always passes [`Book::validate`].

use crate::model::validation::{validate_book, BookValidationError};
use serde::{Deserialize, Serialize};

/// Catalog entry for one book edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// 1..=100 characters.
    pub title: String,
    /// 1..=100 characters.
    pub author: String,
    /// ISBN-10 or ISBN-13 digits, no separators.
    pub isbn: String,
    /// Between 1800 and the current year, inclusive.
    pub year_published: i32,
    /// 1..=50 characters.
    pub genre: String,
    /// Strictly positive.
    pub pages: i32,
    /// Non-negative, in the catalog's currency.
    pub price: f64,
}

impl Book {
    /// Checks every field rule and reports the first violation.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        validate_book(self)
    }

    /// Returns whether this book may be persisted.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Case folding shared by every title comparison.
///
/// Full Unicode lowercase mapping, so `"ÉLAN"` and `"élan"` fold alike.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

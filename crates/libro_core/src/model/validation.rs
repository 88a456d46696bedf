//! Field rules for catalog books.
//!
//! # Responsibility
//! - Decide whether a `Book` may be persisted.
//! - Name the first failing field for diagnostics.
//!
//! # Invariants
//! - Validation never panics and has no side effects.
//! - Rules are checked in declaration order: title, author, isbn, year,
//!   genre, pages, price.

use crate::model::book::Book;
use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MAX_CHARS: usize = 100;
pub const GENRE_MAX_CHARS: usize = 50;
pub const MIN_YEAR_PUBLISHED: i32 = 1800;

static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{9}[0-9Xx]|[0-9]{13})$").expect("valid isbn regex"));

/// First rule a book failed.
#[derive(Debug, Clone, PartialEq)]
pub enum BookValidationError {
    /// Text field is empty or whitespace only.
    MissingField(&'static str),
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    InvalidIsbn(String),
    YearOutOfRange {
        year: i32,
        min: i32,
        max: i32,
    },
    InvalidPages(i32),
    /// Negative, NaN or infinite.
    InvalidPrice(f64),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::FieldTooLong { field, max, actual } => {
                write!(f, "{field} has {actual} characters; at most {max} allowed")
            }
            Self::InvalidIsbn(value) => {
                write!(f, "isbn `{value}` is not a valid ISBN-10 or ISBN-13")
            }
            Self::YearOutOfRange { year, min, max } => {
                write!(f, "year_published {year} must be within {min}..={max}")
            }
            Self::InvalidPages(pages) => write!(f, "pages must be positive, got {pages}"),
            Self::InvalidPrice(price) => {
                write!(f, "price must be a non-negative number, got {price}")
            }
        }
    }
}

impl Error for BookValidationError {}

/// Returns whether `book` satisfies every catalog field rule.
pub fn is_valid(book: &Book) -> bool {
    validate_book(book).is_ok()
}

/// Validates `book` against the current UTC year.
pub fn validate_book(book: &Book) -> Result<(), BookValidationError> {
    validate_book_at(book, current_year())
}

/// Validates `book`, treating `current_year` as the latest allowed
/// publication year.
pub fn validate_book_at(book: &Book, current_year: i32) -> Result<(), BookValidationError> {
    check_text("title", &book.title, TITLE_MAX_CHARS)?;
    check_text("author", &book.author, AUTHOR_MAX_CHARS)?;

    if !is_isbn(&book.isbn) {
        return Err(BookValidationError::InvalidIsbn(book.isbn.clone()));
    }

    if !(MIN_YEAR_PUBLISHED..=current_year).contains(&book.year_published) {
        return Err(BookValidationError::YearOutOfRange {
            year: book.year_published,
            min: MIN_YEAR_PUBLISHED,
            max: current_year,
        });
    }

    check_text("genre", &book.genre, GENRE_MAX_CHARS)?;

    if book.pages <= 0 {
        return Err(BookValidationError::InvalidPages(book.pages));
    }

    if !book.price.is_finite() || book.price < 0.0 {
        return Err(BookValidationError::InvalidPrice(book.price));
    }

    Ok(())
}

/// Returns whether `value` has the shape of an ISBN-10 or ISBN-13.
///
/// Check digits are not verified.
pub fn is_isbn(value: &str) -> bool {
    ISBN_RE.is_match(value)
}

/// Current year on the UTC calendar.
pub fn current_year() -> i32 {
    Utc::now().year()
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), BookValidationError> {
    if value.trim().is_empty() {
        return Err(BookValidationError::MissingField(field));
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(BookValidationError::FieldTooLong { field, max, actual });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_text, is_isbn, BookValidationError};

    #[test]
    fn isbn_accepts_ten_and_thirteen_digit_forms() {
        assert!(is_isbn("0306406152"));
        assert!(is_isbn("080442957X"));
        assert!(is_isbn("9780143039655"));
    }

    #[test]
    fn isbn_rejects_other_shapes() {
        assert!(!is_isbn(""));
        assert!(!is_isbn("Invalid"));
        assert!(!is_isbn("125"));
        assert!(!is_isbn("12345678912345"));
        assert!(!is_isbn("978-0143039655"));
        assert!(!is_isbn(" 9780143039655"));
        assert!(!is_isbn("X123456789"));
    }

    #[test]
    fn check_text_counts_characters_not_bytes() {
        let title = "é".repeat(100);
        assert!(check_text("title", &title, 100).is_ok());

        let too_long = "é".repeat(101);
        assert_eq!(
            check_text("title", &too_long, 100).unwrap_err(),
            BookValidationError::FieldTooLong {
                field: "title",
                max: 100,
                actual: 101,
            }
        );
    }

    #[test]
    fn check_text_rejects_whitespace_only() {
        assert_eq!(
            check_text("genre", " \t ", 50).unwrap_err(),
            BookValidationError::MissingField("genre")
        );
    }
}

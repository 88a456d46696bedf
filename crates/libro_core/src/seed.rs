//! Catalog seed fixture.
//!
//! # Responsibility
//! - Parse book lists from the JSON fixture shape.
//! - Insert seed books through `BookManager` so they pass validation.
//!
//! # Invariants
//! - The embedded fixture holds ten valid books with distinct ISBNs.
//! - Seeding stops at the first failing book; earlier inserts are kept.

use crate::repo::book_repo::BookRepository;
use crate::service::book_manager::{BookManager, ManagerError};
use crate::Book;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ten-book catalog used by the console harness and tests.
pub const DEFAULT_SEED_JSON: &str = include_str!("../fixtures/seed_books.json");

#[derive(Debug)]
pub enum SeedError {
    /// Fixture is not a JSON array of books.
    Parse(serde_json::Error),
    /// Book at `index` was rejected by the manager.
    Rejected { index: usize, source: ManagerError },
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid seed fixture: {err}"),
            Self::Rejected { index, source } => {
                write!(f, "seed book #{index} rejected: {source}")
            }
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Rejected { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Parses a JSON array of books.
pub fn parse_seed_books(json: &str) -> Result<Vec<Book>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Adds every book through `manager`, returning how many were inserted.
pub fn seed_catalog<R: BookRepository>(
    manager: &BookManager<R>,
    books: &[Book],
) -> Result<usize, SeedError> {
    for (index, book) in books.iter().enumerate() {
        manager
            .add(book)
            .map_err(|source| SeedError::Rejected { index, source })?;
    }
    info!(
        "event=catalog_seed module=seed status=ok count={}",
        books.len()
    );
    Ok(books.len())
}

/// Seeds the embedded ten-book fixture.
pub fn seed_default_catalog<R: BookRepository>(
    manager: &BookManager<R>,
) -> Result<usize, SeedError> {
    let books = parse_seed_books(DEFAULT_SEED_JSON)?;
    seed_catalog(manager, &books)
}

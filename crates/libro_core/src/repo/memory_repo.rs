//! In-memory book repository.
//!
//! # Responsibility
//! - Provide a store with the same contract as `SqliteBookRepository`
//!   for callers that do not need durability.
//!
//! # Invariants
//! - Books are kept in insertion order.
//! - ISBNs are unique within the store.

use crate::model::book::Book;
use crate::repo::book_repo::{BookFilter, BookRepository, RepoError, RepoResult};
use std::sync::{Mutex, MutexGuard};

/// Process-local book store guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: Mutex<Vec<Book>>,
}

impl InMemoryBookRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored books.
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// Returns whether no book is stored.
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Book>> {
        // Every mutation is a single Vec operation, so rows behind a
        // poisoned lock are still consistent.
        self.books
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BookRepository for InMemoryBookRepository {
    fn insert(&self, book: &Book) -> RepoResult<()> {
        let mut rows = self.rows();
        if rows.iter().any(|stored| stored.isbn == book.isbn) {
            return Err(RepoError::DuplicateIsbn(book.isbn.clone()));
        }
        rows.push(book.clone());
        Ok(())
    }

    fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        Ok(self.rows().iter().find(|book| book.isbn == isbn).cloned())
    }

    fn find_all(&self) -> RepoResult<Vec<Book>> {
        Ok(self.rows().clone())
    }

    fn find_where(&self, filter: &BookFilter) -> RepoResult<Vec<Book>> {
        Ok(self
            .rows()
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    fn update(&self, book: &Book) -> RepoResult<bool> {
        let mut rows = self.rows();
        match rows.iter_mut().find(|stored| stored.isbn == book.isbn) {
            Some(stored) => {
                *stored = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_by_isbn(&self, isbn: &str) -> RepoResult<bool> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|book| book.isbn != isbn);
        Ok(rows.len() != before)
    }
}

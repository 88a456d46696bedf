//! Book catalog façade.
//!
//! # Responsibility
//! - Provide the public add/update/delete/get/search entry points.
//! - Reject malformed keys and invalid books before touching the store.
//!
//! # Invariants
//! - Every operation issues at most one repository call.
//! - Key checks run before validation, validation before persistence.
//! - Error messages are stable; callers match on them verbatim.

use crate::model::book::Book;
use crate::model::validation::{validate_book, BookValidationError};
use crate::repo::book_repo::{BookFilter, BookRepository, RepoError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Coarse classification of [`ManagerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller passed an empty or whitespace-only key.
    Argument,
    /// Caller passed a book that fails field rules.
    Validation,
    /// A well-formed query matched nothing.
    NotFound,
    /// The store failed.
    Persistence,
}

/// Error returned by [`BookManager`] operations.
#[derive(Debug)]
pub enum ManagerError {
    EmptyIsbn,
    EmptyTitleFragment,
    InvalidBook(BookValidationError),
    NoBooks,
    BookNotFound(String),
    NoTitleMatches,
    Repo(RepoError),
}

impl ManagerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyIsbn | Self::EmptyTitleFragment => ErrorKind::Argument,
            Self::InvalidBook(_) => ErrorKind::Validation,
            Self::NoBooks | Self::BookNotFound(_) | Self::NoTitleMatches => ErrorKind::NotFound,
            Self::Repo(_) => ErrorKind::Persistence,
        }
    }
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIsbn => f.write_str("ISBN cannot be empty."),
            Self::EmptyTitleFragment => f.write_str("Title fragment cannot be empty."),
            Self::InvalidBook(_) => f.write_str("Book is invalid."),
            Self::NoBooks => f.write_str("No books found."),
            Self::BookNotFound(isbn) => write!(f, "No book found with ISBN: {isbn}"),
            Self::NoTitleMatches => f.write_str("No books found with the given title fragment."),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBook(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ManagerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Validating façade over a [`BookRepository`].
pub struct BookManager<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookManager<R> {
    /// Creates a manager over the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates and inserts a new book.
    ///
    /// # Errors
    /// - `InvalidBook` when any field rule fails.
    /// - `Repo(RepoError::DuplicateIsbn)` when the ISBN is already stored.
    pub fn add(&self, book: &Book) -> ManagerResult<()> {
        ensure_valid("book_add", book)?;
        self.repo.insert(book)?;
        info!("event=book_add module=manager status=ok isbn={}", book.isbn);
        Ok(())
    }

    /// Validates a book and replaces the stored record with the same ISBN.
    ///
    /// # Errors
    /// - `InvalidBook` when any field rule fails.
    /// - `BookNotFound` when no stored record has this ISBN.
    pub fn update(&self, book: &Book) -> ManagerResult<()> {
        ensure_valid("book_update", book)?;
        if !self.repo.update(book)? {
            return Err(not_found("book_update", &book.isbn));
        }
        info!(
            "event=book_update module=manager status=ok isbn={}",
            book.isbn
        );
        Ok(())
    }

    /// Deletes the book with the given ISBN.
    ///
    /// # Errors
    /// - `EmptyIsbn` for empty or whitespace-only input.
    /// - `BookNotFound` when no stored record has this ISBN.
    pub fn delete(&self, isbn: &str) -> ManagerResult<()> {
        ensure_isbn_present("book_delete", isbn)?;
        if !self.repo.delete_by_isbn(isbn)? {
            return Err(not_found("book_delete", isbn));
        }
        info!("event=book_delete module=manager status=ok isbn={isbn}");
        Ok(())
    }

    /// Returns every stored book in insertion order.
    ///
    /// # Errors
    /// - `NoBooks` when the catalog is empty.
    pub fn get_all(&self) -> ManagerResult<Vec<Book>> {
        let books = self.repo.find_all()?;
        if books.is_empty() {
            debug!("event=book_list module=manager status=empty");
            return Err(ManagerError::NoBooks);
        }
        debug!(
            "event=book_list module=manager status=ok count={}",
            books.len()
        );
        Ok(books)
    }

    /// Returns the book with the given ISBN.
    ///
    /// # Errors
    /// - `EmptyIsbn` for empty or whitespace-only input.
    /// - `BookNotFound` when no stored record has this ISBN.
    pub fn get_specific(&self, isbn: &str) -> ManagerResult<Book> {
        ensure_isbn_present("book_get", isbn)?;
        self.repo
            .find_by_isbn(isbn)?
            .ok_or_else(|| not_found("book_get", isbn))
    }

    /// Returns books whose title contains `fragment`, ignoring case.
    ///
    /// # Errors
    /// - `EmptyTitleFragment` for empty or whitespace-only input.
    /// - `NoTitleMatches` when nothing matches.
    pub fn search_by_title(&self, fragment: &str) -> ManagerResult<Vec<Book>> {
        if is_blank(fragment) {
            debug!("event=book_search module=manager status=rejected reason=empty_fragment");
            return Err(ManagerError::EmptyTitleFragment);
        }

        let books = self
            .repo
            .find_where(&BookFilter::TitleContains(fragment.to_string()))?;
        if books.is_empty() {
            debug!("event=book_search module=manager status=empty");
            return Err(ManagerError::NoTitleMatches);
        }
        debug!(
            "event=book_search module=manager status=ok count={}",
            books.len()
        );
        Ok(books)
    }
}

fn ensure_valid(event: &str, book: &Book) -> ManagerResult<()> {
    validate_book(book).map_err(|err| {
        // Field values stay out of logs; the rule name is enough.
        warn!(
            "event={event} module=manager status=rejected reason=invalid_book rule={}",
            rule_name(&err)
        );
        ManagerError::InvalidBook(err)
    })
}

fn ensure_isbn_present(event: &str, isbn: &str) -> ManagerResult<()> {
    if is_blank(isbn) {
        debug!("event={event} module=manager status=rejected reason=empty_isbn");
        return Err(ManagerError::EmptyIsbn);
    }
    Ok(())
}

fn not_found(event: &str, isbn: &str) -> ManagerError {
    debug!("event={event} module=manager status=not_found isbn={isbn}");
    ManagerError::BookNotFound(isbn.to_string())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn rule_name(err: &BookValidationError) -> &'static str {
    match err {
        BookValidationError::MissingField(field) => *field,
        BookValidationError::FieldTooLong { field, .. } => *field,
        BookValidationError::InvalidIsbn(_) => "isbn",
        BookValidationError::YearOutOfRange { .. } => "year_published",
        BookValidationError::InvalidPages(_) => "pages",
        BookValidationError::InvalidPrice(_) => "price",
    }
}

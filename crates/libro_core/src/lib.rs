//! Core catalog logic for Libro.
//! This crate owns the book field rules and the manager contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::book::Book;
pub use model::validation::{is_valid, validate_book, BookValidationError};
pub use repo::book_repo::{BookFilter, BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use repo::memory_repo::InMemoryBookRepository;
pub use seed::{parse_seed_books, seed_catalog, seed_default_catalog, SeedError};
pub use service::book_manager::{BookManager, ErrorKind, ManagerError, ManagerResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

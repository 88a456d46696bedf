//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed CRUD and filtered reads over the `books` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every operation is a single SQL statement.
//! - Reads return books in insertion order.

use crate::db::schema::{ensure_catalog_schema, register_fold_function};
use crate::db::DbError;
use crate::model::book::{fold_case, Book};
use rusqlite::{ffi, params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    isbn,
    title,
    author,
    year_published,
    genre,
    pages,
    price
FROM books";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for book storage operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Store-level uniqueness violation on insert.
    DuplicateIsbn(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateIsbn(isbn) => write!(f, "a book with ISBN {isbn} already exists"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateIsbn(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Predicate for filtered book reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    /// Case-insensitive substring match on the title.
    ///
    /// Both sides go through [`fold_case`], so non-ASCII letters match too.
    TitleContains(String),
}

impl BookFilter {
    /// Evaluates this predicate against one book.
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Self::TitleContains(fragment) => {
                fold_case(&book.title).contains(&fold_case(fragment))
            }
        }
    }
}

/// Persistence collaborator for catalog books, keyed by ISBN.
pub trait BookRepository {
    /// Inserts a new book. Fails with `DuplicateIsbn` when the key exists.
    fn insert(&self, book: &Book) -> RepoResult<()>;
    fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>>;
    fn find_all(&self) -> RepoResult<Vec<Book>>;
    fn find_where(&self, filter: &BookFilter) -> RepoResult<Vec<Book>>;
    /// Replaces every field of the row whose ISBN matches `book.isbn`.
    ///
    /// Returns `false` when no row matched.
    fn update(&self, book: &Book) -> RepoResult<bool>;
    /// Returns `false` when no row matched.
    fn delete_by_isbn(&self, isbn: &str) -> RepoResult<bool>;
}

impl<R: BookRepository + ?Sized> BookRepository for &R {
    fn insert(&self, book: &Book) -> RepoResult<()> {
        (**self).insert(book)
    }

    fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        (**self).find_by_isbn(isbn)
    }

    fn find_all(&self) -> RepoResult<Vec<Book>> {
        (**self).find_all()
    }

    fn find_where(&self, filter: &BookFilter) -> RepoResult<Vec<Book>> {
        (**self).find_where(filter)
    }

    fn update(&self, book: &Book) -> RepoResult<bool> {
        (**self).update(book)
    }

    fn delete_by_isbn(&self, isbn: &str) -> RepoResult<bool> {
        (**self).delete_by_isbn(isbn)
    }
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Also (re)registers the `fold` SQL function on `conn`.
    ///
    /// # Errors
    /// - `Db(SchemaNotMigrated)` when migrations were not applied.
    /// - `Db(MissingTable)` / `Db(MissingColumn)` for a hand-altered schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_schema(conn)?;
        register_fold_function(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert(&self, book: &Book) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO books (
                isbn,
                title,
                author,
                year_published,
                genre,
                pages,
                price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                book.isbn.as_str(),
                book.title.as_str(),
                book.author.as_str(),
                book.year_published,
                book.genre.as_str(),
                book.pages,
                book.price,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateIsbn(book.isbn.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE isbn = ?1;"))?;

        let mut rows = stmt.query([isbn])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_books(&mut rows)
    }

    fn find_where(&self, filter: &BookFilter) -> RepoResult<Vec<Book>> {
        match filter {
            BookFilter::TitleContains(fragment) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{BOOK_SELECT_SQL}
                     WHERE fold(title) LIKE fold(?1) ESCAPE '\\'
                     ORDER BY id ASC;"
                ))?;
                let mut rows = stmt.query([like_contains_pattern(fragment)])?;
                collect_books(&mut rows)
            }
        }
    }

    fn update(&self, book: &Book) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author = ?2,
                year_published = ?3,
                genre = ?4,
                pages = ?5,
                price = ?6
             WHERE isbn = ?7;",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.year_published,
                book.genre.as_str(),
                book.pages,
                book.price,
                book.isbn.as_str(),
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete_by_isbn(&self, isbn: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE isbn = ?1;", [isbn])?;
        Ok(changed > 0)
    }
}

fn collect_books(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Book>> {
    let mut books = Vec::new();
    while let Some(row) = rows.next()? {
        books.push(parse_book_row(row)?);
    }
    Ok(books)
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    Ok(Book {
        isbn: row.get("isbn")?,
        title: row.get("title")?,
        author: row.get("author")?,
        year_published: row.get("year_published")?,
        genre: row.get("genre")?,
        pages: row.get("pages")?,
        price: row.get("price")?,
    })
}

/// Only UNIQUE violations mean a duplicate key; NOT NULL, CHECK and
/// trigger aborts stay plain database errors.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Builds a `LIKE` pattern matching `fragment` anywhere, with `\` as escape.
fn like_contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

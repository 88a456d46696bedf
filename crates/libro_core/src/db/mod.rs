//! Catalog storage bootstrap.
//!
//! # Responsibility
//! - Open SQLite connections that are ready to hold books.
//! - Own the catalog schema: migrations, required columns, SQL helpers.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A connection handed to a repository has passed
//!   [`schema::ensure_catalog_schema`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage failure or a catalog schema that cannot be used.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer catalog binary.
    SchemaTooNew { db_version: u32, latest_supported: u32 },
    /// Connection was not opened through [`open_db`] / [`open_db_in_memory`].
    SchemaNotMigrated { expected: u32, actual: u32 },
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::SchemaNotMigrated { expected, actual } => write!(
                f,
                "catalog schema is at version {actual}, expected {expected}; open the database with db::open_db"
            ),
            Self::MissingTable(table) => write!(f, "catalog table `{table}` is missing"),
            Self::MissingColumn { table, column } => {
                write!(f, "catalog table `{table}` has no `{column}` column")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

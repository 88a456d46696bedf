//! Catalog schema facts and SQL helpers.
//!
//! # Responsibility
//! - Assert that a connection holds a usable `books` table.
//! - Register the case-folding SQL function used by title search.
//!
//! # Invariants
//! - `fold(text)` in SQL and [`fold_case`] in Rust produce identical output.

use crate::db::migrations::latest_version;
use crate::db::{DbError, DbResult};
use crate::model::book::fold_case;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub const BOOKS_TABLE: &str = "books";

/// Columns the repository reads or writes. `id` only orders rows.
pub const BOOK_COLUMNS: [&str; 8] = [
    "id",
    "isbn",
    "title",
    "author",
    "year_published",
    "genre",
    "pages",
    "price",
];

/// Name of the SQL scalar registered by [`register_fold_function`].
pub const FOLD_FUNCTION: &str = "fold";

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Checks that `conn` is migrated and carries every book column.
///
/// # Errors
/// - `SchemaNotMigrated` when `user_version` differs from the latest migration.
/// - `MissingTable` / `MissingColumn` when the table was altered by hand.
pub fn ensure_catalog_schema(conn: &Connection) -> DbResult<()> {
    let expected = latest_version();
    let actual = schema_version(conn)?;
    if actual != expected {
        return Err(DbError::SchemaNotMigrated { expected, actual });
    }

    let present = table_columns(conn, BOOKS_TABLE)?;
    if present.is_empty() {
        return Err(DbError::MissingTable(BOOKS_TABLE));
    }
    if let Some(column) = BOOK_COLUMNS
        .iter()
        .copied()
        .find(|column| !present.iter().any(|name| name == column))
    {
        return Err(DbError::MissingColumn {
            table: BOOKS_TABLE,
            column,
        });
    }

    Ok(())
}

/// Registers `fold(text)` on `conn`. Re-registering replaces the function.
pub fn register_fold_function(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<String>(0)?;
            Ok(fold_case(&value))
        },
    )?;
    Ok(())
}

/// Column names of `table`; empty when the table does not exist.
pub(crate) fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

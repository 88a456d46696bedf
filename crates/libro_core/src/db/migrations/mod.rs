//! Catalog schema migrations.
//!
//! # Responsibility
//! - List catalog schema steps in version order.
//! - Bring a connection from its recorded version to the latest one.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per step.
//! - All pending steps commit together or not at all.

use crate::db::schema::schema_version;
use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
}

const CATALOG_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_books",
    sql: include_str!("0001_books.sql"),
}];

/// Every migration this binary knows, oldest first.
pub fn migrations() -> &'static [Migration] {
    CATALOG_MIGRATIONS
}

/// Latest schema version this binary can read and write.
pub fn latest_version() -> u32 {
    CATALOG_MIGRATIONS
        .last()
        .map_or(0, |migration| migration.version)
}

/// Steps still to run on a database recorded at `current`.
pub fn pending(current: u32) -> impl Iterator<Item = &'static Migration> {
    CATALOG_MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > current)
}

/// Runs every pending step in one transaction.
///
/// # Errors
/// - `DbError::SchemaTooNew` when the file was written by a newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest_supported = latest_version();
    if from_version > latest_supported {
        return Err(DbError::SchemaTooNew {
            db_version: from_version,
            latest_supported,
        });
    }

    let tx = conn.transaction()?;
    let mut applied = 0;
    for migration in pending(from_version) {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        info!(
            "event=db_migrate module=db status=step version={} name={}",
            migration.version, migration.name
        );
        applied += 1;
    }
    tx.commit()?;

    if applied > 0 {
        info!(
            "event=db_migrate module=db status=ok from_version={from_version} to_version={latest_supported} steps={applied}"
        );
    }
    Ok(())
}

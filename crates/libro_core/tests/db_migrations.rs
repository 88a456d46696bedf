use libro_core::db::migrations::{apply_migrations, latest_version};
use libro_core::db::schema::{ensure_catalog_schema, schema_version, BOOKS_TABLE, BOOK_COLUMNS};
use libro_core::db::{open_db, open_db_in_memory, DbError};
use libro_core::{Book, BookRepository, SqliteBookRepository};
use rusqlite::Connection;

struct ColumnInfo {
    name: String,
    declared_type: String,
    not_null: bool,
    primary_key: bool,
}

fn book_columns(conn: &Connection) -> Vec<ColumnInfo> {
    let mut stmt = conn.prepare("PRAGMA table_info(books);").unwrap();
    stmt.query_map([], |row| {
        Ok(ColumnInfo {
            name: row.get("name")?,
            declared_type: row.get("type")?,
            not_null: row.get::<_, i64>("notnull")? == 1,
            primary_key: row.get::<_, i64>("pk")? == 1,
        })
    })
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}

fn book(isbn: &str) -> Book {
    Book {
        title: "Any".to_string(),
        author: "John Doe".to_string(),
        isbn: isbn.to_string(),
        year_published: 2021,
        genre: "Fiction".to_string(),
        pages: 100,
        price: 19.99,
    }
}

#[test]
fn books_table_has_every_catalog_column() {
    let conn = open_db_in_memory().unwrap();

    let names: Vec<_> = book_columns(&conn).into_iter().map(|c| c.name).collect();
    assert_eq!(names, BOOK_COLUMNS);
    ensure_catalog_schema(&conn).unwrap();
}

#[test]
fn id_is_the_integer_ordering_key() {
    let conn = open_db_in_memory().unwrap();
    let columns = book_columns(&conn);

    let id = columns.iter().find(|c| c.name == "id").unwrap();
    assert!(id.primary_key);
    assert_eq!(id.declared_type, "INTEGER");
    assert!(columns.iter().filter(|c| c.primary_key).count() == 1);
}

#[test]
fn every_book_column_is_not_null() {
    let conn = open_db_in_memory().unwrap();

    for column in book_columns(&conn).iter().filter(|c| c.name != "id") {
        assert!(column.not_null, "column {} accepts NULL", column.name);
    }
}

#[test]
fn deleted_ids_are_not_reused_so_reinserted_books_sort_last() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.insert(&book("1234567890123")).unwrap();
    repo.insert(&book("1234567890124")).unwrap();
    repo.delete_by_isbn("1234567890124").unwrap();
    repo.delete_by_isbn("1234567890123").unwrap();
    repo.insert(&book("1234567890124")).unwrap();
    repo.insert(&book("1234567890123")).unwrap();

    let order: Vec<_> = repo.find_all().unwrap().into_iter().map(|b| b.isbn).collect();
    assert_eq!(order, ["1234567890124", "1234567890123"]);
}

#[test]
fn open_db_registers_unicode_fold_function() {
    let conn = open_db_in_memory().unwrap();

    let folded: String = conn
        .query_row("SELECT fold('ÉLAN Vital');", [], |row| row.get(0))
        .unwrap();
    assert_eq!(folded, "élan vital");
}

#[test]
fn reopening_a_catalog_file_keeps_latest_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libro.db");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn newer_catalog_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_check_reports_missing_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "user_version", latest_version())
        .unwrap();

    assert!(matches!(
        ensure_catalog_schema(&conn),
        Err(DbError::MissingTable(table)) if table == BOOKS_TABLE
    ));
}

#[test]
fn schema_check_reports_hand_altered_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            isbn TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            year_published INTEGER NOT NULL,
            genre TEXT NOT NULL,
            pages INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.pragma_update(None, "user_version", latest_version())
        .unwrap();

    assert!(matches!(
        ensure_catalog_schema(&conn),
        Err(DbError::MissingColumn {
            table: "books",
            column: "price"
        })
    ));
}

#[test]
fn migrating_twice_is_a_no_op() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    ensure_catalog_schema(&conn).unwrap();
}

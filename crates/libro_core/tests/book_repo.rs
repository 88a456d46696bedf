use libro_core::db::migrations::{apply_migrations, latest_version};
use libro_core::db::{open_db, open_db_in_memory, DbError};
use libro_core::{Book, BookFilter, BookRepository, RepoError, SqliteBookRepository};
use rusqlite::Connection;

fn book(isbn: &str, title: &str) -> Book {
    Book {
        title: title.to_string(),
        author: "John Doe".to_string(),
        isbn: isbn.to_string(),
        year_published: 2021,
        genre: "Fiction".to_string(),
        pages: 100,
        price: 19.99,
    }
}

#[test]
fn insert_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let stored = book("1234567890123", "Test Book");
    repo.insert(&stored).unwrap();

    assert_eq!(repo.find_by_isbn("1234567890123").unwrap(), Some(stored));
    assert_eq!(repo.find_by_isbn("1234567890124").unwrap(), None);
}

#[test]
fn insert_duplicate_isbn_returns_duplicate_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.insert(&book("1234567890123", "First")).unwrap();
    let err = repo.insert(&book("1234567890123", "Second")).unwrap_err();

    assert!(matches!(err, RepoError::DuplicateIsbn(isbn) if isbn == "1234567890123"));
}

#[test]
fn update_and_delete_report_whether_a_row_matched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let mut stored = book("1234567890123", "Draft");
    repo.insert(&stored).unwrap();

    stored.title = "Final".to_string();
    stored.price = 0.0;
    assert!(repo.update(&stored).unwrap());
    assert!(!repo.update(&book("1234567890124", "Missing")).unwrap());
    assert_eq!(repo.find_by_isbn(&stored.isbn).unwrap(), Some(stored));

    assert!(repo.delete_by_isbn("1234567890123").unwrap());
    assert!(!repo.delete_by_isbn("1234567890123").unwrap());
    assert!(repo.find_all().unwrap().is_empty());
}

#[test]
fn find_all_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let isbns = ["9780547928227", "0306406152", "9780061120084"];
    for isbn in isbns {
        repo.insert(&book(isbn, "Any")).unwrap();
    }

    let loaded: Vec<_> = repo
        .find_all()
        .unwrap()
        .into_iter()
        .map(|book| book.isbn)
        .collect();
    assert_eq!(loaded, isbns);
}

#[test]
fn title_filter_treats_like_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.insert(&book("1234567890123", "100% Pure")).unwrap();
    repo.insert(&book("1234567890124", "1000 Years")).unwrap();
    repo.insert(&book("1234567890125", "snake_case")).unwrap();
    repo.insert(&book("1234567890126", "snakeXcase")).unwrap();

    let percent = repo
        .find_where(&BookFilter::TitleContains("100%".to_string()))
        .unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].title, "100% Pure");

    let underscore = repo
        .find_where(&BookFilter::TitleContains("E_C".to_string()))
        .unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].title, "snake_case");
}

#[test]
fn books_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libro.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteBookRepository::try_new(&conn).unwrap();
        repo.insert(&book("1234567890123", "Test Book")).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBookRepository::try_new(&conn) {
        Err(RepoError::Db(DbError::SchemaNotMigrated {
            expected,
            actual: 0,
        })) => assert_eq!(expected, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected unmigrated schema error"),
    }
}

#[test]
fn repository_registers_fold_on_externally_migrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.insert(&book("1234567890123", "Élan Vital")).unwrap();

    let found = repo
        .find_where(&BookFilter::TitleContains("élan".to_string()))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Élan Vital");
}

#[test]
fn non_unique_constraint_failures_are_not_duplicates() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_free_books BEFORE INSERT ON books
         WHEN NEW.price = 0
         BEGIN
             SELECT RAISE(ABORT, 'free books are not stocked');
         END;",
    )
    .unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let mut free = book("1234567890123", "Giveaway");
    free.price = 0.0;
    let err = repo.insert(&free).unwrap_err();

    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))), "got {err:?}");
    assert!(repo.find_all().unwrap().is_empty());
}

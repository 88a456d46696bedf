//! Console harness for the Libro catalog.
//!
//! # Responsibility
//! - Map subcommands onto `BookManager` operations.
//! - Print one line per book and report manager errors on stderr.

use clap::{Args, Parser, Subcommand};
use libro_core::db::open_db;
use libro_core::{
    default_log_level, init_logging, parse_seed_books, seed_catalog, seed_default_catalog, Book,
    BookManager, LogTarget, SqliteBookRepository,
};
use log::error;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "libro", version, about = "Book catalog management")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "LIBRO_DB", default_value = "libro.db")]
    db: PathBuf,

    /// trace|debug|info|warn|error; defaults by build mode
    #[arg(long, env = "LIBRO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset
    #[arg(long, env = "LIBRO_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new book
    Add(BookArgs),
    /// Replace the book with the same ISBN
    Update(BookArgs),
    /// Delete a book by ISBN
    Delete { isbn: String },
    /// Show one book by ISBN
    Get { isbn: String },
    /// List every book
    List,
    /// Find books whose title contains FRAGMENT, ignoring case
    Search { fragment: String },
    /// Load the built-in ten-book catalog, or a JSON array of books
    Seed {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long)]
    isbn: String,
    #[arg(long)]
    year: i32,
    #[arg(long)]
    genre: String,
    #[arg(long, allow_negative_numbers = true)]
    pages: i32,
    #[arg(long, allow_negative_numbers = true)]
    price: f64,
}

impl From<BookArgs> for Book {
    fn from(args: BookArgs) -> Self {
        Self {
            title: args.title,
            author: args.author,
            isbn: args.isbn,
            year_published: args.year,
            genre: args.genre,
            pages: args.pages,
            price: args.price,
        }
    }
}

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let target = cli.log_dir.clone().map_or(LogTarget::Stderr, LogTarget::Directory);
    if let Err(err) = init_logging(level, target) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let status = execute(cli, &mut io::stdout().lock(), &mut io::stderr().lock());
    ExitCode::from(status)
}

/// Runs one command, writing results to `out` and the failure message to
/// `err`. Returns the process exit status.
fn execute(cli: Cli, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
    match run(cli, out) {
        Ok(()) => EXIT_OK,
        Err(failure) => {
            error!("event=cli_command module=cli status=error error={failure}");
            let _ = writeln!(err, "{failure}");
            EXIT_FAILURE
        }
    }
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&cli.db)?;
    let manager = BookManager::new(SqliteBookRepository::try_new(&conn)?);

    match cli.command {
        Command::Add(args) => {
            let book = Book::from(args);
            manager.add(&book)?;
            writeln!(out, "added {}", book.isbn)?;
        }
        Command::Update(args) => {
            let book = Book::from(args);
            manager.update(&book)?;
            writeln!(out, "updated {}", book.isbn)?;
        }
        Command::Delete { isbn } => {
            manager.delete(&isbn)?;
            writeln!(out, "deleted {isbn}")?;
        }
        Command::Get { isbn } => print_book(out, &manager.get_specific(&isbn)?)?,
        Command::List => print_books(out, &manager.get_all()?)?,
        Command::Search { fragment } => print_books(out, &manager.search_by_title(&fragment)?)?,
        Command::Seed { file } => {
            let count = match file {
                Some(path) => {
                    let books = parse_seed_books(&std::fs::read_to_string(path)?)?;
                    seed_catalog(&manager, &books)?
                }
                None => seed_default_catalog(&manager)?,
            };
            writeln!(out, "seeded {count} books")?;
        }
    }

    Ok(())
}

fn print_books(out: &mut dyn Write, books: &[Book]) -> io::Result<()> {
    books.iter().try_for_each(|book| print_book(out, book))
}

fn print_book(out: &mut dyn Write, book: &Book) -> io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{:.2}",
        book.isbn,
        book.title,
        book.author,
        book.year_published,
        book.genre,
        book.pages,
        book.price
    )
}

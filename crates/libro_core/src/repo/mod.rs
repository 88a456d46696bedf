//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence contract consumed by `BookManager`.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repositories never validate books; the manager boundary does.
//! - "No matching row" is reported as `Ok(None)`/`Ok(false)`, not as an error.

pub mod book_repo;
pub mod memory_repo;

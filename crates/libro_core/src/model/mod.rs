//! Catalog domain model.
//!
//! # Responsibility
//! - Define the `Book` record shared by every catalog layer.
//! - Own the field rules a book must satisfy before it is persisted.
//!
//! # Invariants
//! - ISBN is the only identity exposed to callers.
//! - Validation is pure: no clock access beyond reading the current year.

pub mod book;
pub mod validation;

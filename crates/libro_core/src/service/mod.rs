//! Catalog use-case services.
//!
//! # Responsibility
//! - Validate caller input before any store access.
//! - Translate empty results into caller-facing not-found errors.

pub mod book_manager;

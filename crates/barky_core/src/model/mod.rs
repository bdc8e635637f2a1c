//! Storage-agnostic domain model.
//!
//! # Responsibility
//! - Define the bookmark record used by repositories and services.
//! - Keep storage representations out of domain signatures.
//!
//! # Invariants
//! - Every bookmark is identified by a `BookmarkId`.
//! - Domain values compare by content, never by reference.

pub mod bookmark;

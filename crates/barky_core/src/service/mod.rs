//! Core use-case services.
//!
//! # Responsibility
//! - Turn single repository calls into committed units of work.
//! - Keep request-handling layers decoupled from storage details.

pub mod bookmark_service;

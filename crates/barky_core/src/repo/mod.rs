//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage-independent bookmark operation set.
//! - Isolate SQLite row details from services and units of work.
//!
//! # Invariants
//! - Lookup misses are `Ok(None)` or a silent `Ok(())`, never an error.
//! - Store faults surface unchanged as `RepoError::Db`.

pub mod bookmark_repo;
pub mod passthrough_repo;

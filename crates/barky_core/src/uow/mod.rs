//! Units of work: transactional scopes around a bookmark repository.
//!
//! # Responsibility
//! - Group repository operations into one atomic transaction.
//! - Hand out a repository whose seen set lives exactly as long as the scope.
//!
//! # Invariants
//! - Leaving a scope without `commit()` rolls back every write, on normal
//!   exit, early `?` return and panic unwinding alike.
//! - A scope resolves at most once: after `commit()` or `rollback()` it holds
//!   no transaction and refuses further writes and resolutions.
//! - A unit of work is used by one caller at a time.

use crate::repo::bookmark_repo::{BookmarkRepository, RepoResult};
use std::fmt::{Display, Formatter};

mod passthrough_uow;
mod sqlite_uow;

pub use passthrough_uow::{PassThroughFactory, PassThroughUnitOfWork};
pub use sqlite_uow::{run_unit_of_work, SqliteUnitOfWork};

/// Lifecycle of a unit of work while its scope is open.
///
/// Dropping the value ends the scope; there is no separate inactive state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UowState {
    /// Scope entered, nothing committed or rolled back yet.
    #[default]
    Active,
    /// `commit()` succeeded.
    Committed,
    /// `rollback()` was called explicitly, or `commit()` failed.
    RolledBack,
}

impl UowState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }
}

impl Display for UowState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transactional scope over a bookmark repository.
pub trait UnitOfWork {
    type Repository: BookmarkRepository;

    /// Repository bound to this scope's transaction.
    fn bookmarks(&mut self) -> &mut Self::Repository;

    /// Durably persists every write since the scope began.
    ///
    /// # Errors
    /// - `ScopeResolved` when the scope was already committed or rolled back.
    fn commit(&mut self) -> RepoResult<()>;

    /// Discards every write since the scope began.
    ///
    /// # Errors
    /// - `ScopeResolved` when the scope was already committed or rolled back.
    fn rollback(&mut self) -> RepoResult<()>;

    fn state(&self) -> UowState;
}

/// Opens one fresh unit of work per call.
pub trait UnitOfWorkFactory {
    type Work: UnitOfWork;

    fn begin(&self) -> RepoResult<Self::Work>;
}

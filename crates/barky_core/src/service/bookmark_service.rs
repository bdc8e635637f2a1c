//! Bookmark use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for request handlers.
//! - Run every call in its own unit of work: one repository call, then commit.
//!
//! # Invariants
//! - A failed call is never committed; the unit of work's exit rollback
//!   discards it.
//! - No transaction or seen set outlives a call.
//! - The service stays storage-agnostic.

use crate::model::bookmark::{Bookmark, BookmarkChanges, BookmarkId, ChangeError};
use crate::repo::bookmark_repo::{BookmarkRepository, RepoError, RepoResult};
use crate::uow::{UnitOfWork, UnitOfWorkFactory};
use thiserror::Error;

type RepositoryOf<F> = <<F as UnitOfWorkFactory>::Work as UnitOfWork>::Repository;

/// Failure of a service call that accepts raw field updates.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Change(#[from] ChangeError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Use-case wrapper that opens a unit of work per call.
pub struct BookmarkService<F> {
    sessions: F,
}

impl<F: UnitOfWorkFactory> BookmarkService<F> {
    pub fn new(sessions: F) -> Self {
        Self { sessions }
    }

    /// Runs `work` against a fresh repository and commits when it succeeds.
    ///
    /// On error nothing is committed and the unit of work rolls back before
    /// this returns.
    pub fn with_bookmarks<T, W>(&self, work: W) -> RepoResult<T>
    where
        W: FnOnce(&mut RepositoryOf<F>) -> RepoResult<T>,
    {
        let mut uow = self.sessions.begin()?;
        let value = work(uow.bookmarks())?;
        uow.commit()?;
        Ok(value)
    }

    /// Adds or replaces a bookmark.
    pub fn add_bookmark(&self, bookmark: Bookmark) -> RepoResult<()> {
        self.with_bookmarks(|repo| repo.add(bookmark))
    }

    /// Gets one bookmark by id; `None` when absent.
    pub fn get_bookmark(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>> {
        self.with_bookmarks(|repo| repo.get(id))
    }

    pub fn list_bookmarks(&self) -> RepoResult<Vec<Bookmark>> {
        self.with_bookmarks(|repo| repo.list())
    }

    /// Applies `changes`. A missing id is not an error.
    pub fn edit_bookmark(&self, id: BookmarkId, changes: &BookmarkChanges) -> RepoResult<()> {
        self.with_bookmarks(|repo| repo.edit(id, changes))
    }

    /// Parses `(field, value)` pairs and applies them like `edit_bookmark`.
    ///
    /// Unknown or immutable field names are rejected before a unit of work is
    /// opened.
    pub fn edit_bookmark_fields<I, K, V>(
        &self,
        id: BookmarkId,
        fields: I,
    ) -> Result<(), ServiceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let changes = BookmarkChanges::from_fields(fields)?;
        self.edit_bookmark(id, &changes)?;
        Ok(())
    }

    /// Deletes by id. A missing id is not an error.
    pub fn delete_bookmark(&self, id: BookmarkId) -> RepoResult<()> {
        self.with_bookmarks(|repo| repo.delete(id))
    }
}

//! Repository for bookmarks owned by an upstream service.
//!
//! # Responsibility
//! - Expose the `BookmarkRepository` operation set when persistence and
//!   transactional integrity belong to an external API.
//!
//! # Invariants
//! - No operation touches local storage.
//! - Nothing is ever recorded as seen.

use crate::model::bookmark::{Bookmark, BookmarkChanges, BookmarkId};
use crate::repo::bookmark_repo::{BookmarkRepository, RepoResult, SeenBookmarks};
use log::trace;

/// No-op repository; every call succeeds and stores nothing.
#[derive(Debug, Default)]
pub struct PassThroughBookmarkRepository {
    seen: SeenBookmarks,
}

impl PassThroughBookmarkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookmarkRepository for PassThroughBookmarkRepository {
    fn seen(&self) -> &SeenBookmarks {
        &self.seen
    }

    fn seen_mut(&mut self) -> &mut SeenBookmarks {
        &mut self.seen
    }

    fn upsert(&mut self, bookmark: &Bookmark) -> RepoResult<()> {
        trace!(
            "event=bookmark_upsert module=repo store=passthrough id={}",
            bookmark.id
        );
        Ok(())
    }

    fn lookup(&self, _id: BookmarkId) -> RepoResult<Option<Bookmark>> {
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Bookmark>> {
        Ok(Vec::new())
    }

    fn delete(&mut self, id: BookmarkId) -> RepoResult<()> {
        trace!("event=bookmark_delete module=repo store=passthrough id={id}");
        Ok(())
    }

    fn edit(&mut self, id: BookmarkId, _changes: &BookmarkChanges) -> RepoResult<()> {
        trace!("event=bookmark_edit module=repo store=passthrough id={id}");
        Ok(())
    }

    // The upstream service tracks its own entities.
    fn add(&mut self, bookmark: Bookmark) -> RepoResult<()> {
        self.upsert(&bookmark)
    }
}

use super::{UnitOfWork, UnitOfWorkFactory, UowState};
use crate::repo::bookmark_repo::{RepoError, RepoResult};
use crate::repo::passthrough_repo::PassThroughBookmarkRepository;

/// Unit of work for bookmarks persisted by an upstream service.
///
/// The service owns durability, so commit and rollback only move the state.
#[derive(Debug, Default)]
pub struct PassThroughUnitOfWork {
    bookmarks: PassThroughBookmarkRepository,
    state: UowState,
}

impl PassThroughUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&mut self, state: UowState) -> RepoResult<()> {
        if self.state != UowState::Active {
            return Err(RepoError::ScopeResolved(self.state));
        }
        self.state = state;
        Ok(())
    }
}

impl UnitOfWork for PassThroughUnitOfWork {
    type Repository = PassThroughBookmarkRepository;

    fn bookmarks(&mut self) -> &mut Self::Repository {
        &mut self.bookmarks
    }

    fn commit(&mut self) -> RepoResult<()> {
        self.resolve(UowState::Committed)
    }

    fn rollback(&mut self) -> RepoResult<()> {
        self.resolve(UowState::RolledBack)
    }

    fn state(&self) -> UowState {
        self.state
    }
}

/// Hands out [`PassThroughUnitOfWork`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughFactory;

impl UnitOfWorkFactory for PassThroughFactory {
    type Work = PassThroughUnitOfWork;

    fn begin(&self) -> RepoResult<PassThroughUnitOfWork> {
        Ok(PassThroughUnitOfWork::new())
    }
}

//! Data-access core for the Barky bookmark manager.
//! Repositories translate bookmarks to storage; units of work own transactions.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod uow;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::bookmark::{Bookmark, BookmarkChanges, BookmarkId, ChangeError};
pub use repo::bookmark_repo::{
    BookmarkRepository, RepoError, RepoResult, SeenBookmarks, SqliteBookmarkRepository,
};
pub use repo::passthrough_repo::PassThroughBookmarkRepository;
pub use service::bookmark_service::{BookmarkService, ServiceError};
pub use uow::{
    run_unit_of_work, PassThroughFactory, PassThroughUnitOfWork, SqliteUnitOfWork, UnitOfWork,
    UnitOfWorkFactory, UowState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! SQLite unit of work.
//!
//! # Responsibility
//! - Open an IMMEDIATE transaction per scope and bind a fresh repository to it.
//! - Roll back whatever is still uncommitted when the scope is dropped.
//!
//! # Invariants
//! - The transaction (and its write lock) lives only while the state is
//!   `Active`; `commit()`/`rollback()` release it for good.
//! - Once resolved, repository writes fail with `ScopeResolved` instead of
//!   running in autocommit. Reads keep working.
//! - `Drop` never panics; rollback failures are logged.

use super::{UnitOfWork, UnitOfWorkFactory, UowState};
use crate::repo::bookmark_repo::{
    BookmarkRepository, RepoError, RepoResult, SqliteBookmarkRepository,
};
use log::{error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Unit of work over one borrowed SQLite connection.
pub struct SqliteUnitOfWork<'conn> {
    bookmarks: SqliteBookmarkRepository<&'conn Connection>,
    tx: Option<Transaction<'conn>>,
    state: UowState,
    started_at: Instant,
}

impl<'conn> SqliteUnitOfWork<'conn> {
    /// Enters a scope: begins a transaction and binds a fresh repository.
    ///
    /// # Errors
    /// - Repository readiness errors when `conn` is not migrated.
    /// - `Db` when a transaction is already open on `conn` or SQLite is busy.
    pub fn begin(conn: &'conn Connection) -> RepoResult<Self> {
        let bookmarks = SqliteBookmarkRepository::try_new(conn)?;
        let tx = open_transaction(conn)?;
        info!("event=uow_begin module=uow status=ok");
        Ok(Self {
            bookmarks,
            tx: Some(tx),
            state: UowState::Active,
            started_at: Instant::now(),
        })
    }

    fn take_transaction(&mut self) -> RepoResult<Transaction<'conn>> {
        self.tx.take().ok_or(RepoError::ScopeResolved(self.state))
    }

    fn resolve(&mut self, state: UowState) {
        self.state = state;
        self.bookmarks.close_writes(state);
    }
}

impl<'conn> UnitOfWork for SqliteUnitOfWork<'conn> {
    type Repository = SqliteBookmarkRepository<&'conn Connection>;

    fn bookmarks(&mut self) -> &mut Self::Repository {
        &mut self.bookmarks
    }

    fn commit(&mut self) -> RepoResult<()> {
        let tx = self.take_transaction()?;
        // A failed COMMIT leaves SQLite inside the transaction; rusqlite rolls
        // it back when `tx` is dropped.
        if let Err(err) = tx.commit() {
            self.resolve(UowState::RolledBack);
            error!("event=uow_commit module=uow status=error error={err}");
            return Err(err.into());
        }

        self.resolve(UowState::Committed);
        info!(
            "event=uow_commit module=uow status=ok seen={} elapsed_ms={}",
            self.bookmarks.seen().len(),
            self.started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn rollback(&mut self) -> RepoResult<()> {
        let tx = self.take_transaction()?;
        let outcome = tx.rollback();
        self.resolve(UowState::RolledBack);

        if let Err(err) = outcome {
            error!(
                "event=uow_rollback module=uow status=error trigger=explicit error={}",
                err
            );
            return Err(err.into());
        }
        info!("event=uow_rollback module=uow status=ok trigger=explicit");
        Ok(())
    }

    fn state(&self) -> UowState {
        self.state
    }
}

impl Drop for SqliteUnitOfWork<'_> {
    fn drop(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        match tx.rollback() {
            Ok(()) => info!(
                "event=uow_exit module=uow status=ok action=rollback elapsed_ms={}",
                self.started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=uow_exit module=uow status=error action=rollback error={}",
                err
            ),
        }
    }
}

impl<'conn> UnitOfWorkFactory for &'conn Connection {
    type Work = SqliteUnitOfWork<'conn>;

    fn begin(&self) -> RepoResult<SqliteUnitOfWork<'conn>> {
        SqliteUnitOfWork::begin(*self)
    }
}

/// Runs `work` inside a fresh unit of work on `conn`.
///
/// Anything `work` does not commit is rolled back before this returns, so an
/// error from `work` reaches the caller only after the rollback.
pub fn run_unit_of_work<'conn, T, E, F>(conn: &'conn Connection, work: F) -> Result<T, E>
where
    F: FnOnce(&mut SqliteUnitOfWork<'conn>) -> Result<T, E>,
    E: From<RepoError>,
{
    let mut uow = SqliteUnitOfWork::begin(conn)?;
    let result = work(&mut uow);
    drop(uow);
    result
}

fn open_transaction(conn: &Connection) -> RepoResult<Transaction<'_>> {
    Ok(Transaction::new_unchecked(
        conn,
        TransactionBehavior::Immediate,
    )?)
}

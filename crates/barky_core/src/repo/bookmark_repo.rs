//! Bookmark repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define `BookmarkRepository`, the operation set every store supports.
//! - Track bookmarks touched during a session in `SeenBookmarks`.
//! - Translate between `Bookmark` and rows of the `bookmarks` table.
//!
//! # Invariants
//! - `add`/`get` record into the seen set only after the store call succeeds.
//! - Reads always hit the store; the seen set is bookkeeping, not a cache.
//! - `delete`/`edit` on a missing id succeed without touching any row.
//! - A SQLite repository whose unit of work has resolved refuses writes.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::bookmark::{Bookmark, BookmarkChanges, BookmarkId, DATE_FORMAT};
use crate::uow::UowState;
use chrono::NaiveDate;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;
use std::ops::Deref;
use thiserror::Error;

const BOOKMARK_SELECT_SQL: &str = "SELECT
    id,
    title,
    url,
    notes,
    date_added
FROM bookmarks";

const BOOKMARKS_TABLE: &str = "bookmarks";
const BOOKMARK_COLUMNS: [&str; 5] = ["id", "title", "url", "notes", "date_added"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for bookmark persistence.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted bookmark data: {0}")]
    InvalidData(String),
    #[error(
        "connection schema version {actual_version} is behind required version {expected_version}"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("unit of work already {0}; begin a new one")]
    ScopeResolved(UowState),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Bookmarks a repository instance has added or fetched in its session.
///
/// Membership is by value: re-adding an equal bookmark is a no-op, while two
/// bookmarks sharing an id but differing in any field are both kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenBookmarks(HashSet<Bookmark>);

impl SeenBookmarks {
    /// Records `bookmark`; returns `false` when an equal one was already seen.
    pub fn insert(&mut self, bookmark: Bookmark) -> bool {
        self.0.insert(bookmark)
    }

    pub fn contains(&self, bookmark: &Bookmark) -> bool {
        self.0.contains(bookmark)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.0.iter()
    }

    /// Distinct ids among seen bookmarks, ascending.
    pub fn ids(&self) -> Vec<BookmarkId> {
        let mut ids: Vec<_> = self.0.iter().map(|bookmark| bookmark.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Operation set any bookmark store must support.
///
/// Implementors provide the store calls and own a [`SeenBookmarks`]; `add` and
/// `get` are provided on top and keep the seen set current.
pub trait BookmarkRepository {
    fn seen(&self) -> &SeenBookmarks;
    fn seen_mut(&mut self) -> &mut SeenBookmarks;

    /// Writes `bookmark`, inserting or replacing the record with its id.
    fn upsert(&mut self, bookmark: &Bookmark) -> RepoResult<()>;
    /// Reads one bookmark by id; `None` when absent.
    fn lookup(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>>;
    /// Returns every stored bookmark in store-native order.
    fn list(&self) -> RepoResult<Vec<Bookmark>>;
    /// Removes the bookmark with `id`; absent ids are not an error.
    fn delete(&mut self, id: BookmarkId) -> RepoResult<()>;
    /// Applies `changes` to the bookmark with `id`; absent ids are not an error.
    fn edit(&mut self, id: BookmarkId, changes: &BookmarkChanges) -> RepoResult<()>;

    /// Persists `bookmark` and records it as seen.
    fn add(&mut self, bookmark: Bookmark) -> RepoResult<()> {
        self.upsert(&bookmark)?;
        self.seen_mut().insert(bookmark);
        Ok(())
    }

    /// Fetches a bookmark by id, recording it as seen when found.
    fn get(&mut self, id: BookmarkId) -> RepoResult<Option<Bookmark>> {
        let found = self.lookup(id)?;
        if let Some(bookmark) = &found {
            self.seen_mut().insert(bookmark.clone());
        }
        Ok(found)
    }
}

/// SQLite-backed bookmark repository.
///
/// `C` is any handle that derefs to a connection: a plain `&Connection` for
/// autocommit use, or the connection a unit of work keeps inside its
/// transaction.
pub struct SqliteBookmarkRepository<C> {
    conn: C,
    seen: SeenBookmarks,
    closed_by: Option<UowState>,
}

impl<C: Deref<Target = Connection>> SqliteBookmarkRepository<C> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is off.
    pub fn try_new(conn: C) -> RepoResult<Self> {
        ensure_bookmark_connection_ready(&conn)?;
        Ok(Self {
            conn,
            seen: SeenBookmarks::default(),
            closed_by: None,
        })
    }

    /// Returns the number of stored bookmarks.
    pub fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bookmarks;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative bookmark count `{count}`")))
    }

    /// Refuses every later write; called when the owning unit of work resolves.
    pub(crate) fn close_writes(&mut self, state: UowState) {
        self.closed_by = Some(state);
    }

    fn ensure_writable(&self) -> RepoResult<()> {
        match self.closed_by {
            Some(state) => Err(RepoError::ScopeResolved(state)),
            None => Ok(()),
        }
    }
}

impl<C: Deref<Target = Connection>> BookmarkRepository for SqliteBookmarkRepository<C> {
    fn seen(&self) -> &SeenBookmarks {
        &self.seen
    }

    fn seen_mut(&mut self) -> &mut SeenBookmarks {
        &mut self.seen
    }

    fn upsert(&mut self, bookmark: &Bookmark) -> RepoResult<()> {
        self.ensure_writable()?;
        self.conn.execute(
            "INSERT INTO bookmarks (id, title, url, notes, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                url = excluded.url,
                notes = excluded.notes,
                date_added = excluded.date_added;",
            params![
                bookmark.id,
                bookmark.title.as_str(),
                bookmark.url.as_str(),
                bookmark.notes.as_str(),
                date_to_db(bookmark.date_added),
            ],
        )?;
        Ok(())
    }

    fn lookup(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOKMARK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_bookmark_row(row)?));
        }

        debug!("event=bookmark_get module=repo status=not_found id={id}");
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<Bookmark>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOKMARK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut bookmarks = Vec::new();
        while let Some(row) = rows.next()? {
            bookmarks.push(parse_bookmark_row(row)?);
        }
        Ok(bookmarks)
    }

    fn delete(&mut self, id: BookmarkId) -> RepoResult<()> {
        self.ensure_writable()?;
        let changed = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1;", [id])?;
        if changed == 0 {
            debug!("event=bookmark_delete module=repo status=skipped reason=not_found id={id}");
        }
        Ok(())
    }

    fn edit(&mut self, id: BookmarkId, changes: &BookmarkChanges) -> RepoResult<()> {
        self.ensure_writable()?;
        if changes.is_empty() {
            return Ok(());
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = &changes.title {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(url) = &changes.url {
            assignments.push("url = ?");
            bind_values.push(Value::Text(url.clone()));
        }
        if let Some(notes) = &changes.notes {
            assignments.push("notes = ?");
            bind_values.push(Value::Text(notes.clone()));
        }
        if let Some(date_added) = changes.date_added {
            assignments.push("date_added = ?");
            bind_values.push(Value::Text(date_to_db(date_added)));
        }
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE bookmarks SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            debug!("event=bookmark_edit module=repo status=skipped reason=not_found id={id}");
        }
        Ok(())
    }
}

fn parse_bookmark_row(row: &Row<'_>) -> RepoResult<Bookmark> {
    let date_text: String = row.get("date_added")?;
    let date_added = parse_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in bookmarks.date_added"
        ))
    })?;

    Ok(Bookmark {
        id: row.get("id")?,
        title: row.get("title")?,
        url: row.get("url")?,
        notes: row.get("notes")?,
        date_added,
    })
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn ensure_bookmark_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, BOOKMARKS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(BOOKMARKS_TABLE));
    }

    for column in BOOKMARK_COLUMNS {
        if !table_has_column(conn, BOOKMARKS_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: BOOKMARKS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

//! Bookmark domain model.
//!
//! # Responsibility
//! - Define the bookmark entity independent of the `bookmarks` table.
//! - Define `BookmarkChanges`, the partial update accepted by `edit`.
//!
//! # Invariants
//! - Equality and hashing cover every field, so two bookmarks with equal
//!   values are the same tracked entity.
//! - `id` is never part of a change set.
//! - Unknown field names are rejected, never silently dropped.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a bookmark row.
pub type BookmarkId = i64;

/// Text form of `date_added` in storage and in field updates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field names accepted by [`BookmarkChanges::from_fields`].
pub const EDITABLE_FIELDS: [&str; 4] = ["title", "url", "notes", "date_added"];

/// Canonical in-memory bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub title: String,
    /// Expected to be a URL; not validated here.
    pub url: String,
    /// Free-text annotation, may be empty.
    #[serde(default)]
    pub notes: String,
    pub date_added: NaiveDate,
}

impl Bookmark {
    pub fn new(
        id: BookmarkId,
        title: impl Into<String>,
        url: impl Into<String>,
        notes: impl Into<String>,
        date_added: NaiveDate,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            notes: notes.into(),
            date_added,
        }
    }

    /// Creates a bookmark stamped with the local calendar date.
    pub fn added_today(
        id: BookmarkId,
        title: impl Into<String>,
        url: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self::new(id, title, url, notes, Local::now().date_naive())
    }
}

/// Rejection reasons for a field-update mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChangeError {
    #[error("unknown bookmark field `{0}`")]
    UnknownField(String),
    #[error("bookmark field `{0}` cannot be edited")]
    ImmutableField(&'static str),
    #[error("invalid date `{value}` for date_added; expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Partial update applied by repository `edit`.
///
/// Unset fields keep their stored value. Deserializing rejects unknown keys,
/// matching [`BookmarkChanges::from_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookmarkChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<NaiveDate>,
}

impl BookmarkChanges {
    /// Builds a change set from `(field, value)` pairs.
    ///
    /// Later pairs for the same field win.
    ///
    /// # Errors
    /// - `ImmutableField("id")` when `id` is supplied.
    /// - `UnknownField` for any name outside [`EDITABLE_FIELDS`].
    /// - `InvalidDate` when `date_added` is not `YYYY-MM-DD`.
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, ChangeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut changes = Self::default();
        for (name, value) in fields {
            let value = value.into();
            match name.as_ref() {
                "title" => changes.title = Some(value),
                "url" => changes.url = Some(value),
                "notes" => changes.notes = Some(value),
                "date_added" => changes.date_added = Some(parse_date_field(value)?),
                "id" => return Err(ChangeError::ImmutableField("id")),
                other => return Err(ChangeError::UnknownField(other.to_string())),
            }
        }
        Ok(changes)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_date_added(mut self, date_added: NaiveDate) -> Self {
        self.date_added = Some(date_added);
        self
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.notes.is_none()
            && self.date_added.is_none()
    }

    /// Returns `bookmark` overridden by every field set here.
    pub fn apply_to(&self, bookmark: &Bookmark) -> Bookmark {
        Bookmark {
            id: bookmark.id,
            title: self.title.clone().unwrap_or_else(|| bookmark.title.clone()),
            url: self.url.clone().unwrap_or_else(|| bookmark.url.clone()),
            notes: self.notes.clone().unwrap_or_else(|| bookmark.notes.clone()),
            date_added: self.date_added.unwrap_or(bookmark.date_added),
        }
    }
}

fn parse_date_field(value: String) -> Result<NaiveDate, ChangeError> {
    let parsed = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT);
    match parsed {
        Ok(date) => Ok(date),
        Err(source) => Err(ChangeError::InvalidDate { value, source }),
    }
}

//! Database query modules.
//!
//! This module organizes all catalog operations into logical groups:
//! - content: content record lookup and registration
//! - plays: play-count increments and the per-content player set
//! - ratings: first-and-only rating submission and summaries
//! - favorites: viewer favorite membership
//! - lists: curated lists and the private-only release check

pub mod content;
pub mod favorites;
pub mod lists;
pub mod plays;
pub mod ratings;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};
use streamcat_common::{ContentId, Error, Result};

/// Render a timestamp in the fixed-width form used by every table, so that
/// text ordering in SQL matches chronological ordering.
pub(crate) fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Wrap a rusqlite error in the common error type.
pub(crate) fn db_err(e: rusqlite::Error) -> Error {
    Error::database(e)
}

/// Fail with `NotFound` unless the content record exists.
pub(crate) fn ensure_content_exists(conn: &Connection, content_id: &ContentId) -> Result<()> {
    let found = conn
        .query_row(
            "SELECT 1 FROM content WHERE id = ?1",
            [content_id.as_str()],
            |_| Ok(()),
        )
        .optional()
        .map_err(db_err)?;
    found.ok_or_else(|| Error::not_found("content", content_id))
}

//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Timestamps are stored as RFC 3339 text.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use serde::Serialize;
use streamcat_common::{ContentId, ListId, ViewerId};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn parse_opt_timestamp(
    row: &rusqlite::Row,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|v| {
        DateTime::parse_from_rfc3339(&v)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    })
    .transpose()
}

fn parse_content_id(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<ContentId> {
    let s: String = row.get(idx)?;
    s.parse().map_err(|e| conversion_error(idx, e))
}

fn parse_viewer_id(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<ViewerId> {
    let s: String = row.get(idx)?;
    s.parse().map_err(|e| conversion_error(idx, e))
}

// ---------------------------------------------------------------------------
// ContentRecord
// ---------------------------------------------------------------------------

/// A playable catalog entry together with its counters.
///
/// `media_kind` is kept as stored; turning it into a typed media source is
/// the resolver's job, so a record with an unknown kind still loads and can
/// be reported as misconfigured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub id: ContentId,
    pub title: String,
    pub media_kind: String,
    pub audio_file_path: Option<String>,
    pub video_location: Option<String>,
    pub visible: bool,
    pub available_until: Option<DateTime<Utc>>,
    pub vip: bool,
    pub minimum_age: u32,
    pub play_count: u64,
    pub rating_count: u64,
    pub rating_average: f64,
    pub status_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    pub(crate) const COLUMNS: &'static str = "id, title, media_kind, audio_file_path, \
        video_location, visible, available_until, vip, minimum_age, play_count, \
        rating_count, rating_average, status_changed_at, created_at";

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_content_id(row, 0)?,
            title: row.get(1)?,
            media_kind: row.get(2)?,
            audio_file_path: row.get(3)?,
            video_location: row.get(4)?,
            visible: row.get(5)?,
            available_until: parse_opt_timestamp(row, 6)?,
            vip: row.get(7)?,
            minimum_age: row.get(8)?,
            play_count: row.get::<_, i64>(9)?.max(0) as u64,
            rating_count: row.get::<_, i64>(10)?.max(0) as u64,
            rating_average: row.get(11)?,
            status_changed_at: parse_timestamp(row, 12)?,
            created_at: parse_timestamp(row, 13)?,
        })
    }
}

/// Fields needed to register a content record.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub id: ContentId,
    pub title: String,
    pub media_kind: String,
    pub audio_file_path: Option<String>,
    pub video_location: Option<String>,
    pub visible: bool,
    pub available_until: Option<DateTime<Utc>>,
    pub vip: bool,
    pub minimum_age: u32,
}

impl NewContent {
    /// A visible, unrestricted audio record.
    pub fn audio(title: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            id: ContentId::new(),
            title: title.into(),
            media_kind: "AUDIO".to_string(),
            audio_file_path: Some(file_path.into()),
            video_location: None,
            visible: true,
            available_until: None,
            vip: false,
            minimum_age: 0,
        }
    }

    /// A visible, unrestricted video record.
    pub fn video(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: ContentId::new(),
            title: title.into(),
            media_kind: "VIDEO".to_string(),
            audio_file_path: None,
            video_location: Some(location.into()),
            visible: true,
            available_until: None,
            vip: false,
            minimum_age: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// Aggregate rating state of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u64,
}

impl RatingSummary {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            average: row.get(0)?,
            count: row.get::<_, i64>(1)?.max(0) as u64,
        })
    }
}

// ---------------------------------------------------------------------------
// Favorite
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Favorite {
    pub content_id: ContentId,
    pub viewer_id: ViewerId,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            content_id: parse_content_id(row, 0)?,
            viewer_id: parse_viewer_id(row, 1)?,
            created_at: parse_timestamp(row, 2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// CuratedList
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuratedList {
    pub id: ListId,
    pub name: String,
    pub owner_id: ViewerId,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl CuratedList {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let uuid = Uuid::parse_str(&id).map_err(|e| conversion_error(0, e))?;
        Ok(Self {
            id: ListId::from(uuid),
            name: row.get(1)?,
            owner_id: parse_viewer_id(row, 2)?,
            is_private: row.get(3)?,
            created_at: parse_timestamp(row, 4)?,
        })
    }
}

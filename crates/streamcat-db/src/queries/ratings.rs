//! Play-once rating operations.
//!
//! A viewer's score is stored once and never edited. The running average is
//! maintained incrementally in the same `BEGIN IMMEDIATE` transaction that
//! stores the score, so concurrent submissions from different viewers are
//! serialised by SQLite and all of them are reflected in the aggregate.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use streamcat_common::{ContentId, Error, Result, ViewerId};

use super::{db_err, ensure_content_exists, plays, timestamp};
use crate::models::RatingSummary;

/// Conflict message when the viewer never played the content.
pub const MUST_PLAY_FIRST: &str = "must play before rating";

/// Conflict message when the viewer already rated the content.
pub const RATING_IS_FINAL: &str = "rating is final, already submitted";

/// Store a viewer's first and only score and fold it into the average.
///
/// The score must already be validated by the caller. Fails with
/// `NotFound` for unknown content and `Conflict` when the viewer has not
/// played the content or has already rated it; neither failure touches the
/// aggregate.
pub fn submit_rating(
    conn: &Connection,
    content_id: &ContentId,
    viewer: &ViewerId,
    score: f64,
) -> Result<RatingSummary> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(db_err)?;

    ensure_content_exists(&tx, content_id)?;

    // The insert only happens for players, and the primary key keeps it to
    // one row per viewer.
    let inserted = tx
        .execute(
            "INSERT INTO content_ratings (content_id, viewer_key, score, rated_at)
             SELECT :content_id, :viewer_key, :score, :now
             WHERE EXISTS (
                 SELECT 1 FROM content_players
                 WHERE content_id = :content_id AND viewer_id = :viewer_key
             )
             ON CONFLICT (content_id, viewer_key) DO NOTHING",
            rusqlite::named_params! {
                ":content_id": content_id.as_str(),
                ":viewer_key": viewer.as_str(),
                ":score": score,
                ":now": timestamp(Utc::now()),
            },
        )
        .map_err(db_err)?;

    if inserted == 0 {
        let message = if plays::has_played(&tx, content_id, viewer)? {
            RATING_IS_FINAL
        } else {
            MUST_PLAY_FIRST
        };
        return Err(Error::conflict(message));
    }

    let summary = tx
        .query_row(
            "UPDATE content
             SET rating_average = (rating_average * rating_count + :score) / (rating_count + 1),
                 rating_count = rating_count + 1
             WHERE id = :content_id
             RETURNING rating_average, rating_count",
            rusqlite::named_params! {
                ":content_id": content_id.as_str(),
                ":score": score,
            },
            RatingSummary::from_row,
        )
        .map_err(db_err)?;

    tx.commit().map_err(db_err)?;

    Ok(summary)
}

/// Read the aggregate rating of a content item.
pub fn rating_summary(conn: &Connection, content_id: &ContentId) -> Result<RatingSummary> {
    conn.query_row(
        "SELECT rating_average, rating_count FROM content WHERE id = ?1",
        [content_id.as_str()],
        RatingSummary::from_row,
    )
    .optional()
    .map_err(db_err)?
    .ok_or_else(|| Error::not_found("content", content_id))
}

/// The score a viewer gave, if any.
pub fn viewer_score(
    conn: &Connection,
    content_id: &ContentId,
    viewer: &ViewerId,
) -> Result<Option<f64>> {
    conn.query_row(
        "SELECT score FROM content_ratings WHERE content_id = ?1 AND viewer_key = ?2",
        [content_id.as_str(), viewer.as_str()],
        |row| row.get(0),
    )
    .optional()
    .map_err(db_err)
}

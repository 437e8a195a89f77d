//! Catalog state mutations.
//!
//! Thin layer over [`streamcat_db::queries`] that validates input and applies
//! the favorite policy. Every mutation below is a single atomic statement or
//! transaction in the store; nothing here reads a value, changes it, and
//! writes it back.

use streamcat_common::{ContentId, Error, Result, Role, ViewerId};
use streamcat_db::models::RatingSummary;
use streamcat_db::pool::{get_conn, DbPool};
use streamcat_db::queries::{favorites, plays, ratings};

use crate::policy;

/// A validated rating score: finite, within `[0.5, 5.0]`, in half steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 5.0;

    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(Error::validation(format!(
                "score must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )));
        }
        if (value * 2.0).fract() != 0.0 {
            return Err(Error::validation(format!(
                "score must be a multiple of 0.5, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

/// Record a successful delivery: bump the play counter and, for identified
/// viewers, remember that they have played the content.
///
/// Best effort. Failures are logged and swallowed so that a stream which has
/// already been served never turns into an error.
pub fn record_play(pool: &DbPool, content_id: &ContentId, viewer: Option<&ViewerId>) {
    let conn = match get_conn(pool) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(content_id = %content_id, error = %e, "Failed to record play");
            return;
        }
    };

    if let Err(e) = plays::increment_play_count(&conn, content_id) {
        tracing::warn!(content_id = %content_id, error = %e, "Failed to increment play count");
    }

    if let Some(viewer) = viewer {
        match plays::record_player(&conn, content_id, viewer) {
            Ok(true) => {
                tracing::debug!(content_id = %content_id, viewer = %viewer, "First play recorded")
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(
                content_id = %content_id,
                viewer = %viewer,
                error = %e,
                "Failed to record player"
            ),
        }
    }
}

/// Submit a viewer's one and only score for a content item.
pub fn submit_rating(
    pool: &DbPool,
    content_id: &ContentId,
    viewer: &ViewerId,
    score: Score,
) -> Result<RatingSummary> {
    let conn = get_conn(pool)?;
    let summary = ratings::submit_rating(&conn, content_id, viewer, score.value())?;
    tracing::info!(
        content_id = %content_id,
        viewer = %viewer,
        score = score.value(),
        count = summary.count,
        "Rating submitted"
    );
    Ok(summary)
}

/// Current `{average, count}` of a content item.
pub fn rating_summary(pool: &DbPool, content_id: &ContentId) -> Result<RatingSummary> {
    let conn = get_conn(pool)?;
    ratings::rating_summary(&conn, content_id)
}

/// Whether `viewer` has already rated `content_id`.
pub fn has_rated(pool: &DbPool, content_id: &ContentId, viewer: &ViewerId) -> Result<bool> {
    let conn = get_conn(pool)?;
    Ok(ratings::viewer_score(&conn, content_id, viewer)?.is_some())
}

/// Add `content_id` to the caller's favorites after checking the policy.
///
/// Idempotent. Returns `true` when the membership was created by this call.
pub fn add_favorite(
    pool: &DbPool,
    content_id: &ContentId,
    viewer: &ViewerId,
    role: Role,
) -> Result<bool> {
    let conn = get_conn(pool)?;
    policy::check_favorite(&conn, content_id, role)?;
    favorites::add_favorite(&conn, content_id, viewer)
}

/// Remove `content_id` from the caller's favorites. Removing a non-member is
/// not an error.
pub fn remove_favorite(pool: &DbPool, content_id: &ContentId, viewer: &ViewerId) -> Result<()> {
    let conn = get_conn(pool)?;
    favorites::remove_favorite(&conn, content_id, viewer)?;
    Ok(())
}

pub fn is_favorite(pool: &DbPool, content_id: &ContentId, viewer: &ViewerId) -> Result<bool> {
    let conn = get_conn(pool)?;
    Ok(favorites::get_favorite(&conn, content_id, viewer)?.is_some())
}

/// A viewer's favorite content ids, most recently changed content first.
pub fn list_favorite_ids(pool: &DbPool, viewer: &ViewerId) -> Result<Vec<ContentId>> {
    let conn = get_conn(pool)?;
    favorites::list_favorite_ids(&conn, viewer)
}

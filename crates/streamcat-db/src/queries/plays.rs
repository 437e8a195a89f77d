//! Play counter and player set operations.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use streamcat_common::{ContentId, Error, Result, ViewerId};

use super::{db_err, ensure_content_exists, timestamp};

/// Atomically add one to a content item's play count.
pub fn increment_play_count(conn: &Connection, content_id: &ContentId) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE content SET play_count = play_count + 1 WHERE id = ?1",
            [content_id.as_str()],
        )
        .map_err(db_err)?;
    if n == 0 {
        return Err(Error::not_found("content", content_id));
    }
    Ok(())
}

/// Add a viewer to the set of viewers who have played a content item.
///
/// Idempotent. Returns `true` if the viewer was not in the set before.
pub fn record_player(conn: &Connection, content_id: &ContentId, viewer: &ViewerId) -> Result<bool> {
    let n = conn
        .execute(
            "INSERT INTO content_players (content_id, viewer_id, first_played_at)
             SELECT :content_id, :viewer_id, :now
             WHERE EXISTS (SELECT 1 FROM content WHERE id = :content_id)
             ON CONFLICT (content_id, viewer_id) DO NOTHING",
            rusqlite::named_params! {
                ":content_id": content_id.as_str(),
                ":viewer_id": viewer.as_str(),
                ":now": timestamp(Utc::now()),
            },
        )
        .map_err(db_err)?;

    if n == 0 {
        ensure_content_exists(conn, content_id)?;
    }
    Ok(n > 0)
}

/// Whether a viewer has ever played a content item.
pub fn has_played(conn: &Connection, content_id: &ContentId, viewer: &ViewerId) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM content_players WHERE content_id = ?1 AND viewer_id = ?2",
        [content_id.as_str(), viewer.as_str()],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewContent;
    use crate::pool::init_memory_pool;
    use crate::queries::content::{create_content, get_content};
    use assert_matches::assert_matches;

    fn setup() -> (crate::pool::PooledConnection, ContentId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let record = create_content(&conn, &NewContent::audio("Song", "/song.mp3")).unwrap();
        (conn, record.id)
    }

    #[test]
    fn increment_counts_up() {
        let (conn, id) = setup();
        increment_play_count(&conn, &id).unwrap();
        increment_play_count(&conn, &id).unwrap();
        assert_eq!(get_content(&conn, &id).unwrap().unwrap().play_count, 2);
    }

    #[test]
    fn increment_missing_content() {
        let (conn, _) = setup();
        let missing: ContentId = "ghost".parse().unwrap();
        assert_matches!(
            increment_play_count(&conn, &missing),
            Err(Error::NotFound { .. })
        );
    }

    #[test]
    fn record_player_is_idempotent() {
        let (conn, id) = setup();
        let viewer: ViewerId = "alice".parse().unwrap();

        assert!(!has_played(&conn, &id, &viewer).unwrap());
        assert!(record_player(&conn, &id, &viewer).unwrap());
        assert!(!record_player(&conn, &id, &viewer).unwrap());
        assert!(has_played(&conn, &id, &viewer).unwrap());

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM content_players", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn record_player_missing_content() {
        let (conn, _) = setup();
        let missing: ContentId = "ghost".parse().unwrap();
        let viewer: ViewerId = "alice".parse().unwrap();
        assert_matches!(
            record_player(&conn, &missing, &viewer),
            Err(Error::NotFound { .. })
        );
    }
}

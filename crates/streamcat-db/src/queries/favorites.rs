//! Favorite operations.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use streamcat_common::{ContentId, Result, ViewerId};

use super::{db_err, ensure_content_exists, timestamp};
use crate::models::Favorite;

const COLS: &str = "content_id, viewer_id, created_at";

/// Add a content item to a viewer's favorites. No-op if already favorited.
///
/// Returns `true` if the membership was created by this call.
pub fn add_favorite(conn: &Connection, content_id: &ContentId, viewer: &ViewerId) -> Result<bool> {
    let n = conn
        .execute(
            "INSERT INTO favorites (content_id, viewer_id, created_at)
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

/// Remove a content item from a viewer's favorites. Returns true if removed.
pub fn remove_favorite(
    conn: &Connection,
    content_id: &ContentId,
    viewer: &ViewerId,
) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM favorites WHERE content_id = ?1 AND viewer_id = ?2",
            [content_id.as_str(), viewer.as_str()],
        )
        .map_err(db_err)?;
    Ok(n > 0)
}

/// Look up a single favorite membership.
pub fn get_favorite(
    conn: &Connection,
    content_id: &ContentId,
    viewer: &ViewerId,
) -> Result<Option<Favorite>> {
    let q = format!("SELECT {COLS} FROM favorites WHERE content_id = ?1 AND viewer_id = ?2");
    conn.query_row(&q, [content_id.as_str(), viewer.as_str()], Favorite::from_row)
        .optional()
        .map_err(db_err)
}

/// List the ids of a viewer's favorite content, most recently changed first.
///
/// Ordering follows each content record's status-change timestamp, not the
/// time the favorite was added.
pub fn list_favorite_ids(conn: &Connection, viewer: &ViewerId) -> Result<Vec<ContentId>> {
    let mut stmt = conn
        .prepare(
            "SELECT f.content_id
             FROM favorites f
             INNER JOIN content c ON c.id = f.content_id
             WHERE f.viewer_id = ?1
             ORDER BY c.status_changed_at DESC, c.id ASC",
        )
        .map_err(db_err)?;

    let rows = stmt
        .query_map([viewer.as_str()], |row| row.get::<_, String>(0))
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    rows.iter().map(|id| id.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewContent;
    use crate::pool::{get_conn, init_memory_pool, init_pool};
    use crate::queries::content::{create_content, set_visibility};
    use assert_matches::assert_matches;
    use streamcat_common::Error;

    fn setup() -> (crate::pool::PooledConnection, ContentId, ViewerId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let record = create_content(&conn, &NewContent::audio("Song", "/song.mp3")).unwrap();
        (conn, record.id, "carol".parse().unwrap())
    }

    #[test]
    fn add_and_remove() {
        let (conn, cid, vid) = setup();
        assert!(add_favorite(&conn, &cid, &vid).unwrap());

        // Duplicate add is a no-op.
        assert!(!add_favorite(&conn, &cid, &vid).unwrap());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorites", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);

        assert!(remove_favorite(&conn, &cid, &vid).unwrap());
        assert!(get_favorite(&conn, &cid, &vid).unwrap().is_none());

        // Removing a non-member is not an error.
        assert!(!remove_favorite(&conn, &cid, &vid).unwrap());
    }

    #[test]
    fn add_unknown_content() {
        let (conn, _, vid) = setup();
        let missing: ContentId = "ghost".parse().unwrap();
        assert_matches!(
            add_favorite(&conn, &missing, &vid),
            Err(Error::NotFound { .. })
        );
    }

    #[test]
    fn list_orders_by_status_change() {
        let (conn, first, vid) = setup();
        let second = create_content(&conn, &NewContent::video("Clip", "/clip.mp4"))
            .unwrap()
            .id;
        let third = create_content(&conn, &NewContent::video("Other", "/other.mp4"))
            .unwrap()
            .id;

        add_favorite(&conn, &first, &vid).unwrap();
        add_favorite(&conn, &second, &vid).unwrap();

        // Bump the first record so it becomes the most recent change.
        std::thread::sleep(std::time::Duration::from_millis(5));
        set_visibility(&conn, &first, true).unwrap();

        let ids = list_favorite_ids(&conn, &vid).unwrap();
        assert_eq!(ids, vec![first, second]);
        assert!(!ids.contains(&third));
    }

    #[test]
    fn list_is_scoped_to_viewer() {
        let (conn, cid, vid) = setup();
        add_favorite(&conn, &cid, &vid).unwrap();
        let other: ViewerId = "dave".parse().unwrap();
        assert!(list_favorite_ids(&conn, &other).unwrap().is_empty());
    }

    #[test]
    fn concurrent_adds_for_same_viewer_create_one_membership() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.db");
        let pool = init_pool(path.to_str().unwrap(), 8).unwrap();

        let id = {
            let conn = get_conn(&pool).unwrap();
            create_content(&conn, &NewContent::audio("Song", "/song.mp3"))
                .unwrap()
                .id
        };

        let barrier = std::sync::Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                let id = id.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    let conn = get_conn(&pool).unwrap();
                    let viewer: ViewerId = "Carol".parse().unwrap();
                    barrier.wait();
                    add_favorite(&conn, &id, &viewer).unwrap()
                })
            })
            .collect();
        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|created| *created)
            .count();
        assert_eq!(created, 1);

        let conn = get_conn(&pool).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM favorites WHERE content_id = ?1",
                [id.as_str()],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}

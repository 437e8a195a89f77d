//! Curated list operations.
//!
//! Only what the favorite policy needs lives here: creating lists, adding
//! entries, and asking whether a content item is referenced exclusively by
//! private lists.

use chrono::Utc;
use rusqlite::Connection;
use streamcat_common::{ContentId, Error, ListId, Result, ViewerId};

use super::{db_err, ensure_content_exists, timestamp};
use crate::models::CuratedList;

/// Create a curated list.
pub fn create_list(
    conn: &Connection,
    name: &str,
    owner: &ViewerId,
    is_private: bool,
) -> Result<CuratedList> {
    let id = ListId::new();
    let now = timestamp(Utc::now());
    conn.execute(
        "INSERT INTO curated_lists (id, name, owner_id, is_private, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id.to_string(), name, owner.as_str(), is_private, &now],
    )
    .map_err(db_err)?;

    conn.query_row(
        "SELECT id, name, owner_id, is_private, created_at FROM curated_lists WHERE id = ?1",
        [id.to_string()],
        CuratedList::from_row,
    )
    .map_err(db_err)
}

/// Add a content item to a curated list. Idempotent.
pub fn add_entry(conn: &Connection, list_id: ListId, content_id: &ContentId) -> Result<()> {
    ensure_content_exists(conn, content_id)?;
    let n = conn
        .execute(
            "INSERT INTO curated_list_entries (list_id, content_id, added_at)
             SELECT :list_id, :content_id, :now
             WHERE EXISTS (SELECT 1 FROM curated_lists WHERE id = :list_id)
             ON CONFLICT (list_id, content_id) DO NOTHING",
            rusqlite::named_params! {
                ":list_id": list_id.to_string(),
                ":content_id": content_id.as_str(),
                ":now": timestamp(Utc::now()),
            },
        )
        .map_err(db_err)?;

    if n == 0 {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS (SELECT 1 FROM curated_lists WHERE id = ?1)",
                [list_id.to_string()],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if !exists {
            return Err(Error::not_found("list", list_id));
        }
    }
    Ok(())
}

/// Whether a content item appears in at least one private list and in no
/// public list.
///
/// Such content has not been released to the public yet.
pub fn is_private_only(conn: &Connection, content_id: &ContentId) -> Result<bool> {
    conn.query_row(
        "SELECT
             EXISTS (SELECT 1 FROM curated_list_entries e
                     INNER JOIN curated_lists l ON l.id = e.list_id
                     WHERE e.content_id = :content_id AND l.is_private = 1)
             AND NOT EXISTS (SELECT 1 FROM curated_list_entries e
                     INNER JOIN curated_lists l ON l.id = e.list_id
                     WHERE e.content_id = :content_id AND l.is_private = 0)",
        rusqlite::named_params! { ":content_id": content_id.as_str() },
        |row| row.get(0),
    )
    .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewContent;
    use crate::pool::init_memory_pool;
    use crate::queries::content::create_content;
    use assert_matches::assert_matches;

    fn setup() -> (crate::pool::PooledConnection, ContentId, ViewerId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let record = create_content(&conn, &NewContent::audio("Song", "/song.mp3")).unwrap();
        (conn, record.id, "curator".parse().unwrap())
    }

    #[test]
    fn unlisted_content_is_not_private_only() {
        let (conn, cid, _) = setup();
        assert!(!is_private_only(&conn, &cid).unwrap());
    }

    #[test]
    fn private_list_alone_hides_content() {
        let (conn, cid, owner) = setup();
        let private = create_list(&conn, "Drafts", &owner, true).unwrap();
        assert!(private.is_private);
        add_entry(&conn, private.id, &cid).unwrap();
        assert!(is_private_only(&conn, &cid).unwrap());
    }

    #[test]
    fn public_list_releases_content() {
        let (conn, cid, owner) = setup();
        let private = create_list(&conn, "Drafts", &owner, true).unwrap();
        let public = create_list(&conn, "Weekly picks", &owner, false).unwrap();
        add_entry(&conn, private.id, &cid).unwrap();
        add_entry(&conn, public.id, &cid).unwrap();
        assert!(!is_private_only(&conn, &cid).unwrap());
    }

    #[test]
    fn add_entry_is_idempotent() {
        let (conn, cid, owner) = setup();
        let list = create_list(&conn, "Drafts", &owner, true).unwrap();
        add_entry(&conn, list.id, &cid).unwrap();
        add_entry(&conn, list.id, &cid).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM curated_list_entries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn add_entry_to_missing_list() {
        let (conn, cid, _) = setup();
        assert_matches!(
            add_entry(&conn, ListId::new(), &cid),
            Err(Error::NotFound { .. })
        );
    }
}

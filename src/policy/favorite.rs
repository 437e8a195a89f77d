//! Who may favorite what.

use rusqlite::Connection;
use streamcat_common::{ContentId, Error, Result, Role};
use streamcat_db::queries::lists;

/// Conflict message for content that only appears in private lists.
pub const PRIVATE_ONLY: &str = "content is not released to the public yet";

/// Check that `role` may favorite `content_id`.
///
/// Only plain viewers keep favorites. Content referenced by private curated
/// lists and by no public one is not released yet and cannot be favorited.
pub fn check_favorite(conn: &Connection, content_id: &ContentId, role: Role) -> Result<()> {
    if !role.can_favorite() {
        return Err(Error::Forbidden(format!("role {role} cannot favorite content")));
    }

    if lists::is_private_only(conn, content_id)? {
        return Err(Error::conflict(PRIVATE_ONLY));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use streamcat_db::models::NewContent;
    use streamcat_db::pool::init_memory_pool;
    use streamcat_db::queries::content::create_content;

    #[test]
    fn only_viewers_may_favorite() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let id = create_content(&conn, &NewContent::audio("Song", "/song.mp3"))
            .unwrap()
            .id;

        assert!(check_favorite(&conn, &id, Role::Viewer).is_ok());
        assert_matches!(check_favorite(&conn, &id, Role::Author), Err(Error::Forbidden(_)));
        assert_matches!(check_favorite(&conn, &id, Role::Admin), Err(Error::Forbidden(_)));
    }

    #[test]
    fn private_only_content_is_rejected() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let id = create_content(&conn, &NewContent::audio("Song", "/song.mp3"))
            .unwrap()
            .id;
        let owner = "curator".parse().unwrap();

        let private = lists::create_list(&conn, "Drafts", &owner, true).unwrap();
        lists::add_entry(&conn, private.id, &id).unwrap();
        assert_matches!(
            check_favorite(&conn, &id, Role::Viewer),
            Err(Error::Conflict(ref msg)) if msg == PRIVATE_ONLY
        );

        let public = lists::create_list(&conn, "Picks", &owner, false).unwrap();
        lists::add_entry(&conn, public.id, &id).unwrap();
        assert!(check_favorite(&conn, &id, Role::Viewer).is_ok());
    }
}

//! Content record operations.
//!
//! Registration here only persists what it is given; validating authoring
//! input belongs to the catalog management service.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use streamcat_common::{ContentId, Error, Result};

use super::{db_err, timestamp};
use crate::models::{ContentRecord, NewContent};

/// Insert a content record with zeroed counters.
pub fn create_content(conn: &Connection, new: &NewContent) -> Result<ContentRecord> {
    let now = timestamp(Utc::now());
    conn.execute(
        "INSERT INTO content (id, title, media_kind, audio_file_path, video_location, visible,
                              available_until, vip, minimum_age, status_changed_at, created_at)
         VALUES (:id, :title, :media_kind, :audio_file_path, :video_location, :visible,
                 :available_until, :vip, :minimum_age, :now, :now)",
        rusqlite::named_params! {
            ":id": new.id.as_str(),
            ":title": &new.title,
            ":media_kind": &new.media_kind,
            ":audio_file_path": &new.audio_file_path,
            ":video_location": &new.video_location,
            ":visible": new.visible,
            ":available_until": new.available_until.map(timestamp),
            ":vip": new.vip,
            ":minimum_age": new.minimum_age,
            ":now": &now,
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(ref f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::conflict(format!("content {} already exists", new.id))
        }
        other => db_err(other),
    })?;

    get_content(conn, &new.id)?
        .ok_or_else(|| Error::Internal(format!("content {} vanished after insert", new.id)))
}

/// Look up a content record.
pub fn get_content(conn: &Connection, content_id: &ContentId) -> Result<Option<ContentRecord>> {
    let q = format!(
        "SELECT {} FROM content WHERE id = ?1",
        ContentRecord::COLUMNS
    );
    conn.query_row(&q, [content_id.as_str()], ContentRecord::from_row)
        .optional()
        .map_err(db_err)
}

/// Show or hide a content record, stamping the status change.
///
/// Returns `NotFound` if the record does not exist.
pub fn set_visibility(conn: &Connection, content_id: &ContentId, visible: bool) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE content SET visible = ?1, status_changed_at = ?2 WHERE id = ?3",
            rusqlite::params![visible, timestamp(Utc::now()), content_id.as_str()],
        )
        .map_err(db_err)?;
    if n == 0 {
        return Err(Error::not_found("content", content_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use assert_matches::assert_matches;
    use chrono::Duration;

    #[test]
    fn create_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let mut new = NewContent::audio("Song", "/music/song.mp3");
        new.vip = true;
        new.minimum_age = 16;
        new.available_until = Some(Utc::now() + Duration::days(3));

        let record = create_content(&conn, &new).unwrap();
        assert_eq!(record.id, new.id);
        assert_eq!(record.media_kind, "AUDIO");
        assert_eq!(record.audio_file_path.as_deref(), Some("/music/song.mp3"));
        assert!(record.vip);
        assert_eq!(record.minimum_age, 16);
        assert!(record.available_until.is_some());
        assert_eq!(record.play_count, 0);
        assert_eq!(record.rating_count, 0);
        assert_eq!(record.rating_average, 0.0);
    }

    #[test]
    fn get_missing_returns_none() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let id: ContentId = "nope".parse().unwrap();
        assert!(get_content(&conn, &id).unwrap().is_none());
    }

    #[test]
    fn duplicate_id_conflicts() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let new = NewContent::video("Clip", "/videos/clip.mp4");
        create_content(&conn, &new).unwrap();
        assert_matches!(create_content(&conn, &new), Err(Error::Conflict(_)));
    }

    #[test]
    fn unknown_media_kind_still_loads() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let mut new = NewContent::audio("Odd", "/x.mp3");
        new.media_kind = "PODCAST".into();
        let record = create_content(&conn, &new).unwrap();
        assert_eq!(record.media_kind, "PODCAST");
    }

    #[test]
    fn set_visibility_bumps_status_change() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let record = create_content(&conn, &NewContent::audio("S", "/s.mp3")).unwrap();

        set_visibility(&conn, &record.id, false).unwrap();
        let updated = get_content(&conn, &record.id).unwrap().unwrap();
        assert!(!updated.visible);
        assert!(updated.status_changed_at >= record.status_changed_at);

        let missing: ContentId = "missing".parse().unwrap();
        assert_matches!(
            set_visibility(&conn, &missing, true),
            Err(Error::NotFound { .. })
        );
    }
}

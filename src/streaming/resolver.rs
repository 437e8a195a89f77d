//! Resolve a content record to the place its bytes come from.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use streamcat_common::paths::{audio_mime_type, video_mime_type, DEFAULT_VIDEO_MIME};
use streamcat_common::{ContentId, Error, MediaKind, Result};
use streamcat_db::models::ContentRecord;
use streamcat_db::pool::{get_conn, DbPool};
use streamcat_db::queries::content;

use crate::policy::{self, ViewerAttributes};

static HTTP_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+([/?#]\S*)?$").ok());

/// Whether a video location is an absolute HTTP(S) URL rather than a path.
pub fn is_http_url(location: &str) -> bool {
    HTTP_URL.as_ref().is_some_and(|re| re.is_match(location.trim()))
}

/// Where a record's bytes live, chosen once from its media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource<'a> {
    Audio { file_path: Option<&'a str> },
    Video { location: Option<&'a str> },
}

impl<'a> MediaSource<'a> {
    /// Pick the authoritative location field for the record's media kind.
    ///
    /// An unknown kind is a broken record and is never defaulted.
    pub fn from_record(record: &'a ContentRecord) -> Result<Self> {
        let kind: MediaKind = record.media_kind.parse()?;
        Ok(match kind {
            MediaKind::Audio => Self::Audio {
                file_path: record.audio_file_path.as_deref(),
            },
            MediaKind::Video => Self::Video {
                location: record.video_location.as_deref(),
            },
        })
    }
}

/// Resolved source of bytes for one playback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamingTarget {
    /// A readable local file.
    Local {
        path: PathBuf,
        total_length: u64,
        mime_type: &'static str,
    },
    /// An external URL the client is redirected to.
    External { url: String, mime_type: &'static str },
}

impl StreamingTarget {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Local { mime_type, .. } | Self::External { mime_type, .. } => mime_type,
        }
    }
}

/// Look up `content_id`, apply the access policy, and resolve the target.
pub async fn resolve(
    pool: &DbPool,
    content_id: &ContentId,
    viewer: &ViewerAttributes,
) -> Result<StreamingTarget> {
    let record = {
        let conn = get_conn(pool)?;
        content::get_content(&conn, content_id)?
    }
    .ok_or_else(|| Error::not_found("content", content_id))?;

    resolve_record(&record, viewer, Utc::now()).await
}

/// Resolve an already loaded record.
///
/// The policy runs before any filesystem access, so a denied viewer learns
/// nothing about the byte source.
pub async fn resolve_record(
    record: &ContentRecord,
    viewer: &ViewerAttributes,
    now: DateTime<Utc>,
) -> Result<StreamingTarget> {
    policy::evaluate(record, viewer, now).into_result()?;

    let result = match MediaSource::from_record(record)? {
        MediaSource::Audio { file_path } => local_target(file_path, audio_mime_type).await,
        MediaSource::Video { location } => match location {
            Some(url) if is_http_url(url) => Ok(StreamingTarget::External {
                url: url.trim().to_string(),
                mime_type: DEFAULT_VIDEO_MIME,
            }),
            other => local_target(other, video_mime_type).await,
        },
    };

    if let Err(Error::SourceUnavailable { path, reason }) = &result {
        tracing::error!(
            content_id = %record.id,
            path = %path,
            error = %reason,
            "Content source unavailable"
        );
    }

    result
}

async fn local_target(
    path: Option<&str>,
    mime_type: fn(&Path) -> &'static str,
) -> Result<StreamingTarget> {
    let raw = path.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(Error::source_unavailable("", "no file path recorded"));
    }

    let path = PathBuf::from(raw);
    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| Error::source_unavailable(raw, e))?;
    if !metadata.is_file() {
        return Err(Error::source_unavailable(raw, "not a regular file"));
    }

    // Existence is not enough; the file must also open for reading.
    tokio::fs::File::open(&path)
        .await
        .map_err(|e| Error::source_unavailable(raw, e))?;

    Ok(StreamingTarget::Local {
        mime_type: mime_type(&path),
        total_length: metadata.len(),
        path,
    })
}

//! Stream handlers: direct range delivery for local files, redirects for
//! external ones.

use std::io::SeekFrom;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, response::Builder, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde::Serialize;
use streamcat_common::{ContentId, Error};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::{self, RangeResponse};
use super::resolver::{self, StreamingTarget};
use crate::catalog;
use crate::config::StreamingConfig;
use crate::policy::ViewerAttributes;
use crate::server::caller::ViewerKey;
use crate::server::error::AppError;
use crate::server::AppContext;

/// GET /content/:id/stream
///
/// Serves the whole file, a single byte range, or a redirect. A play is
/// recorded once the response has been built.
pub async fn stream(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    viewer: Option<ViewerKey>,
    attrs: ViewerAttributes,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let content_id: ContentId = id.parse()?;
    let target = resolver::resolve(&ctx.db, &content_id, &attrs).await?;

    let response = match target {
        StreamingTarget::External { url, .. } => redirect(&url, &ctx.config.streaming)?,
        StreamingTarget::Local {
            path,
            total_length,
            mime_type,
        } => {
            let plan = range::plan(total_length, mime_type, range_header(&headers))?;
            let body = open_window(&path, &plan, ctx.config.streaming.read_buffer_bytes).await?;
            local_headers(&plan, &ctx.config.streaming)
                .body(body)
                .map_err(|e| Error::Internal(format!("Failed to build response: {e}")))?
        }
    };

    catalog::record_play(&ctx.db, &content_id, viewer.as_ref().map(|v| &v.0));

    Ok(response)
}

/// HEAD /content/:id/stream
///
/// Same resolution and headers as GET. The file is never opened and no play
/// is recorded.
pub async fn head_stream(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    attrs: ViewerAttributes,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let content_id: ContentId = id.parse()?;
    let target = resolver::resolve(&ctx.db, &content_id, &attrs).await?;

    let response = match target {
        StreamingTarget::External { url, .. } => redirect(&url, &ctx.config.streaming)?,
        StreamingTarget::Local {
            total_length,
            mime_type,
            ..
        } => {
            let plan = range::plan(total_length, mime_type, range_header(&headers))?;
            local_headers(&plan, &ctx.config.streaming)
                .body(Body::empty())
                .map_err(|e| Error::Internal(format!("Failed to build response: {e}")))?
        }
    };

    Ok(response)
}

#[derive(Debug, Serialize)]
#[serde(tag = "delivery", rename_all = "lowercase")]
pub enum Delivery {
    Local { length: u64 },
    External { url: String },
}

#[derive(Debug, Serialize)]
pub struct PlaybackInfoResponse {
    pub content_id: ContentId,
    #[serde(flatten)]
    pub delivery: Delivery,
    pub mime_type: &'static str,
    pub stream_url: String,
}

/// GET /content/:id/playback
///
/// Reports how the content would be delivered to this caller, without
/// serving bytes or counting a play.
pub async fn playback_info(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    attrs: ViewerAttributes,
) -> Result<Json<PlaybackInfoResponse>, AppError> {
    let content_id: ContentId = id.parse()?;
    let target = resolver::resolve(&ctx.db, &content_id, &attrs).await?;

    let mime_type = target.mime_type();
    let delivery = match target {
        StreamingTarget::Local { total_length, .. } => Delivery::Local {
            length: total_length,
        },
        StreamingTarget::External { url, .. } => Delivery::External { url },
    };

    Ok(Json(PlaybackInfoResponse {
        stream_url: format!("/content/{content_id}/stream"),
        content_id,
        delivery,
        mime_type,
    }))
}

fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::RANGE).and_then(|h| h.to_str().ok())
}

fn local_headers(plan: &RangeResponse, config: &StreamingConfig) -> Builder {
    let mut builder = Response::builder()
        .status(plan.status)
        .header(header::CONTENT_TYPE, plan.mime_type)
        .header(header::CONTENT_LENGTH, plan.length.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, config.cache_control.as_str());

    if let Some(content_range) = plan.content_range() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    builder
}

fn redirect(url: &str, config: &StreamingConfig) -> Result<Response, Error> {
    let location = HeaderValue::from_str(url)
        .map_err(|_| Error::Misconfigured(format!("video location is not a valid URL: {url}")))?;

    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .header(header::CACHE_CONTROL, config.cache_control.as_str())
        .body(Body::empty())
        .map_err(|e| Error::Internal(format!("Failed to build redirect: {e}")))
}

/// Open `path` and stream exactly the planned window in bounded chunks.
async fn open_window(
    path: &std::path::Path,
    plan: &RangeResponse,
    buffer_bytes: usize,
) -> Result<Body, Error> {
    let display = path.display().to_string();
    let mut file = File::open(path)
        .await
        .map_err(|e| Error::source_unavailable(display.clone(), e))?;

    if plan.start > 0 {
        file.seek(SeekFrom::Start(plan.start))
            .await
            .map_err(|e| Error::source_unavailable(display, e))?;
    }

    let stream = ReaderStream::with_capacity(file.take(plan.length), buffer_bytes);
    Ok(Body::from_stream(stream))
}

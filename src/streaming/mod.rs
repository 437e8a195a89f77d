//! Media streaming module.
//!
//! Resolves content records to a byte source and serves them with HTTP range
//! support.
//!
//! # Routes
//!
//! - `GET /content/{id}/stream` - whole file, single range, or 302 redirect
//! - `HEAD /content/{id}/stream` - same headers, no body, no play recorded
//! - `GET /content/{id}/playback` - delivery description for the caller

mod direct;
pub mod range;
pub mod resolver;

pub use direct::{head_stream, playback_info, stream, Delivery, PlaybackInfoResponse};
pub use range::{ByteRange, RangeResponse};
pub use resolver::{resolve, MediaSource, StreamingTarget};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create the content streaming router.
pub fn stream_router() -> Router<AppContext> {
    Router::new()
        .route("/content/:id/stream", get(stream).head(head_stream))
        .route("/content/:id/playback", get(playback_info))
}

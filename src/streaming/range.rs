//! HTTP byte-range planning for local targets.
//!
//! Only the first interval of a `Range` header is honoured. Headers that do
//! not parse are ignored and the whole resource is served; headers that parse
//! but cannot be satisfied yield `416 Range Not Satisfiable`.

use axum::http::StatusCode;
use streamcat_common::{Error, Result};

/// A single requested interval, as written by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// `bytes=start-end`
    Bounded { start: u64, end: u64 },
    /// `bytes=start-`
    From { start: u64 },
    /// `bytes=-length`
    Suffix { length: u64 },
}

impl ByteRange {
    /// Parse a `Range` header value, keeping only its first interval.
    ///
    /// Returns `None` for anything that is not a well-formed `bytes` range.
    pub fn parse(value: &str) -> Option<Self> {
        let (unit, set) = value.trim().split_once('=')?;
        if !unit.trim().eq_ignore_ascii_case("bytes") {
            return None;
        }

        let first = set.split(',').next()?.trim();
        let (start, end) = first.split_once('-')?;

        match (start.trim(), end.trim()) {
            ("", "") => None,
            ("", length) => Some(Self::Suffix {
                length: parse_bound(length)?,
            }),
            (start, "") => Some(Self::From {
                start: parse_bound(start)?,
            }),
            (start, end) => Some(Self::Bounded {
                start: parse_bound(start)?,
                end: parse_bound(end)?,
            }),
        }
    }

    /// Resolve against a resource of `total` bytes into an inclusive
    /// `(start, end)` window, clamping `end` to the last byte.
    ///
    /// `None` means the range cannot be satisfied.
    pub fn resolve(self, total: u64) -> Option<(u64, u64)> {
        let last = total.checked_sub(1)?;
        match self {
            Self::Bounded { start, end } if start <= end && start <= last => {
                Some((start, end.min(last)))
            }
            Self::From { start } if start <= last => Some((start, last)),
            Self::Suffix { length } if length > 0 => Some((total.saturating_sub(length), last)),
            _ => None,
        }
    }
}

/// Digits only. A bound too large for `u64` saturates to `u64::MAX`.
fn parse_bound(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse().unwrap_or(u64::MAX))
}

/// What to send for a local target: status, byte window, and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeResponse {
    /// `200 OK` or `206 Partial Content`.
    pub status: StatusCode,
    /// First byte served.
    pub start: u64,
    /// Number of bytes served.
    pub length: u64,
    /// Size of the whole resource.
    pub total_length: u64,
    pub mime_type: &'static str,
}

impl RangeResponse {
    pub fn is_partial(&self) -> bool {
        self.status == StatusCode::PARTIAL_CONTENT
    }

    /// `Content-Range` value for partial responses.
    pub fn content_range(&self) -> Option<String> {
        self.is_partial().then(|| {
            format!(
                "bytes {}-{}/{}",
                self.start,
                self.start + self.length - 1,
                self.total_length
            )
        })
    }
}

/// Plan the response for a local resource of `total_length` bytes.
///
/// Fails with [`Error::RangeNotSatisfiable`] when a well-formed range lies
/// outside the resource.
pub fn plan(
    total_length: u64,
    mime_type: &'static str,
    range_header: Option<&str>,
) -> Result<RangeResponse> {
    let Some(range) = range_header.and_then(ByteRange::parse) else {
        return Ok(RangeResponse {
            status: StatusCode::OK,
            start: 0,
            length: total_length,
            total_length,
            mime_type,
        });
    };

    let (start, end) = range.resolve(total_length).ok_or(Error::RangeNotSatisfiable {
        length: total_length,
    })?;

    Ok(RangeResponse {
        status: StatusCode::PARTIAL_CONTENT,
        start,
        length: end - start + 1,
        total_length,
        mime_type,
    })
}

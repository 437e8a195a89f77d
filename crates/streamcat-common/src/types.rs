//! Core type definitions for content records and callers.
//!
//! Media kinds are stored in upper case (`AUDIO`, `VIDEO`) and roles in lower
//! case, matching what authoring tools and the identity provider emit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Kind of media a content record holds.
///
/// The kind decides which location field of the record is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaKind {
    /// Served from `audio_file_path`.
    Audio,
    /// Served from `video_location` (local path or HTTP(S) URL).
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AUDIO" => Ok(Self::Audio),
            "VIDEO" => Ok(Self::Video),
            other => Err(Error::Misconfigured(format!("unknown media kind: {other:?}"))),
        }
    }
}

/// Role of the calling user, issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Plain viewer: may play, rate, and favorite content.
    Viewer,
    /// Content author.
    Author,
    /// Administrator.
    Admin,
}

impl Role {
    /// Whether this role may keep favorites.
    pub fn can_favorite(&self) -> bool {
        matches!(self, Self::Viewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viewer => write!(f, "viewer"),
            Self::Author => write!(f, "author"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "author" => Ok(Self::Author),
            "admin" => Ok(Self::Admin),
            other => Err(Error::validation(format!("unknown role: {other:?}"))),
        }
    }
}

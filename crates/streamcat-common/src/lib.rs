//! Streamcat-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across streamcat:
//!
//! - **Typed IDs**: Wrappers for content, viewer, and curated list identifiers
//! - **Core Types**: Media kinds and caller roles
//! - **Path Utilities**: MIME inference from file extensions
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use streamcat_common::{ContentId, MediaKind, Error, Result};
//! use streamcat_common::paths::audio_mime_type;
//! use std::path::Path;
//!
//! let content_id = ContentId::new();
//! let kind: MediaKind = "AUDIO".parse().unwrap();
//!
//! assert_eq!(audio_mime_type(Path::new("song.flac")), "audio/flac");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("content", "abc"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{DenialReason, Error, Result};
pub use ids::*;
pub use types::*;

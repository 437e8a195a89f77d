//! Playback and favorite policies.
//!
//! - [`evaluate`] decides whether a viewer may play a content record. It is
//!   pure and must run on every playback attempt.
//! - [`check_favorite`] decides whether a caller may favorite a content record.

mod access;
mod favorite;

pub use access::{evaluate, Decision, ViewerAttributes};
pub use favorite::{check_favorite, PRIVATE_ONLY};

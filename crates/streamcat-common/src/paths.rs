//! Path utilities for inferring MIME types by extension.
//!
//! Audio and video use separate fixed tables, each with its own fallback,
//! so an unrecognised extension never produces `application/octet-stream`.

use std::path::Path;

/// Audio extension table (lowercase extension, MIME type).
const AUDIO_MIME_TYPES: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("m4a", "audio/mp4"),
    ("flac", "audio/flac"),
];

/// Video extension table (lowercase extension, MIME type).
const VIDEO_MIME_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
];

/// Fallback for audio files with an unknown extension.
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Fallback for video files with an unknown extension, and the type reported
/// for every externally hosted video.
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

fn lookup(path: &Path, table: &[(&str, &'static str)]) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    table
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, mime)| *mime)
}

/// Infer the MIME type of a local audio file.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use streamcat_common::paths::audio_mime_type;
///
/// assert_eq!(audio_mime_type(Path::new("/music/a.WAV")), "audio/wav");
/// assert_eq!(audio_mime_type(Path::new("/music/a.ogg")), "audio/mpeg");
/// ```
pub fn audio_mime_type(path: &Path) -> &'static str {
    lookup(path, AUDIO_MIME_TYPES).unwrap_or(DEFAULT_AUDIO_MIME)
}

/// Infer the MIME type of a local video file.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use streamcat_common::paths::video_mime_type;
///
/// assert_eq!(video_mime_type(Path::new("clip.mkv")), "video/x-matroska");
/// assert_eq!(video_mime_type(Path::new("clip")), "video/mp4");
/// ```
pub fn video_mime_type(path: &Path) -> &'static str {
    lookup(path, VIDEO_MIME_TYPES).unwrap_or(DEFAULT_VIDEO_MIME)
}

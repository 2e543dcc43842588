// src/media.rs

//! Media path classification by extension.
//!
//! Used by the CLI layer to sanity-check paths before handing a command to
//! the supervision engine; the engine itself never validates paths.

use std::path::Path;

/// What a path looks like to the media tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Directory,
    Other,
}

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp", "mts", "m2ts",
    "vob", "ogv", "qt", "rm", "rmvb", "asf", "swf", "f4v", "m4s",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "opus", "aiff", "alac", "amr", "ape", "au",
    "mid", "midi", "ra", "ram", "voc", "weba",
];

/// Classify a path by directory check and case-insensitive extension.
///
/// The path does not need to exist: output files are classified before the
/// encoder creates them, so only the extension matters for files.
pub fn classify(path: &Path) -> MediaKind {
    if path.is_dir() {
        return MediaKind::Directory;
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
                MediaKind::Video
            } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
                MediaKind::Audio
            } else {
                MediaKind::Other
            }
        }
        None => MediaKind::Other,
    }
}

/// Human-readable label for error messages.
pub fn describe(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Video => "a video file",
        MediaKind::Audio => "an audio file",
        MediaKind::Directory => "a directory",
        MediaKind::Other => "an unrecognized file type",
    }
}

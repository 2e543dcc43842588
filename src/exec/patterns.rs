// src/exec/patterns.rs

//! Heuristic classification of single output lines.
//!
//! ffmpeg has no machine-readable status channel, so the engine watches for
//! three independent kinds of lines via case-insensitive substring matching:
//! interactive overwrite prompts, error reports, and end-of-encode summaries.
//! The predicates here are pure functions over one line, so they can be
//! exercised against literal fixtures without a live child.

/// Keywords that mark a line as an error report.
const ERROR_KEYWORDS: &[&str] = &[
    "error",
    "failed",
    "invalid",
    "unable",
    "cannot",
    "unknown",
    "not found",
    "permission denied",
    "access denied",
];

/// ffmpeg emits this DTS warning on slightly malformed inputs; the encode
/// still proceeds, so lines carrying it are never treated as errors.
const BENIGN_MARKER: &str = "non-monotonous";

/// Does this line ask whether an existing output file should be replaced?
pub fn is_overwrite_prompt(line: &str) -> bool {
    let lower = line.to_lowercase();

    // "File 'out.mp4' already exists. Overwrite? [y/N]"
    if lower.contains("already exists") && lower.contains("overwrite") {
        return true;
    }

    // Bare "Overwrite?" / "overwrite (y/n)" variants.
    if lower.contains("overwrite?") || lower.contains("overwrite (y/n)") {
        return true;
    }

    // Chinese builds prompt with these two markers.
    line.contains("已存在") && line.contains("覆盖")
}

/// Does this line report an error?
///
/// Lines carrying the benign DTS diagnostic are exempt even when another
/// keyword would match.
pub fn is_error_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    if lower.contains(BENIGN_MARKER) {
        return false;
    }
    ERROR_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Does this line mark a successfully finished encode?
///
/// Matches the final stream-size summary ("video: ... audio: ... subtitle:
/// ...") or the muxing-overhead line that closes a transcode.
pub fn is_success_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    if lower.contains("video:") && lower.contains("audio:") && lower.contains("subtitle:") {
        return true;
    }
    lower.contains("muxing overhead")
}

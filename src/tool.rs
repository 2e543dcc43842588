// src/tool.rs

//! Encoder command construction and version probing.
//!
//! Command lines are built by joining fragments with spaces, exactly as
//! they will be handed to the shell; the supervision engine never parses
//! them back apart.

use regex::Regex;

use crate::errors::{FfrunError, Result};
use crate::exec::{Executor, ProcessSpawner};

/// Build a plain format-conversion command (`ffmpeg -i IN OUT`); the
/// encoder picks codecs from the output extension.
pub fn convert_command(binary: &str, input: &str, output: &str) -> String {
    join_fragments(&[binary, "-i", input, output])
}

/// Build an audio-extraction command: drop the video stream, copy the audio
/// stream as-is.
pub fn extract_audio_command(binary: &str, input: &str, output: &str) -> String {
    join_fragments(&[binary, "-i", input, "-vn", "-acodec", "copy", output])
}

/// Build a concat-demuxer merge command over a prepared list file.
pub fn merge_command(binary: &str, list_path: &str, output: &str) -> String {
    join_fragments(&[
        binary, "-f", "concat", "-safe", "0", "-i", list_path, "-c", "copy", output,
    ])
}

/// Contents of the ffconcat list file consumed by [`merge_command`].
pub fn concat_list(inputs: &[String]) -> String {
    let mut list = String::new();
    for path in inputs {
        list.push_str(&format!("file '{path}'\n"));
    }
    list
}

fn join_fragments(parts: &[&str]) -> String {
    parts.join(" ")
}

/// What `probe_version` learned about the installed encoder.
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// First line of the version output, e.g. `ffmpeg version 6.1.1 ...`.
    pub banner: String,
    /// The version token extracted from the banner, if it parsed.
    pub version: Option<String>,
    /// Full output of the version command.
    pub transcript: String,
}

/// Run `<binary> -version` through the engine and check the tool responds.
pub async fn probe_version<S: ProcessSpawner>(
    executor: &Executor<S>,
    binary: &str,
) -> Result<VersionInfo> {
    let report = executor.execute(&format!("{binary} -version")).await?;

    if !report.success {
        return Err(FfrunError::ToolUnavailable(format!(
            "`{binary}` did not run cleanly (exit code {})",
            report.exit_code
        )));
    }

    let banner = report.transcript.lines().next().unwrap_or("").to_string();
    let version = Regex::new(r"version\s+(\S+)")
        .ok()
        .and_then(|re| re.captures(&banner).map(|c| c[1].to_string()));

    Ok(VersionInfo {
        banner,
        version,
        transcript: report.transcript,
    })
}

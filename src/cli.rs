// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `ffrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ffrun",
    version,
    about = "Run ffmpeg jobs with overwrite-prompt handling and status detection.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Ffrun.toml` in the current working directory; created with
    /// defaults on first run.
    #[arg(long, value_name = "PATH", default_value = "Ffrun.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FFRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Never answer overwrite prompts automatically.
    #[arg(long)]
    pub no_overwrite: bool,

    /// Print the child's full transcript even for successful runs.
    #[arg(long)]
    pub full_transcript: bool,

    #[command(subcommand)]
    pub command: ToolCommand,
}

/// The encoder jobs `ffrun` knows how to drive.
#[derive(Debug, Clone, Subcommand)]
pub enum ToolCommand {
    /// Convert a video file to another container/format.
    ///
    /// Paths omitted on the command line are prompted for interactively.
    Convert {
        /// Source video file.
        input: Option<String>,
        /// Destination video file; the extension selects the format.
        output: Option<String>,
    },

    /// Extract the audio track from a video file.
    ExtractAudio {
        /// Source video file.
        input: Option<String>,
        /// Destination audio file.
        output: Option<String>,
    },

    /// Concatenate video files into one, without re-encoding.
    Merge {
        /// Destination video file.
        output: String,
        /// Source video files, in playback order.
        inputs: Vec<String>,
    },

    /// Show the encoder tool's version.
    Version {
        /// Print the full version/configuration output.
        #[arg(long)]
        full: bool,
    },

    /// Pass a raw command line to the tool's shell verbatim.
    Exec {
        /// The complete command, quoted as one argument.
        command: String,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

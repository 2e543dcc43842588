// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod media;
pub mod prompt;
pub mod tool;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::{CliArgs, ToolCommand};
use crate::errors::{FfrunError, Result};
use crate::exec::{Executor, ProcessSpawner, RunReport, ShellSpawner};
use crate::media::MediaKind;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (created with defaults on first run)
/// - the supervision engine with the shell spawner
/// - Ctrl-C handling (terminates the in-flight child)
/// - the selected subcommand
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = config::load_or_init(&config_path)?;

    let executor = Executor::new(ShellSpawner);
    executor.set_auto_overwrite(cfg.exec.auto_overwrite && !args.no_overwrite);

    // Ctrl-C → kill the child; the in-flight execute returns what it has.
    {
        let executor = executor.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            executor.stop();
        });
    }

    let binary = cfg.tool.binary.clone();
    let full_transcript = cfg.output.full_transcript || args.full_transcript;

    match args.command {
        ToolCommand::Version { full } => {
            let info = tool::probe_version(&executor, &binary).await?;
            if full {
                print!("{}", info.transcript);
            } else {
                println!("{}", info.banner);
            }
            Ok(())
        }

        ToolCommand::Convert { input, output } => {
            ensure_tool(&executor, &binary).await?;
            let input = resolve_path(input, "Enter the video file to convert:")?;
            let output = resolve_path(output, "Enter the output video file:")?;
            expect_kind(&input, MediaKind::Video, "input")?;
            expect_kind(&output, MediaKind::Video, "output")?;
            let command = tool::convert_command(&binary, &input, &output);
            run_and_present(&executor, &command, full_transcript).await
        }

        ToolCommand::ExtractAudio { input, output } => {
            ensure_tool(&executor, &binary).await?;
            let input = resolve_path(input, "Enter the video file to extract audio from:")?;
            let output = resolve_path(output, "Enter the output audio file:")?;
            expect_kind(&input, MediaKind::Video, "input")?;
            expect_kind(&output, MediaKind::Audio, "output")?;
            let command = tool::extract_audio_command(&binary, &input, &output);
            run_and_present(&executor, &command, full_transcript).await
        }

        ToolCommand::Merge { output, inputs } => {
            ensure_tool(&executor, &binary).await?;
            let inputs = resolve_merge_inputs(inputs)?;
            for input in &inputs {
                expect_kind(input, MediaKind::Video, "input")?;
            }
            expect_kind(&output, MediaKind::Video, "output")?;

            // The concat demuxer reads its inputs from a list file; park it
            // next to the output and clean it up afterwards.
            let list_path = format!("{output}.ffconcat");
            std::fs::write(&list_path, tool::concat_list(&inputs))?;
            let command = tool::merge_command(&binary, &list_path, &output);
            let outcome = run_and_present(&executor, &command, full_transcript).await;
            if let Err(e) = std::fs::remove_file(&list_path) {
                debug!(error = %e, list_path, "failed to remove concat list file");
            }
            outcome
        }

        ToolCommand::Exec { command } => {
            run_and_present(&executor, &command, full_transcript).await
        }
    }
}

/// Refuse to build encoder jobs when the tool is missing or broken.
async fn ensure_tool<S: ProcessSpawner>(executor: &Executor<S>, binary: &str) -> Result<()> {
    let probe = tool::probe_version(executor, binary).await?;
    info!(
        version = probe.version.as_deref().unwrap_or("unknown"),
        "encoder available"
    );
    Ok(())
}

/// Use the provided path or fall back to an interactive prompt.
fn resolve_path(provided: Option<String>, prompt_text: &str) -> Result<String> {
    if let Some(path) = provided {
        return Ok(path);
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    match prompt::read_single_path(
        &mut input,
        &mut output,
        prompt_text,
        prompt::DEFAULT_MAX_ATTEMPTS,
    )? {
        Some(path) => Ok(path),
        None => Err(FfrunError::ConfigError("no file path provided".to_string())),
    }
}

/// Merge inputs: take them from the command line or prompt for a list.
fn resolve_merge_inputs(provided: Vec<String>) -> Result<Vec<String>> {
    let inputs = if provided.is_empty() {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        prompt::read_multi_paths(&mut input, &mut output, "Enter the video files to merge:")?
    } else {
        provided
    };

    if inputs.len() < 2 {
        return Err(FfrunError::ConfigError(
            "merging needs at least two input files".to_string(),
        ));
    }
    Ok(inputs)
}

/// Reject paths whose media kind does not match the job.
fn expect_kind(path_str: &str, wanted: MediaKind, role: &str) -> Result<()> {
    let kind = media::classify(Path::new(path_str));
    if kind != wanted {
        return Err(FfrunError::ConfigError(format!(
            "{role} path `{path_str}` classifies as {} (expected {})",
            media::describe(kind),
            media::describe(wanted),
        )));
    }
    Ok(())
}

/// Execute one command and report the outcome to the user.
async fn run_and_present<S: ProcessSpawner>(
    executor: &Executor<S>,
    command: &str,
    full_transcript: bool,
) -> Result<()> {
    info!(command, "running encoder");
    let report = executor.execute(command).await?;
    present(&report, full_transcript)
}

/// Print the result; failed runs become an error so the process exits
/// non-zero.
fn present(report: &RunReport, full_transcript: bool) -> Result<()> {
    if full_transcript || !report.success {
        print!("{}", report.transcript);
    }

    if report.overwrite_prompted {
        let answer = if report.overwrite_confirmed {
            "confirmed automatically"
        } else {
            "left unanswered"
        };
        info!("output file existed; overwrite prompt {answer}");
    }

    if report.success {
        println!("Done (exit code {}).", report.exit_code);
        Ok(())
    } else {
        Err(FfrunError::RunFailed {
            exit_code: report.exit_code,
            last_error: if report.last_error_line.is_empty() {
                "no error line detected".to_string()
            } else {
                report.last_error_line.clone()
            },
        })
    }
}

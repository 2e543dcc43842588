// src/prompt.rs

//! Console file-path prompting.
//!
//! Generic over the reader/writer so tests can drive the prompts from
//! in-memory buffers.

use std::io::{BufRead, Write};

/// How many empty answers a single-path prompt tolerates before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Prompt for one file path.
///
/// Empty answers are retried up to `max_attempts` times; whitespace is
/// trimmed; EOF yields `None`.
pub fn read_single_path<R, W>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    max_attempts: usize,
) -> std::io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{prompt}")?;

    let mut attempts = 0;
    while attempts < max_attempts {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            writeln!(output, "Input terminated (EOF).")?;
            return Ok(None);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            attempts += 1;
            if attempts < max_attempts {
                writeln!(
                    output,
                    "Input cannot be empty. Please try again. ({} attempts remaining)",
                    max_attempts - attempts
                )?;
            } else {
                writeln!(output, "Maximum attempts reached.")?;
            }
            continue;
        }

        return Ok(Some(trimmed.to_string()));
    }

    Ok(None)
}

/// Prompt for a list of file paths, one per line.
///
/// An empty line or EOF finishes the list; entries are trimmed.
pub fn read_multi_paths<R, W>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> std::io::Result<Vec<String>>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{prompt}")?;
    writeln!(output, "Enter paths one per line; an empty line finishes the list.")?;

    let mut paths = Vec::new();
    loop {
        write!(output, "File {}: ", paths.len() + 1)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }

        paths.push(trimmed.to_string());
    }

    Ok(paths)
}

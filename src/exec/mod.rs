// src/exec/mod.rs

//! Child-process supervision layer.
//!
//! This module launches the external encoder, watches its merged
//! stdout+stderr line by line, and answers interactive prompts:
//!
//! - [`spawner`] owns child creation behind the `ProcessSpawner` trait,
//!   with the production `ShellSpawner` implementation.
//! - [`scanner`] reassembles raw byte chunks into lines.
//! - [`patterns`] holds the per-line classification heuristics.
//! - [`executor`] ties it all together: the read/classify/respond loop,
//!   cancellation, and result finalization.

pub mod executor;
pub mod patterns;
pub mod scanner;
pub mod spawner;

pub use executor::Executor;
pub use scanner::LineScanner;
pub use spawner::{ChildHandle, ProcessSpawner, ShellSpawner, SpawnedChild};

/// Everything observed during one supervised run.
///
/// Built up by the supervision loop and handed to the caller by value when
/// `execute` returns; never shared while the run is in flight.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// True once a success pattern matched, or via the exit-code tie-break.
    pub success: bool,
    /// The child's exit code; -1 until its termination was observed.
    pub exit_code: i32,
    /// Every observed line, newline-delimited, in arrival order.
    pub transcript: String,
    /// Most recent line the error heuristic matched; empty if none.
    pub last_error_line: String,
    /// An overwrite prompt was seen.
    pub overwrite_prompted: bool,
    /// A prompt was seen and an affirmative answer was sent.
    pub overwrite_confirmed: bool,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            success: false,
            exit_code: -1,
            transcript: String::new(),
            last_error_line: String::new(),
            overwrite_prompted: false,
            overwrite_confirmed: false,
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

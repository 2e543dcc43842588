// src/config/model.rs

use serde::{Deserialize, Serialize};

use crate::errors::FfrunError;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [tool]
/// binary = "ffmpeg"
///
/// [exec]
/// auto_overwrite = true
///
/// [output]
/// full_transcript = false
/// ```
///
/// All sections are optional and have the defaults shown above.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RawConfigFile {
    /// `[tool]` section: which encoder binary to run.
    #[serde(default)]
    pub tool: ToolSection,

    /// `[exec]` section: supervision behaviour.
    #[serde(default)]
    pub exec: ExecSection,

    /// `[output]` section: how results are presented.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[tool]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolSection {
    /// Program name or path of the encoder binary.
    #[serde(default = "default_binary")]
    pub binary: String,
}

fn default_binary() -> String {
    "ffmpeg".to_string()
}

impl Default for ToolSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

/// `[exec]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecSection {
    /// Answer "overwrite?" prompts with `y` automatically.
    #[serde(default = "default_auto_overwrite")]
    pub auto_overwrite: bool,
}

fn default_auto_overwrite() -> bool {
    true
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            auto_overwrite: default_auto_overwrite(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputSection {
    /// Print the child's full transcript even for successful runs.
    #[serde(default)]
    pub full_transcript: bool,
}

/// Validated configuration used by the rest of the application.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub tool: ToolSection,
    pub exec: ExecSection,
    pub output: OutputSection,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FfrunError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        if raw.tool.binary.trim().is_empty() {
            return Err(FfrunError::ConfigError(
                "tool.binary must not be empty".to_string(),
            ));
        }
        Ok(Self {
            tool: raw.tool,
            exec: raw.exec,
            output: raw.output,
        })
    }
}

impl ConfigFile {
    /// Look up a string setting by dotted key, falling back to `default`
    /// for unknown keys.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        match key {
            "tool.binary" => self.tool.binary.clone(),
            _ => default.to_string(),
        }
    }

    /// Look up a boolean setting by dotted key, falling back to `default`
    /// for unknown keys.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match key {
            "exec.auto_overwrite" => self.exec.auto_overwrite,
            "output.full_transcript" => self.output.full_transcript,
            _ => default,
        }
    }
}

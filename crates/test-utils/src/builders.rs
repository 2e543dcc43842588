#![allow(dead_code)]

use ffrun::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
#[derive(Debug, Clone, Default)]
pub struct ConfigFileBuilder {
    raw: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binary(mut self, binary: &str) -> Self {
        self.raw.tool.binary = binary.to_string();
        self
    }

    pub fn auto_overwrite(mut self, val: bool) -> Self {
        self.raw.exec.auto_overwrite = val;
        self
    }

    pub fn full_transcript(mut self, val: bool) -> Self {
        self.raw.output.full_transcript = val;
        self
    }

    /// The raw form, for serialization round trips.
    pub fn build_raw(self) -> RawConfigFile {
        self.raw
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}

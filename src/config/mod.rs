// src/config/mod.rs

//! Settings persistence (TOML file with typed sections).

pub mod loader;
pub mod model;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_init, save};
pub use model::{ConfigFile, ExecSection, OutputSection, RawConfigFile, ToolSection};

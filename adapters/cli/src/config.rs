//! Optional TOML tuning file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_system_generator::GenerationTuning;
use maze_chase_system_pursuit::PursuitConfig;
use serde::Deserialize;

/// Tunables read from `--config`. Missing tables and keys keep their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) pursuit: PursuitConfig,
    pub(crate) generator: GenerationTuning,
}

impl CliConfig {
    /// Loads the file at `path`, or the defaults when no path was given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid tuning toml")
    }
}

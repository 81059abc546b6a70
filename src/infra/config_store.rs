// ============================================================
// Layer 6 — Config Store
// ============================================================
// Reads and writes PipelineConfig as JSON.
//
//   --config settings.json  → base configuration for a stage;
//                             explicit CLI flags override it
//   pipeline_config.json    → the effective configuration,
//                             saved next to each stage's output
//
// Fields missing from a config file take their defaults, so a
// file may set only what it changes:
//
//   { "fuzzy_threshold": 0.9 }
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::loader::{read_required, resolved};
use crate::domain::config::PipelineConfig;
use crate::domain::errors::InputError;

/// Name of the saved effective configuration
pub const CONFIG_FILE: &str = "pipeline_config.json";

/// Saves configurations into one output directory.
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `cfg` to `<dir>/pipeline_config.json`.
    pub fn save_config(&self, cfg: &PipelineConfig) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved pipeline config to '{}'", path.display());
        Ok(path)
    }

    /// Read a configuration file and check it is usable.
    pub fn load_config(path: &Path) -> Result<PipelineConfig> {
        let json = read_required(path)?;
        let cfg: PipelineConfig =
            serde_json::from_str(&json).map_err(|e| InputError::MalformedInput {
                path:   resolved(path),
                reason: e.to_string(),
            })?;
        cfg.validate()
            .with_context(|| format!("Invalid config in '{}'", path.display()))?;
        Ok(cfg)
    }
}

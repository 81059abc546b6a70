// ============================================================
// Layer 3 — Pipeline Configuration
// ============================================================
// Every tunable of the pipeline lives in one explicit struct
// that is passed into each component. Nothing reads process-wide
// state, so tests can build whatever configuration they need.
//
// Serialisable so a run's effective settings can be saved next
// to its output and reloaded with `--config`.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum similarity a sentence must exceed in the fuzzy tier
    pub fuzzy_threshold: f64,

    /// Characters kept on each side of the answer when focusing
    pub context_window_chars: usize,

    /// Fixed token length of every overflow window
    pub max_sequence_length: usize,

    /// Tokens shared by consecutive overflow windows
    pub stride: usize,

    /// Share of examples held out for validation
    pub validation_fraction: f64,

    /// Seed for the train/validation shuffle
    pub split_seed: u64,

    /// Vocabulary size when a tokenizer has to be built
    pub vocab_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold:      0.8,
            context_window_chars: 256,
            max_sequence_length:  384,
            stride:               128,
            validation_fraction:  0.1,
            split_seed:           42,
            vocab_size:           30522,
        }
    }
}

impl PipelineConfig {
    /// Reject settings no stage can run with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            bail!("fuzzy_threshold must be within [0, 1], got {}", self.fuzzy_threshold);
        }
        if self.context_window_chars == 0 {
            bail!("context_window_chars must be positive");
        }
        if self.max_sequence_length == 0 {
            bail!("max_sequence_length must be positive");
        }
        if self.stride >= self.max_sequence_length {
            bail!(
                "stride ({}) must be less than max_sequence_length ({})",
                self.stride,
                self.max_sequence_length
            );
        }
        if !(0.0..1.0).contains(&self.validation_fraction) {
            bail!(
                "validation_fraction must be within [0, 1), got {}",
                self.validation_fraction
            );
        }
        Ok(())
    }
}

// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three stage subcommands and their flags:
//
//   prepare → knowledge base + QA pairs → dataset
//   focus   → dataset → focused dataset
//   label   → dataset → labelled train/validation windows
//
// Tunables are optional flags: when given they override the
// configuration from `--config` (or the defaults), when absent
// the configured value stands.
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::focus_use_case::FocusPaths;
use crate::application::label_use_case::LabelPaths;
use crate::application::output_dir;
use crate::application::prepare_use_case::PreparePaths;
use crate::domain::config::PipelineConfig;
use crate::infra::config_store::ConfigStore;

/// Name of the partial-match log when `--partials-output` is not given
const DEFAULT_PARTIALS_FILE: &str = "partial_matches_log.json";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locate every answer in the knowledge base and write a SQuAD-style dataset
    Prepare(PrepareArgs),

    /// Shorten each context to a window around its answer
    Focus(FocusArgs),

    /// Split, tokenise, and label the dataset for span extraction
    Label(LabelArgs),
}

/// Flags shared by every stage
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON file with pipeline settings; explicit flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    /// The configuration file's settings, or the defaults.
    fn base(&self) -> Result<PipelineConfig> {
        match &self.config {
            Some(path) => ConfigStore::load_config(path),
            None => Ok(PipelineConfig::default()),
        }
    }
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Directory of extracted .txt documents
    #[arg(long, default_value = "data/processed")]
    pub kb_dir: PathBuf,

    /// JSON array of {"question", "answer"} objects
    #[arg(long, default_value = "data/processed/qa_pairs.json")]
    pub qa_file: PathBuf,

    /// Where to write the dataset
    #[arg(long, default_value = "data/processed/squad_format_qa.json")]
    pub output: PathBuf,

    /// Where to write the partial-match log
    /// [default: partial_matches_log.json next to --output]
    #[arg(long)]
    pub partials_output: Option<PathBuf>,

    /// Similarity a sentence must exceed to count as a fuzzy match
    #[arg(long)]
    pub fuzzy_threshold: Option<f64>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl PrepareArgs {
    pub fn into_parts(self) -> Result<(PreparePaths, PipelineConfig)> {
        let mut cfg = self.config.base()?;
        if let Some(t) = self.fuzzy_threshold {
            cfg.fuzzy_threshold = t;
        }
        cfg.validate()?;

        let partials_output = self
            .partials_output
            .unwrap_or_else(|| output_dir(&self.output).join(DEFAULT_PARTIALS_FILE));

        let paths = PreparePaths {
            kb_dir:  self.kb_dir,
            qa_file: self.qa_file,
            output:  self.output,
            partials_output,
        };
        Ok((paths, cfg))
    }
}

#[derive(Args, Debug)]
pub struct FocusArgs {
    /// Dataset written by `prepare`
    #[arg(long, default_value = "data/processed/squad_format_qa.json")]
    pub input: PathBuf,

    /// Where to write the focused dataset
    #[arg(long, default_value = "data/processed/squad_focused_qa.json")]
    pub output: PathBuf,

    /// Characters kept on each side of the answer
    #[arg(long)]
    pub window_chars: Option<usize>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl FocusArgs {
    pub fn into_parts(self) -> Result<(FocusPaths, PipelineConfig)> {
        let mut cfg = self.config.base()?;
        if let Some(w) = self.window_chars {
            cfg.context_window_chars = w;
        }
        cfg.validate()?;

        Ok((FocusPaths { input: self.input, output: self.output }, cfg))
    }
}

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Dataset to label (usually the focused one)
    #[arg(long, default_value = "data/processed/squad_focused_qa.json")]
    pub input: PathBuf,

    /// Directory for train.json, validation.json and the tokenizer
    #[arg(long, default_value = "data/labelled")]
    pub output_dir: PathBuf,

    /// Hugging Face tokenizer.json to use instead of building one
    #[arg(long)]
    pub tokenizer: Option<PathBuf>,

    /// Fixed token length of every window
    /// Format: [CLS] question [SEP] context [SEP] + padding
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Tokens shared by consecutive windows of one context
    #[arg(long)]
    pub stride: Option<usize>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl LabelArgs {
    pub fn into_parts(self) -> Result<(LabelPaths, PipelineConfig)> {
        let mut cfg = self.config.base()?;
        if let Some(m) = self.max_length {
            cfg.max_sequence_length = m;
        }
        if let Some(s) = self.stride {
            cfg.stride = s;
        }
        cfg.validate()?;

        let paths = LabelPaths {
            input:      self.input,
            output_dir: self.output_dir,
            tokenizer:  self.tokenizer,
        };
        Ok((paths, cfg))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_defaults() {
        let cli = Cli::try_parse_from(["qa-span-builder", "prepare"]).unwrap();
        let Commands::Prepare(args) = cli.command else { panic!("expected prepare") };
        let (paths, cfg) = args.into_parts().unwrap();

        assert_eq!(cfg, PipelineConfig::default());
        assert_eq!(
            paths.partials_output,
            PathBuf::from("data/processed").join(DEFAULT_PARTIALS_FILE)
        );
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"max_sequence_length": 256, "stride": 64, "split_seed": 7}"#).unwrap();

        let cli = Cli::try_parse_from([
            "qa-span-builder", "label",
            "--config", path.to_str().unwrap(),
            "--stride", "32",
        ])
        .unwrap();
        let Commands::Label(args) = cli.command else { panic!("expected label") };
        let (_, cfg) = args.into_parts().unwrap();

        assert_eq!(cfg.max_sequence_length, 256);
        assert_eq!(cfg.stride, 32);
        assert_eq!(cfg.split_seed, 7);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::try_parse_from(["qa-span-builder", "prepare", "--fuzzy-threshold", "1.5"])
            .unwrap();
        let Commands::Prepare(args) = cli.command else { panic!("expected prepare") };
        assert!(args.into_parts().is_err());
    }

    #[test]
    fn test_focus_window_override() {
        let cli = Cli::try_parse_from(["qa-span-builder", "focus", "--window-chars", "64"])
            .unwrap();
        let Commands::Focus(args) = cli.command else { panic!("expected focus") };
        let (_, cfg) = args.into_parts().unwrap();
        assert_eq!(cfg.context_window_chars, 64);
    }
}

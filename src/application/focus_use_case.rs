// ============================================================
// Layer 2 — FocusUseCase
// ============================================================
// Shortens every context to a window around its answer:
//
//   Step 1: Read the dataset               (Layer 4 - data)
//   Step 2: Rebuild Examples, drop broken  (Layer 4 - data)
//   Step 3: Focus every Example            (Layer 5 - span)
//   Step 4: Write, save config, report     (Layer 4/6)

use anyhow::Result;
use std::path::PathBuf;

use crate::application::output_dir;
use crate::data::dataset::SquadFile;
use crate::domain::config::PipelineConfig;
use crate::domain::events::PipelineEvent;
use crate::domain::traits::EventSink;
use crate::infra::config_store::ConfigStore;
use crate::infra::run_report::{RunReport, StageReport};
use crate::span::focuser::ContextFocuser;

#[derive(Debug, Clone)]
pub struct FocusPaths {
    pub input:  PathBuf,
    pub output: PathBuf,
}

pub struct FocusUseCase {
    paths:  FocusPaths,
    config: PipelineConfig,
}

impl FocusUseCase {
    pub fn new(paths: FocusPaths, config: PipelineConfig) -> Self {
        Self { paths, config }
    }

    pub fn execute(&self, sink: &mut dyn EventSink) -> Result<StageReport> {
        let paths = &self.paths;
        let cfg   = &self.config;
        cfg.validate()?;

        // ── Step 1: Read the dataset ──────────────────────────────────────────
        let records = SquadFile::read(&paths.input)?.data;

        // ── Step 2: Rebuild Examples, drop broken records ─────────────────────
        let mut malformed = 0usize;
        let examples: Vec<_> = records
            .iter()
            .filter_map(|r| {
                let example = r.to_example();
                if example.is_none() {
                    malformed += 1;
                    sink.record(PipelineEvent::MalformedRecord { example_id: r.id.clone() });
                }
                example
            })
            .collect();

        // ── Step 3: Focus every Example ───────────────────────────────────────
        let focuser = ContextFocuser::new(cfg.context_window_chars);
        let (focused, lost) = focuser.focus_all(&examples, sink);

        let report = StageReport {
            input:   records.len(),
            emitted: focused.len(),
            dropped: malformed + lost,
            ..StageReport::new("focus")
        };

        // ── Step 4: Write, save config, report ────────────────────────────────
        SquadFile::from_examples(focused).write(&paths.output)?;
        tracing::info!(
            "Focused {} of {} records (window {} chars), saved to '{}'",
            report.emitted,
            report.input,
            cfg.context_window_chars,
            paths.output.display()
        );
        if report.dropped > 0 {
            tracing::warn!("Dropped {} records", report.dropped);
        }

        let dir = output_dir(&paths.output);
        ConfigStore::new(&dir).save_config(cfg)?;
        RunReport::new(&dir)?.log(&report)?;

        Ok(report)
    }
}

// ============================================================
// Layer 2 — LabelUseCase
// ============================================================
// Turns the dataset into labelled token windows:
//
//   Step 1: Read the dataset               (Layer 4 - data)
//   Step 2: Load or build the tokenizer    (Layer 6 - infra)
//   Step 3: Split records train/validation (Layer 4 - data)
//   Step 4: Encode + label each partition  (Layer 5/6)
//   Step 5: Write samples, config, report  (Layer 4/6)
//
// Records with malformed answers are not dropped here: their
// windows are kept and labelled as no-answer, so the model still
// sees the context. A record whose question is too long to leave
// room for context is skipped on its own; the rest of the stage
// carries on.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::dataset::{write_json, QaSample, SquadFile, SquadRecord};
use crate::data::splitter::split_train_val;
use crate::domain::config::PipelineConfig;
use crate::domain::errors::EncodeError;
use crate::domain::events::PipelineEvent;
use crate::domain::example::CharSpan;
use crate::domain::traits::{EventSink, WindowEncoder};
use crate::infra::config_store::ConfigStore;
use crate::infra::run_report::{RunReport, StageReport};
use crate::infra::tokenizer_store::TokenizerStore;
use crate::infra::window_encoder::HfWindowEncoder;
use crate::span::aligner::TokenOffsetAligner;

pub const TRAIN_FILE: &str      = "train.json";
pub const VALIDATION_FILE: &str = "validation.json";

#[derive(Debug, Clone)]
pub struct LabelPaths {
    pub input:      PathBuf,
    pub output_dir: PathBuf,
    /// Tokenizer file to use; None builds one in `output_dir`
    pub tokenizer:  Option<PathBuf>,
}

pub struct LabelUseCase {
    paths:  LabelPaths,
    config: PipelineConfig,
}

impl LabelUseCase {
    pub fn new(paths: LabelPaths, config: PipelineConfig) -> Self {
        Self { paths, config }
    }

    pub fn execute(&self, sink: &mut dyn EventSink) -> Result<StageReport> {
        let paths = &self.paths;
        let cfg   = &self.config;
        cfg.validate()?;

        // ── Step 1: Read the dataset ──────────────────────────────────────────
        let records = SquadFile::read(&paths.input)?.data;
        let input   = records.len();

        // ── Step 2: Load or build the tokenizer ───────────────────────────────
        let tokenizer = match &paths.tokenizer {
            Some(path) => TokenizerStore::load_file(path)?,
            None => {
                let texts: Vec<&str> = records
                    .iter()
                    .flat_map(|r| [r.context.as_str(), r.question.as_str()])
                    .collect();
                TokenizerStore::new(&paths.output_dir).load_or_build(&texts, cfg.vocab_size)?
            }
        };
        let encoder = HfWindowEncoder::new(tokenizer, cfg.max_sequence_length, cfg.stride)?;

        // ── Step 3: Split records train/validation ────────────────────────────
        // Split before encoding so one record's windows share a partition
        let (train, validation) =
            split_train_val(records, cfg.validation_fraction, cfg.split_seed);

        // ── Step 4: Encode + label each partition ─────────────────────────────
        let train_labelled = label_partition(&train, &encoder, sink)?;
        let val_labelled   = label_partition(&validation, &encoder, sink)?;

        // ── Step 5: Write samples, config, report ─────────────────────────────
        write_json(&paths.output_dir.join(TRAIN_FILE), &train_labelled.samples)?;
        write_json(&paths.output_dir.join(VALIDATION_FILE), &val_labelled.samples)?;

        let report = StageReport {
            input,
            emitted:   train_labelled.samples.len() + val_labelled.samples.len(),
            not_found: train_labelled.no_answer + val_labelled.no_answer,
            dropped:   train_labelled.malformed
                + train_labelled.skipped
                + val_labelled.malformed
                + val_labelled.skipped,
            ..StageReport::new("label")
        };

        tracing::info!(
            "Labelled {} train and {} validation windows from {} records, saved to '{}'",
            train_labelled.samples.len(),
            val_labelled.samples.len(),
            input,
            paths.output_dir.display()
        );

        ConfigStore::new(&paths.output_dir).save_config(cfg)?;
        RunReport::new(&paths.output_dir)?.log(&report)?;

        Ok(report)
    }
}

/// Samples of one partition plus its counts
struct Labelled {
    samples:   Vec<QaSample>,
    /// Windows labelled with the sentinel
    no_answer: usize,
    /// Records whose answers could not be read
    malformed: usize,
    /// Records left out because their question was too long
    skipped:   usize,
}

fn label_partition(
    records: &[SquadRecord],
    encoder: &dyn WindowEncoder,
    sink:    &mut dyn EventSink,
) -> Result<Labelled> {
    let mut malformed = 0usize;
    let mut skipped   = 0usize;
    let mut answers: Vec<Option<CharSpan>> = Vec::with_capacity(records.len());
    let mut windows = Vec::new();

    // A skipped record counts once, even if its answers are also malformed
    for (sample_index, r) in records.iter().enumerate() {
        let example = r.to_example();
        answers.push(example.as_ref().and_then(|e| e.answer_span()));

        match encoder.encode_pair(sample_index, &r.question, &r.context) {
            Ok(encoded) => windows.extend(encoded),
            Err(e) if e.downcast_ref::<EncodeError>().is_some() => {
                skipped += 1;
                sink.record(PipelineEvent::QuestionTooLong { example_id: r.id.clone() });
                continue;
            }
            Err(e) => return Err(e),
        }

        if example.is_none() {
            malformed += 1;
            sink.record(PipelineEvent::MalformedRecord { example_id: r.id.clone() });
        }
    }

    let labels = TokenOffsetAligner::new().label_all(&windows, &answers);

    let mut no_answer = 0usize;
    let samples = windows
        .into_iter()
        .zip(labels)
        .map(|(window, label)| {
            if label.is_sentinel_for(&window) {
                no_answer += 1;
            }
            QaSample {
                example_id:     records[window.sample_index].id.clone(),
                sample_index:   window.sample_index,
                input_ids:      window.input_ids,
                attention_mask: window.attention_mask,
                offsets:        window.offsets,
                start_position: label.start,
                end_position:   label.end,
            }
        })
        .collect();

    Ok(Labelled { samples, no_answer, malformed, skipped })
}

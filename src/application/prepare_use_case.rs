// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Builds the character-offset dataset:
//
//   Step 1: Load the knowledge base       (Layer 4 - data)
//   Step 2: Load question/answer pairs    (Layer 4 - data)
//   Step 3: Locate every answer           (Layer 5 - span)
//   Step 4: Write dataset + partial log   (Layer 4 - data)
//   Step 5: Save config, append report    (Layer 6 - infra)
//
// Missing inputs abort the stage before anything is written.

use anyhow::Result;
use std::path::PathBuf;

use crate::application::output_dir;
use crate::data::dataset::{write_partial_log, SquadFile};
use crate::data::loader::{QaFileLoader, TextDirLoader};
use crate::domain::config::PipelineConfig;
use crate::domain::document::KnowledgeBase;
use crate::domain::traits::{DocumentSource, EventSink, QaSource};
use crate::infra::config_store::ConfigStore;
use crate::infra::run_report::{RunReport, StageReport};
use crate::span::assembler::DatasetAssembler;
use crate::span::locator::SpanLocator;

/// Where `prepare` reads from and writes to.
#[derive(Debug, Clone)]
pub struct PreparePaths {
    pub kb_dir:          PathBuf,
    pub qa_file:         PathBuf,
    pub output:          PathBuf,
    pub partials_output: PathBuf,
}

pub struct PrepareUseCase {
    paths:  PreparePaths,
    config: PipelineConfig,
}

impl PrepareUseCase {
    pub fn new(paths: PreparePaths, config: PipelineConfig) -> Self {
        Self { paths, config }
    }

    pub fn execute(&self, sink: &mut dyn EventSink) -> Result<StageReport> {
        let paths = &self.paths;
        let cfg   = &self.config;
        cfg.validate()?;

        // ── Step 1: Load the knowledge base ───────────────────────────────────
        let kb: KnowledgeBase = TextDirLoader::new(&paths.kb_dir)
            .load_all()?
            .into_iter()
            .collect();
        if kb.is_empty() {
            tracing::warn!("No .txt documents in '{}'; every answer will be not found", paths.kb_dir.display());
        } else {
            tracing::info!("Searching {} documents", kb.len());
        }

        // ── Step 2: Load question/answer pairs ────────────────────────────────
        let pairs = QaFileLoader::new(&paths.qa_file).load_pairs()?;

        // ── Step 3: Locate every answer ───────────────────────────────────────
        let locator  = SpanLocator::new(cfg.fuzzy_threshold)?;
        let assembly = DatasetAssembler::new(locator).assemble(&pairs, &kb, sink);

        let report = StageReport {
            input:     pairs.len(),
            emitted:   assembly.examples.len(),
            partial:   assembly.partials.len(),
            not_found: assembly.not_found,
            dropped:   assembly.invalid,
            ..StageReport::new("prepare")
        };

        // ── Step 4: Write dataset + partial log ───────────────────────────────
        SquadFile::from_examples(assembly.examples).write(&paths.output)?;
        tracing::info!(
            "Created {} examples from {} pairs, saved to '{}'",
            report.emitted,
            report.input,
            paths.output.display()
        );

        for (tier, count) in &assembly.by_tier {
            tracing::info!("  {:<16} {}", tier, count);
        }

        if write_partial_log(&paths.partials_output, &assembly.partials)? {
            tracing::info!(
                "{} partial matches saved to '{}'",
                report.partial,
                paths.partials_output.display()
            );
        }
        if report.not_found > 0 {
            tracing::warn!("{} answers could not be found in any document", report.not_found);
        }

        // ── Step 5: Save config, append report ────────────────────────────────
        let dir = output_dir(&paths.output);
        ConfigStore::new(&dir).save_config(cfg)?;
        RunReport::new(&dir)?.log(&report)?;

        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::InputError;
    use crate::domain::events::{CollectingSink, PipelineEvent};
    use crate::infra::config_store::CONFIG_FILE;
    use crate::infra::run_report::REPORT_FILE;
    use std::fs;
    use tempfile::tempdir;

    fn paths(root: &std::path::Path) -> PreparePaths {
        PreparePaths {
            kb_dir:          root.join("kb"),
            qa_file:         root.join("qa.json"),
            output:          root.join("out").join("squad.json"),
            partials_output: root.join("out").join("partials.json"),
        }
    }

    #[test]
    fn test_prepare_end_to_end() {
        let dir   = tempdir().unwrap();
        let paths = paths(dir.path());

        fs::create_dir_all(&paths.kb_dir).unwrap();
        fs::write(paths.kb_dir.join("a.txt"), "The river is the Seine.").unwrap();
        fs::write(paths.kb_dir.join("b.txt"), "The capital of France is Paris.").unwrap();
        fs::write(
            &paths.qa_file,
            r#"[
                {"question": "Capital?",  "answer": "Paris"},
                {"question": "River?",    "answer": "the seine"},
                {"question": "Mountain?", "answer": "Mont Blanc"},
                {"question": "Empty?",    "answer": "  "}
            ]"#,
        )
        .unwrap();

        let mut sink = CollectingSink::new();
        let report = PrepareUseCase::new(paths.clone(), PipelineConfig::default())
            .execute(&mut sink)
            .unwrap();

        assert_eq!(report.input, 4);
        assert_eq!(report.emitted, 2);
        assert_eq!(report.partial, 1);
        assert_eq!(report.not_found, 1);
        assert_eq!(report.dropped, 1);

        let data = SquadFile::read(&paths.output).unwrap().data;
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].title, "b.txt");
        assert_eq!(data[0].answers.answer_start, vec![25]);
        // case-insensitive match keeps the document's casing
        assert_eq!(data[1].answers.text, vec!["the Seine".to_string()]);
        assert!(data.iter().all(|r| r.to_example().unwrap().is_aligned()));

        assert!(paths.partials_output.exists());
        let out = paths.output.parent().unwrap();
        assert!(out.join(CONFIG_FILE).exists());
        assert!(out.join(REPORT_FILE).exists());

        assert_eq!(sink.count(|e| matches!(e, PipelineEvent::AnswerNotFound { .. })), 1);
        assert_eq!(sink.count(|e| matches!(e, PipelineEvent::InvalidAnswer { .. })), 1);
    }

    #[test]
    fn test_missing_knowledge_base_writes_nothing() {
        let dir   = tempdir().unwrap();
        let paths = paths(dir.path());
        fs::write(&paths.qa_file, r#"[{"question": "q", "answer": "a"}]"#).unwrap();

        let err = PrepareUseCase::new(paths.clone(), PipelineConfig::default())
            .execute(&mut CollectingSink::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::InputMissing { .. })
        ));
        assert!(!paths.output.exists());
    }

    #[test]
    fn test_no_partials_means_no_partial_log() {
        let dir   = tempdir().unwrap();
        let paths = paths(dir.path());
        fs::create_dir_all(&paths.kb_dir).unwrap();
        fs::write(paths.kb_dir.join("a.txt"), "Exact answer here.").unwrap();
        fs::write(&paths.qa_file, r#"[{"question": "q", "answer": "answer"}]"#).unwrap();

        PrepareUseCase::new(paths.clone(), PipelineConfig::default())
            .execute(&mut CollectingSink::new())
            .unwrap();
        assert!(paths.output.exists());
        assert!(!paths.partials_output.exists());
    }
}

// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// `clap` and hands each stage to its use case in Layer 2.
//
// Three commands, usually run in order:
//   1. `prepare` — build the character-offset dataset
//   2. `focus`   — shorten contexts around their answers
//   3. `label`   — produce labelled token windows
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, FocusArgs, LabelArgs, PrepareArgs};

use crate::application::{
    focus_use_case::FocusUseCase, label_use_case::LabelUseCase,
    prepare_use_case::PrepareUseCase,
};
use crate::domain::events::TracingSink;
use crate::infra::run_report::StageReport;

#[derive(Parser, Debug)]
#[command(
    name = "qa-span-builder",
    version,
    about = "Build span-extraction QA training data from documents and question/answer pairs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the stage's use case. Routes only, never computes.
    pub fn run(self) -> Result<()> {
        let report = match self.command {
            Commands::Prepare(args) => run_prepare(args)?,
            Commands::Focus(args)   => run_focus(args)?,
            Commands::Label(args)   => run_label(args)?,
        };

        println!(
            "{} complete: {} in, {} out ({} partial, {} not found, {} dropped)",
            report.stage,
            report.input,
            report.emitted,
            report.partial,
            report.not_found,
            report.dropped
        );
        Ok(())
    }
}

fn run_prepare(args: PrepareArgs) -> Result<StageReport> {
    let (paths, cfg) = args.into_parts()?;
    tracing::info!("Preparing dataset from documents in '{}'", paths.kb_dir.display());
    PrepareUseCase::new(paths, cfg).execute(&mut TracingSink)
}

fn run_focus(args: FocusArgs) -> Result<StageReport> {
    let (paths, cfg) = args.into_parts()?;
    tracing::info!("Focusing contexts of '{}'", paths.input.display());
    FocusUseCase::new(paths, cfg).execute(&mut TracingSink)
}

fn run_label(args: LabelArgs) -> Result<StageReport> {
    let (paths, cfg) = args.into_parts()?;
    tracing::info!("Labelling windows of '{}'", paths.input.display());
    LabelUseCase::new(paths, cfg).execute(&mut TracingSink)
}

// ============================================================
// Layer 6 — Run Report
// ============================================================
// Appends one CSV row per stage run to `run_report.csv` in the
// stage's output directory.
//
// Columns:
//   stage:     prepare, focus or label
//   input:     records the stage read (QA pairs, dataset records)
//   emitted:   records or samples it wrote
//   partial:   examples whose matched text differs from the answer
//   not_found: answers no tier could locate; for label, windows
//              labelled as no-answer
//   dropped:   invalid answers, focus misses and malformed records
//
// Example CSV output:
//   stage,input,emitted,partial,not_found,dropped
//   prepare,120,111,4,7,2
//   focus,111,109,0,0,2
//
// The header is written only when the file is new, so repeated
// runs accumulate in one report.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

/// Name of the report inside an output directory
pub const REPORT_FILE: &str = "run_report.csv";

const HEADER: &str = "stage,input,emitted,partial,not_found,dropped";

/// Counts for one stage run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub stage:     &'static str,
    pub input:     usize,
    pub emitted:   usize,
    pub partial:   usize,
    pub not_found: usize,
    pub dropped:   usize,
}

impl StageReport {
    pub fn new(stage: &'static str) -> Self {
        Self { stage, ..Self::default() }
    }

    fn to_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.stage, self.input, self.emitted, self.partial, self.not_found, self.dropped
        )
    }
}

pub struct RunReport {
    csv_path: PathBuf,
}

impl RunReport {
    /// Open the report in `dir`, writing the header if the file is new.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

        let csv_path = dir.join(REPORT_FILE);
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created run report: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one stage's counts.
    pub fn log(&self, report: &StageReport) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;
        writeln!(f, "{}", report.to_row())?;

        tracing::debug!("Logged {} report to '{}'", report.stage, self.csv_path.display());
        Ok(())
    }
}

// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Only genuinely exceptional conditions are errors here.
// A missing answer, a dropped focus window, or an answer that
// does not fit a token window are expected outcomes of lossy
// text matching; they are reported as events, not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid arguments to the span-resolution core.
#[derive(Debug, Error, PartialEq)]
pub enum SpanError {
    /// An empty answer cannot be located anywhere
    #[error("answer text is empty")]
    EmptyAnswer,

    /// Similarity ratios live in [0, 1]
    #[error("fuzzy threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}

/// A (question, context) pair that cannot be split into windows.
/// Affects only that pair; the stage skips it and carries on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("question leaves {budget} context tokens per window, which must exceed the stride ({stride})")]
    QuestionTooLong { budget: usize, stride: usize },
}

/// Problems with the files a run is started from.
/// Fatal for the run: no partial output is written.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("required input not found: '{}'", path.display())]
    InputMissing { path: PathBuf },

    #[error("malformed input '{}': {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },
}

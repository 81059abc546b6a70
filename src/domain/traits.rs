// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline is written against these traits, not against
// concrete loaders or tokenizers:
//
//   DocumentSource → anything that yields the knowledge base
//   QaSource       → anything that yields question/answer pairs
//   WindowEncoder  → anything that splits (question, context)
//                    pairs into offset-carrying overflow windows
//   EventSink      → anything that receives pipeline diagnostics
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::document::Document;
use crate::domain::events::PipelineEvent;
use crate::domain::qa_pair::QaPair;
use crate::domain::window::TokenWindow;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can load the documents answers are sought in.
///
/// Implementations:
///   - TextDirLoader → every .txt file in a directory
pub trait DocumentSource {
    /// Load all documents, in the order they should be searched.
    fn load_all(&self) -> Result<Vec<Document>>;
}

// ─── QaSource ─────────────────────────────────────────────────────────────────
/// Any component that can load question/answer pairs.
pub trait QaSource {
    fn load_pairs(&self) -> Result<Vec<QaPair>>;
}

// ─── WindowEncoder ────────────────────────────────────────────────────────────
/// Jointly encodes (question, context) pairs with context-only
/// truncation, a fixed sequence length, and overlapping overflow.
///
/// Implementations:
///   - HfWindowEncoder → wraps a `tokenizers::Tokenizer`
pub trait WindowEncoder {
    /// Encode one pair into its main window plus overflow windows,
    /// each tagged with `sample_index`.
    ///
    /// # Errors
    /// `EncodeError::QuestionTooLong` when the question leaves no
    /// more context tokens per window than the stride.
    fn encode_pair(
        &self,
        sample_index: usize,
        question:     &str,
        context:      &str,
    ) -> Result<Vec<TokenWindow>>;
}

// ─── EventSink ────────────────────────────────────────────────────────────────
/// Receives diagnostics. Must not influence pipeline results.
pub trait EventSink {
    fn record(&mut self, event: PipelineEvent);
}

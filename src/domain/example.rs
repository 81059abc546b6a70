// ============================================================
// Layer 3 — Example and PartialMatchRecord
// ============================================================
// An Example anchors one question to a character span inside
// a context. All offsets are CHARACTER offsets (Unicode scalar
// values), not byte offsets; that is what SQuAD-style consumers
// count in.
//
// The binding invariant of the whole pipeline:
//
//   context[answer_start .. answer_start + len(answer_text)] == answer_text
//
// Every Example that leaves a pipeline stage must satisfy it.
// `is_aligned()` checks it without allocating.

use serde::{Deserialize, Serialize};

/// A half-open character range `[start, end)` inside a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharSpan {
    pub start: usize,
    pub end:   usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One training example with a character-level answer span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Globally unique identifier
    pub id: String,

    /// Identifier of the document the context came from
    pub title: String,

    /// The text the answer is located in
    pub context: String,

    /// The natural language question
    pub question: String,

    /// The answer as actually matched in the context;
    /// may differ from the answer text of the source QaPair
    pub answer_text: String,

    /// Character index of the first answer character in `context`
    pub answer_start: usize,
}

impl Example {
    /// Character length of the answer
    pub fn answer_len(&self) -> usize {
        self.answer_text.chars().count()
    }

    /// The answer's character span, or None when there is no answer
    pub fn answer_span(&self) -> Option<CharSpan> {
        if self.answer_text.is_empty() {
            return None;
        }
        let start = self.answer_start;
        Some(CharSpan::new(start, start.saturating_add(self.answer_len())))
    }

    /// True when the context holds the answer text at `answer_start`
    pub fn is_aligned(&self) -> bool {
        self.context
            .chars()
            .skip(self.answer_start)
            .take(self.answer_len())
            .eq(self.answer_text.chars())
    }
}

/// Audit record emitted when the matched text differs from the
/// literal answer. Never used for training directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMatchRecord {
    pub question:        String,
    pub original_answer: String,
    pub matched_answer:  String,
    pub document:        String,
}

// ============================================================
// Layer 3 — QaPair Domain Type
// ============================================================
// A question paired with the free-text answer written for it.
// The answer is NOT guaranteed to appear verbatim in any
// document: answer keys are often paraphrased, and source
// text often comes from OCR. Finding where (and whether) the
// answer occurs is the SpanLocator's job, not this type's.
//
// Example:
//   Question: "What is the punishment for impersonation?"
//   Answer:   "The student is debarred for one year"

use serde::{Deserialize, Serialize};

/// One input record: a question and its literal answer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// The natural language question being asked
    pub question: String,

    /// The answer exactly as written in the QA source
    pub answer: String,
}

#[cfg(test)]
impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer:   answer.into(),
        }
    }
}

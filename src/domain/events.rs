// ============================================================
// Layer 3 — Pipeline Events
// ============================================================
// The span-resolution core never prints or logs. Everything it
// wants to report (an answer that could not be found, a match
// that differs from the answer key, an example dropped while
// focusing) is handed to an EventSink as a PipelineEvent.
//
//   TracingSink    → forwards events to `tracing` (used by the CLI)
//   CollectingSink → keeps events in a Vec (used by tests)
//
// Events are observational only: no sink can change what a
// pipeline stage returns.

use crate::domain::traits::EventSink;

/// Maximum number of answer characters shown in diagnostics
pub const ANSWER_PREVIEW_CHARS: usize = 100;

/// One diagnostic observation from a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// No document in the knowledge base contains the answer
    AnswerNotFound {
        question:       String,
        answer_preview: String,
    },

    /// The answer was matched, but not verbatim
    PartialMatch {
        question:        String,
        original_answer: String,
        matched_answer:  String,
        document:        String,
    },

    /// A QaPair with an empty answer was skipped
    InvalidAnswer { question: String },

    /// The answer could not be re-found after trimming the context
    FocusDropped { example_id: String },

    /// A stored record has empty or inconsistent answer fields
    MalformedRecord { example_id: String },

    /// A record's question leaves no room for context in a window
    QuestionTooLong { example_id: String },
}

/// Shorten an answer for display: first 100 characters, then "..."
pub fn answer_preview(answer: &str) -> String {
    let mut chars = answer.chars();
    let head: String = chars.by_ref().take(ANSWER_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

// ─── TracingSink ──────────────────────────────────────────────────────────────
/// Forwards every event to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::AnswerNotFound { question, answer_preview } => {
                tracing::warn!(
                    "Answer not found in any document for question: '{}' (looking for: '{}')",
                    question,
                    answer_preview
                );
            }
            PipelineEvent::PartialMatch { question, matched_answer, document, .. } => {
                tracing::debug!(
                    "Partial match in '{}' for '{}': '{}'",
                    document,
                    question,
                    matched_answer
                );
            }
            PipelineEvent::InvalidAnswer { question } => {
                tracing::warn!("Skipping question with empty answer: '{}'", question);
            }
            PipelineEvent::FocusDropped { example_id } => {
                tracing::warn!(
                    "Could not find answer for example {} after focusing context",
                    example_id
                );
            }
            PipelineEvent::MalformedRecord { example_id } => {
                tracing::warn!("Record {} has empty or inconsistent answers", example_id);
            }
            PipelineEvent::QuestionTooLong { example_id } => {
                tracing::warn!(
                    "Skipping record {}: question too long for the window length and stride",
                    example_id
                );
            }
        }
    }
}

// ─── CollectingSink ───────────────────────────────────────────────────────────
/// Keeps every event in arrival order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<PipelineEvent>,
}

#[cfg(test)]
impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count events matching a predicate
    pub fn count(&self, pred: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

#[cfg(test)]
impl EventSink for CollectingSink {
    fn record(&mut self, event: PipelineEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_answer_preview_is_unchanged() {
        assert_eq!(answer_preview("Paris"), "Paris");
    }

    #[test]
    fn test_long_answer_preview_is_truncated() {
        let answer  = "x".repeat(150);
        let preview = answer_preview(&answer);
        assert_eq!(preview.len(), ANSWER_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_exactly_100_chars_has_no_ellipsis() {
        let answer = "é".repeat(ANSWER_PREVIEW_CHARS);
        assert_eq!(answer_preview(&answer), answer);
    }

    #[test]
    fn test_collecting_sink_counts() {
        let mut sink = CollectingSink::new();
        sink.record(PipelineEvent::FocusDropped { example_id: "a".into() });
        sink.record(PipelineEvent::InvalidAnswer { question: "q".into() });
        sink.record(PipelineEvent::FocusDropped { example_id: "b".into() });
        assert_eq!(
            sink.count(|e| matches!(e, PipelineEvent::FocusDropped { .. })),
            2
        );
    }
}

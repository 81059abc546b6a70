// ============================================================
// Layer 5 — ContextFocuser
// ============================================================
// Shrinks an Example's context to a window around its answer:
//
//   full context:  ....................[answer]....................
//                        |<- window ->|        |<- window ->|
//   focused:             ..............[answer]..............
//
//   para_start = max(0, answer_start - window)
//   para_end   = min(len(context), answer_start + len(answer) + window)
//
// The answer is then RE-FOUND in the slice with a plain exact
// search (the slice was carved around a known-good match, so the
// fuzzy tiers are not needed). If it is not there, the example
// is dropped rather than emitted with a wrong offset.
//
// If the answer text occurs more than once inside the window the
// first occurrence is taken, which may not be the one originally
// matched.
//
// Examples are replaced, never mutated: the input is left as is.

use crate::domain::events::PipelineEvent;
use crate::domain::example::Example;
use crate::domain::traits::EventSink;
use crate::span::offsets::{char_slice, find_char};

pub struct ContextFocuser {
    /// Characters kept on each side of the answer
    window_chars: usize,
}

impl Default for ContextFocuser {
    fn default() -> Self {
        Self { window_chars: 256 }
    }
}

impl ContextFocuser {
    pub fn new(window_chars: usize) -> Self {
        Self { window_chars }
    }

    /// Focus one example, or None if the answer is lost by slicing.
    pub fn focus(&self, example: &Example) -> Option<Example> {
        let context_len = example.context.chars().count();
        let para_start  = example.answer_start.saturating_sub(self.window_chars);
        let para_end    = example
            .answer_start
            .saturating_add(example.answer_len())
            .saturating_add(self.window_chars)
            .min(context_len);

        let focused   = char_slice(&example.context, para_start, para_end);
        let new_start = find_char(focused, &example.answer_text)?;

        Some(Example {
            context:      focused.to_string(),
            answer_start: new_start,
            ..example.clone()
        })
    }

    /// Focus every example; dropped ones are reported to the sink.
    /// Returns the kept examples and the number dropped.
    pub fn focus_all(
        &self,
        examples: &[Example],
        sink:     &mut dyn EventSink,
    ) -> (Vec<Example>, usize) {
        let mut kept    = Vec::with_capacity(examples.len());
        let mut dropped = 0usize;

        for example in examples {
            match self.focus(example) {
                Some(focused) => kept.push(focused),
                None => {
                    dropped += 1;
                    sink.record(PipelineEvent::FocusDropped {
                        example_id: example.id.clone(),
                    });
                }
            }
        }

        (kept, dropped)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::CollectingSink;

    fn example(context: String, answer: &str) -> Example {
        let answer_start = find_char(&context, answer).expect("answer in context");
        Example {
            id:           "ex-1".into(),
            title:        "doc.txt".into(),
            context,
            question:     "What?".into(),
            answer_text:  answer.into(),
            answer_start,
        }
    }

    #[test]
    fn test_far_from_edges_is_bounded_and_aligned() {
        let ctx = format!("{}the answer is here{}", "a".repeat(1000), "b".repeat(1000));
        let ex  = example(ctx, "answer");
        let fx  = ContextFocuser::new(20).focus(&ex).unwrap();

        assert!(fx.context.chars().count() <= 2 * 20 + "answer".len());
        assert!(fx.is_aligned());
        assert_eq!(fx.answer_start, 20);
        assert_eq!(fx.id, ex.id);
    }

    #[test]
    fn test_original_example_is_unchanged() {
        let ctx = format!("{}needle{}", "x ".repeat(300), " y".repeat(300));
        let ex  = example(ctx.clone(), "needle");
        let before = ex.clone();
        let _ = ContextFocuser::default().focus(&ex);
        assert_eq!(ex, before);
        assert_eq!(ex.context, ctx);
    }

    #[test]
    fn test_answer_near_start_clamps_to_zero() {
        let ctx = format!("Paris is the capital.{}", " filler".repeat(100));
        let ex  = example(ctx, "Paris");
        let fx  = ContextFocuser::new(50).focus(&ex).unwrap();
        assert_eq!(fx.answer_start, 0);
        assert_eq!(fx.context.chars().count(), 5 + 50);
    }

    #[test]
    fn test_window_counts_characters() {
        let ctx = format!("{}€50{}", "é".repeat(40), "ü".repeat(40));
        let ex  = example(ctx, "€50");
        let fx  = ContextFocuser::new(10).focus(&ex).unwrap();
        assert_eq!(fx.context, format!("{}€50{}", "é".repeat(10), "ü".repeat(10)));
        assert_eq!(fx.answer_start, 10);
    }

    #[test]
    fn test_repeated_answer_takes_first_occurrence_in_window() {
        let mut ex = example("yes, and yes".to_string(), "yes");
        ex.answer_start = 9;
        let fx = ContextFocuser::new(20).focus(&ex).unwrap();
        assert_eq!(fx.answer_start, 0);
        assert!(fx.is_aligned());
    }

    #[test]
    fn test_out_of_range_start_is_dropped_not_overflowed() {
        let mut ex = example("short context".into(), "context");
        ex.answer_start = usize::MAX;
        assert!(ContextFocuser::new(20).focus(&ex).is_none());
    }

    #[test]
    fn test_misaligned_example_is_dropped() {
        let mut ex = example(format!("answer{}", " pad".repeat(100)), "answer");
        // offset points far away from the real answer
        ex.answer_start = 300;
        let mut sink = CollectingSink::new();
        let (kept, dropped) = ContextFocuser::new(10).focus_all(&[ex], &mut sink);
        assert!(kept.is_empty());
        assert_eq!(dropped, 1);
        assert_eq!(
            sink.events,
            vec![PipelineEvent::FocusDropped { example_id: "ex-1".into() }]
        );
    }
}

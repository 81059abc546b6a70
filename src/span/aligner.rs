// ============================================================
// Layer 5 — TokenOffsetAligner
// ============================================================
// Maps an Example's character span onto token indices in each of
// its overflow windows.
//
// A window looks like:
//
//   index:    0      1   2   3      4    5     6    7    8      9     10
//   token:  [CLS]  who  is  [SEP]  The  king  was  Bob  .    [SEP]  [PAD]
//   offset: (0,0) (0,0)(0,0)(0,0) (0,3)(4,8) (9,12)(13,16)(16,17)(0,0)(0,0)
//
// Only context tokens carry real offsets. For the answer "Bob"
// (chars 13..16):
//
//   start scan  →  first context token whose start > 13 is "." (8);
//                  the start token is the one before it: 7
//   end scan    ←  walk left past tokens whose end ≥ 16; the first
//                  token entirely before 16 is "was" (6); the end
//                  token is the one after it: 7
//
//   label = (7, 7)
//
// If either scan runs off the context segment, or the resolved
// tokens do not cover the whole answer, the window does not hold
// the answer and both labels point at the sentinel (the [CLS]
// position). A window is never labelled with a span that covers
// only part of the answer.

use crate::domain::example::CharSpan;
use crate::domain::window::{TokenSpanLabel, TokenWindow};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOffsetAligner;

impl TokenOffsetAligner {
    pub fn new() -> Self {
        Self
    }

    /// Label one window. `answer` is None for examples without an answer.
    pub fn label(&self, window: &TokenWindow, answer: Option<CharSpan>) -> TokenSpanLabel {
        let sentinel = TokenSpanLabel::sentinel(window);

        let Some(span) = answer.filter(|s| !s.is_empty()) else {
            return sentinel;
        };

        let offsets = &window.offsets;
        let first = (0..offsets.len()).find(|&i| window.is_context_token(i));
        let last  = (0..offsets.len()).rev().find(|&i| window.is_context_token(i));
        let (Some(first), Some(last)) = (first, last) else {
            return sentinel;
        };

        // ── Start scan (left to right) ────────────────────────────────────────
        let mut s = first;
        while s <= last && offsets[s].0 <= span.start {
            s += 1;
        }
        if s == first {
            // the window's context begins after the answer does
            return sentinel;
        }
        let start_token = s - 1;

        // ── End scan (right to left) ──────────────────────────────────────────
        let mut e = last;
        let before_end = loop {
            if offsets[e].1 < span.end {
                break Some(e);
            }
            if e == first {
                break None;
            }
            e -= 1;
        };
        let end_token = before_end.map_or(first, |e| e + 1);
        if end_token > last {
            // the window's context ends before the answer does
            return sentinel;
        }

        // ── Consistency check ─────────────────────────────────────────────────
        if start_token > end_token
            || offsets[start_token].0 > span.start
            || offsets[end_token].1 < span.end
        {
            return sentinel;
        }

        TokenSpanLabel::new(start_token, end_token)
    }

    /// Label every window. `answers[i]` is the answer of sample `i`;
    /// a window whose sample has no entry is labelled as no-answer.
    pub fn label_all(
        &self,
        windows: &[TokenWindow],
        answers: &[Option<CharSpan>],
    ) -> Vec<TokenSpanLabel> {
        windows
            .iter()
            .map(|w| {
                let answer = answers.get(w.sample_index).copied().flatten();
                self.label(w, answer)
            })
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // Context: "The capital of France is Paris."
    //           0   4       12 15     22 25   30
    const CONTEXT_OFFSETS: [(usize, usize); 7] =
        [(0, 3), (4, 11), (12, 14), (15, 21), (22, 24), (25, 30), (30, 31)];

    /// [CLS] q q [SEP] <context tokens> [SEP] [PAD] [PAD]
    fn window(context: &[(usize, usize)], sample_index: usize) -> TokenWindow {
        let mut offsets = vec![(0, 0); 4];
        offsets.extend_from_slice(context);
        offsets.extend_from_slice(&[(0, 0); 3]);
        let n = offsets.len();
        TokenWindow {
            sample_index,
            input_ids:      (0..n as u32).collect(),
            attention_mask: vec![1; n],
            offsets,
            sentinel_index: 0,
        }
    }

    fn label(w: &TokenWindow, start: usize, end: usize) -> TokenSpanLabel {
        TokenOffsetAligner::new().label(w, Some(CharSpan::new(start, end)))
    }

    #[test]
    fn test_single_token_answer() {
        let w = window(&CONTEXT_OFFSETS, 0);
        assert_eq!(label(&w, 25, 30), TokenSpanLabel::new(9, 9));
    }

    #[test]
    fn test_multi_token_answer() {
        let w = window(&CONTEXT_OFFSETS, 0);
        // "France is Paris"
        assert_eq!(label(&w, 15, 30), TokenSpanLabel::new(7, 9));
    }

    #[test]
    fn test_answer_at_context_edges() {
        let w = window(&CONTEXT_OFFSETS, 0);
        // "The" is the first context token
        assert_eq!(label(&w, 0, 3), TokenSpanLabel::new(4, 4));
        // "Paris." ends on the last context token
        assert_eq!(label(&w, 25, 31), TokenSpanLabel::new(9, 10));
    }

    #[test]
    fn test_answer_inside_a_token_expands_to_the_token() {
        let w = window(&CONTEXT_OFFSETS, 0);
        // "aris"
        let l = label(&w, 26, 30);
        assert_eq!(l, TokenSpanLabel::new(9, 9));
    }

    #[test]
    fn test_labelled_tokens_cover_the_answer() {
        let w = window(&CONTEXT_OFFSETS, 0);
        for &(s, e) in &[(0, 3), (4, 14), (12, 24), (15, 31), (22, 30)] {
            let l = label(&w, s, e);
            assert!(!l.is_sentinel_for(&w));
            assert!(w.offsets[l.start].0 <= s);
            assert!(w.offsets[l.end].1 >= e);
            assert!(l.start <= l.end);
        }
    }

    #[test]
    fn test_answer_before_window_gets_sentinel() {
        // window holds only "is Paris."
        let w = window(&CONTEXT_OFFSETS[4..], 0);
        assert_eq!(label(&w, 4, 11), TokenSpanLabel::new(0, 0));
    }

    #[test]
    fn test_answer_after_window_gets_sentinel() {
        // window holds only "The capital of"
        let w = window(&CONTEXT_OFFSETS[..3], 0);
        assert_eq!(label(&w, 25, 30), TokenSpanLabel::new(0, 0));
    }

    #[test]
    fn test_answer_straddling_window_end_gets_sentinel() {
        // window ends at "France"; answer "France is Paris" runs past it
        let w = window(&CONTEXT_OFFSETS[..4], 0);
        assert!(label(&w, 15, 30).is_sentinel_for(&w));
    }

    #[test]
    fn test_answer_straddling_window_start_gets_sentinel() {
        // window starts at "is"; answer "France is" starts before it
        let w = window(&CONTEXT_OFFSETS[4..], 0);
        assert!(label(&w, 15, 24).is_sentinel_for(&w));
    }

    #[test]
    fn test_missing_answer_gets_sentinel() {
        let w = window(&CONTEXT_OFFSETS, 0);
        let aligner = TokenOffsetAligner::new();
        assert!(aligner.label(&w, None).is_sentinel_for(&w));
        assert!(aligner.label(&w, Some(CharSpan::new(5, 5))).is_sentinel_for(&w));
    }

    #[test]
    fn test_window_without_context_gets_sentinel() {
        let w = window(&[], 0);
        assert!(label(&w, 0, 3).is_sentinel_for(&w));
    }

    #[test]
    fn test_label_all_follows_sample_mapping() {
        let windows = vec![
            window(&CONTEXT_OFFSETS[..4], 0),
            window(&CONTEXT_OFFSETS[3..], 0),
            window(&CONTEXT_OFFSETS, 1),
            window(&CONTEXT_OFFSETS, 7),
        ];
        // sample 0: "Paris", sample 1: no answer, sample 7 has no entry
        let answers = vec![Some(CharSpan::new(25, 30)), None];
        let labels  = TokenOffsetAligner::new().label_all(&windows, &answers);

        assert_eq!(labels[0], TokenSpanLabel::new(0, 0));
        // second window: context starts at "France" (index 4), Paris at 6
        assert_eq!(labels[1], TokenSpanLabel::new(6, 6));
        assert_eq!(labels[2], TokenSpanLabel::new(0, 0));
        assert_eq!(labels[3], TokenSpanLabel::new(0, 0));
    }
}

// ============================================================
// Layer 3 — TokenWindow and TokenSpanLabel
// ============================================================
// When a (question, context) pair is longer than the model's
// maximum sequence length, the tokenizer splits it into several
// fixed-length overflow windows that overlap by `stride` tokens:
//
//   [CLS] question [SEP] context tokens 0..k   [SEP]
//   [CLS] question [SEP] context tokens j..m   [SEP]   (j < k)
//   ...
//
// Each window carries the index of the Example it came from
// and, per token, the character span it covers in that
// Example's context. Tokens outside the context segment
// (question, special tokens, padding) carry (0, 0).

use serde::{Deserialize, Serialize};

/// Offsets of a token that is not part of the context segment
pub const NON_CONTEXT_OFFSET: (usize, usize) = (0, 0);

/// One fixed-length tokenised chunk of a (question, context) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWindow {
    /// Index of the Example this window was split from
    pub sample_index: usize,

    /// Token ids, padded to the fixed sequence length
    pub input_ids: Vec<u32>,

    /// 1 for real tokens, 0 for padding
    pub attention_mask: Vec<u32>,

    /// Per-token character offsets (start, end) into the context
    pub offsets: Vec<(usize, usize)>,

    /// The position reserved for "no answer in this window"
    pub sentinel_index: usize,
}

impl TokenWindow {
    /// True when token `i` belongs to the context segment
    pub fn is_context_token(&self, i: usize) -> bool {
        self.offsets
            .get(i)
            .map_or(false, |&o| o != NON_CONTEXT_OFFSET)
    }
}

/// Start and end token indices (both inclusive) of the answer in
/// one window, or both equal to the sentinel when the window does
/// not hold the whole answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpanLabel {
    pub start: usize,
    pub end:   usize,
}

impl TokenSpanLabel {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The "no answer" label for a window
    pub fn sentinel(window: &TokenWindow) -> Self {
        Self::new(window.sentinel_index, window.sentinel_index)
    }

    pub fn is_sentinel_for(&self, window: &TokenWindow) -> bool {
        self.start == window.sentinel_index && self.end == window.sentinel_index
    }
}

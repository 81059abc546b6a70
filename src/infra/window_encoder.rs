// ============================================================
// Layer 6 — Hugging Face Window Encoder
// ============================================================
// Implements WindowEncoder on top of a `tokenizers::Tokenizer`.
//
// Each (question, context) pair is encoded jointly:
//
//   [CLS] question [SEP] context [SEP] [PAD]...
//
//   truncation   only the context is cut (OnlySecond)
//   overflow     the cut-off context becomes extra windows that
//                overlap the previous one by `stride` tokens
//   padding      every window is padded to `max_length`
//   offsets      character offsets, so they index the context
//                the same way Example::answer_start does
//
// Offsets of tokens outside the context (question, specials,
// padding) are replaced with (0, 0) so downstream code can tell
// context tokens apart by their offsets alone.
//
// A question so long that a window has no more than `stride`
// context tokens is rejected up front with
// EncodeError::QuestionTooLong; the tokenizer would otherwise
// panic while building the overflow windows.
//
// Reference: tokenizers crate documentation (Encoding, TruncationParams)

use anyhow::{anyhow, bail, Result};
use tokenizers::{
    Encoding, PaddingDirection, PaddingParams, PaddingStrategy, PostProcessor, Tokenizer,
    TruncationDirection, TruncationParams, TruncationStrategy,
};

use crate::domain::errors::EncodeError;
use crate::domain::traits::WindowEncoder;
use crate::domain::window::{TokenWindow, NON_CONTEXT_OFFSET};

/// Sequence id the tokenizer gives the second (context) segment
const CONTEXT_SEQUENCE: usize = 1;

pub struct HfWindowEncoder {
    tokenizer:   Tokenizer,
    max_length:  usize,
    stride:      usize,
    /// Id of [CLS], the token no-answer labels point at
    sentinel_id: Option<u32>,
}

impl HfWindowEncoder {
    /// Configure `tokenizer` for fixed-length, context-only
    /// truncation with overlapping overflow.
    pub fn new(mut tokenizer: Tokenizer, max_length: usize, stride: usize) -> Result<Self> {
        if stride >= max_length {
            bail!("stride ({stride}) must be smaller than max_length ({max_length})");
        }

        let pad_token = "[PAD]".to_string();
        let pad_id    = tokenizer.token_to_id(&pad_token).unwrap_or(0);

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                stride,
                strategy:  TruncationStrategy::OnlySecond,
                direction: TruncationDirection::Right,
            }))
            .map_err(|e| anyhow!("Invalid truncation settings: {e}"))?;

        tokenizer.with_padding(Some(PaddingParams {
            strategy:           PaddingStrategy::Fixed(max_length),
            direction:          PaddingDirection::Right,
            pad_to_multiple_of: None,
            pad_id,
            pad_type_id:        0,
            pad_token,
        }));

        let sentinel_id = tokenizer.token_to_id("[CLS]");
        if sentinel_id.is_none() {
            tracing::warn!("Tokenizer has no [CLS] token; no-answer labels will use position 0");
        }

        Ok(Self { tokenizer, max_length, stride, sentinel_id })
    }

    /// Tokens a window can spend on context after `question`.
    fn context_budget(&self, question: &str) -> Result<usize> {
        let encoded = self
            .tokenizer
            .encode(question, false)
            .map_err(|e| anyhow!("Cannot tokenise question '{question}': {e}"))?;
        // padding is on, so count real tokens only
        let question_len = encoded.get_attention_mask().iter().filter(|&&m| m == 1).count();
        let specials = self
            .tokenizer
            .get_post_processor()
            .map_or(0, |p| p.added_tokens(true));

        Ok(self
            .max_length
            .saturating_sub(specials)
            .saturating_sub(question_len))
    }

    fn to_window(&self, sample_index: usize, enc: &Encoding) -> TokenWindow {
        let offsets = enc
            .get_offsets()
            .iter()
            .zip(enc.get_sequence_ids())
            .map(|(&offset, seq)| {
                if seq == Some(CONTEXT_SEQUENCE) {
                    offset
                } else {
                    NON_CONTEXT_OFFSET
                }
            })
            .collect();

        let input_ids = enc.get_ids().to_vec();
        let sentinel_index = self
            .sentinel_id
            .and_then(|id| input_ids.iter().position(|&t| t == id))
            .unwrap_or(0);

        TokenWindow {
            sample_index,
            input_ids,
            attention_mask: enc.get_attention_mask().to_vec(),
            offsets,
            sentinel_index,
        }
    }
}

impl WindowEncoder for HfWindowEncoder {
    fn encode_pair(
        &self,
        sample_index: usize,
        question:     &str,
        context:      &str,
    ) -> Result<Vec<TokenWindow>> {
        let budget = self.context_budget(question)?;
        if budget <= self.stride {
            return Err(EncodeError::QuestionTooLong { budget, stride: self.stride }.into());
        }

        let mut encoding = self
            .tokenizer
            .encode_char_offsets((question, context), true)
            .map_err(|e| anyhow!("Tokenisation error for sample {sample_index}: {e}"))?;

        let overflowing = encoding.take_overflowing();
        let windows: Vec<TokenWindow> = std::iter::once(encoding)
            .chain(overflowing)
            .map(|enc| self.to_window(sample_index, &enc))
            .collect();

        tracing::debug!("Sample {} split into {} windows", sample_index, windows.len());
        Ok(windows)
    }
}

// ============================================================
// Layer 5 — SpanLocator
// ============================================================
// Finds the character span of a free-text answer inside a much
// larger context. Source text is often OCR output and answer
// keys are often paraphrased, so the literal answer frequently
// does not reappear verbatim. The locator therefore tries a
// cascade of tiers; the FIRST tier that succeeds wins and no
// score is compared across tiers:
//
//   1. Exact            case-sensitive substring
//   2. CaseInsensitive  substring on case-folded copies; the
//                       returned text keeps the context's casing
//   3. Fuzzy            answers of ≤ 5 words: first sentence whose
//                       similarity ratio exceeds the threshold
//   4. Partial          answers of > 3 words: find the first three
//                       words, extend len(answer) + 50 chars, clip
//                       at the next newline
//
// Each tier is stricter than the next, so the order decides
// which match is reported.
//
// Every returned (start, text) satisfies
//   context[start .. start + len(text)] == text
// with offsets counted in characters.

use crate::domain::errors::SpanError;
use crate::span::offsets::{char_slice, find_char, find_char_ignore_case};
use crate::span::similarity;

/// Answers with at most this many words may be fuzzy-matched
pub const FUZZY_MAX_WORDS: usize = 5;

/// Answers need more than this many words for the partial tier
pub const PARTIAL_MIN_WORDS: usize = 3;

/// Words of the answer used as the partial-tier search prefix
pub const PARTIAL_PREFIX_WORDS: usize = 3;

/// Characters added past the answer length in the partial tier
pub const PARTIAL_EXTENSION_CHARS: usize = 50;

/// Separator between sentence-like units in the fuzzy tier
const SENTENCE_SEPARATOR: &str = ". ";

/// Outcome of locating an answer, tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanMatch {
    Exact           { start: usize, text: String },
    CaseInsensitive { start: usize, text: String },
    Fuzzy           { start: usize, text: String, ratio: f64 },
    Partial         { start: usize, text: String },
    NotFound,
}

impl SpanMatch {
    /// The matched (start, text), or None for NotFound
    pub fn span(&self) -> Option<(usize, &str)> {
        match self {
            SpanMatch::Exact { start, text }
            | SpanMatch::CaseInsensitive { start, text }
            | SpanMatch::Fuzzy { start, text, .. }
            | SpanMatch::Partial { start, text } => Some((*start, text.as_str())),
            SpanMatch::NotFound => None,
        }
    }

    /// Short tier name for logs
    pub fn tier(&self) -> &'static str {
        match self {
            SpanMatch::Exact { .. }           => "exact",
            SpanMatch::CaseInsensitive { .. } => "case-insensitive",
            SpanMatch::Fuzzy { .. }           => "fuzzy",
            SpanMatch::Partial { .. }         => "partial",
            SpanMatch::NotFound               => "not-found",
        }
    }
}

/// Tiered answer locator. Holds only its fuzzy threshold.
#[derive(Debug, Clone, Copy)]
pub struct SpanLocator {
    fuzzy_threshold: f64,
}

impl Default for SpanLocator {
    fn default() -> Self {
        Self { fuzzy_threshold: 0.8 }
    }
}

impl SpanLocator {
    /// Create a locator; the threshold must lie in [0, 1].
    pub fn new(fuzzy_threshold: f64) -> Result<Self, SpanError> {
        if !(0.0..=1.0).contains(&fuzzy_threshold) {
            return Err(SpanError::InvalidThreshold(fuzzy_threshold));
        }
        Ok(Self { fuzzy_threshold })
    }

    /// Locate `answer` in `context`, trying each tier in order.
    ///
    /// # Errors
    /// `SpanError::EmptyAnswer` when the answer is empty or only whitespace.
    pub fn locate(&self, answer: &str, context: &str) -> Result<SpanMatch, SpanError> {
        if answer.trim().is_empty() {
            return Err(SpanError::EmptyAnswer);
        }

        // ── Tier 1: exact substring ───────────────────────────────────────────
        if let Some(start) = find_char(context, answer) {
            return Ok(SpanMatch::Exact { start, text: answer.to_string() });
        }

        // ── Tier 2: case-insensitive substring ───────────────────────────────
        if let Some(start) = find_char_ignore_case(context, answer) {
            let len  = answer.chars().count();
            let text = char_slice(context, start, start + len).to_string();
            return Ok(SpanMatch::CaseInsensitive { start, text });
        }

        let words: Vec<&str> = answer.split_whitespace().collect();

        // ── Tier 3: fuzzy sentence match (short answers) ─────────────────────
        if words.len() <= FUZZY_MAX_WORDS {
            if let Some(found) = self.fuzzy_sentence(answer, context) {
                return Ok(found);
            }
        }

        // ── Tier 4: partial prefix match (long answers) ──────────────────────
        if words.len() > PARTIAL_MIN_WORDS {
            if let Some(found) = partial_prefix(answer, &words, context) {
                return Ok(found);
            }
        }

        Ok(SpanMatch::NotFound)
    }

    /// First sentence whose similarity to the answer exceeds the threshold.
    ///
    /// Newlines become spaces before splitting on ". ". That swap is
    /// one char for one char, so sentence offsets in the normalised
    /// text are offsets in the original context too.
    fn fuzzy_sentence(&self, answer: &str, context: &str) -> Option<SpanMatch> {
        let normalised = context.replace('\n', " ");
        let answer_lc  = answer.to_lowercase();
        let sep_len    = SENTENCE_SEPARATOR.chars().count();

        let mut sentence_start = 0usize;
        for sentence in normalised.split(SENTENCE_SEPARATOR) {
            let sentence_len = sentence.chars().count();
            let r = similarity::ratio(&answer_lc, &sentence.to_lowercase());

            if r > self.fuzzy_threshold {
                let trimmed = sentence.trim();
                let lead    = sentence.chars().take_while(|c| c.is_whitespace()).count();
                let start   = sentence_start + lead;
                let len     = trimmed.chars().count();

                // A sentence that spanned a line break no longer matches
                // the original text; keep looking.
                if !trimmed.is_empty() && char_slice(context, start, start + len) == trimmed {
                    return Some(SpanMatch::Fuzzy {
                        start,
                        text: trimmed.to_string(),
                        ratio: r,
                    });
                }
            }

            sentence_start += sentence_len + sep_len;
        }

        None
    }
}

/// Find the answer's first words and approximate the rest of it
/// from the text that follows, up to the end of that line.
fn partial_prefix(answer: &str, words: &[&str], context: &str) -> Option<SpanMatch> {
    let prefix = words[..PARTIAL_PREFIX_WORDS].join(" ");
    let start  = find_char_ignore_case(context, &prefix)?;

    let context_len = context.chars().count();
    let end = (start + answer.chars().count() + PARTIAL_EXTENSION_CHARS).min(context_len);

    let text = char_slice(context, start, end)
        .split('\n')
        .next()
        .unwrap_or_default()
        .trim();

    Some(SpanMatch::Partial { start, text: text.to_string() })
}

// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Provides the tokenizer the `label` stage encodes with.
//
//   --tokenizer path/to/tokenizer.json
//       → load a Hugging Face tokenizer file as is
//
//   no --tokenizer
//       → reuse <output-dir>/tokenizer.json if present, otherwise
//         build a word-level tokenizer from the dataset text and
//         save it there
//
// The built tokenizer follows BERT conventions: lowercase
// normaliser (accents and CJK characters left as counted), [PAD]=0 [UNK]=1 [CLS]=101 [SEP]=102 [MASK]=103,
// and a post-processor producing
//
//   [CLS] question [SEP] context [SEP]
//
// with type id 1 on the context segment. The JSON is written
// directly and loaded back through `Tokenizer::from_file`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::data::loader::resolved;
use crate::domain::errors::InputError;

/// File name of a tokenizer inside a store directory
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Special tokens and their fixed ids
const SPECIAL_TOKENS: [(&str, u32); 5] = [
    ("[PAD]",  0),
    ("[UNK]",  1),
    ("[CLS]",  101),
    ("[SEP]",  102),
    ("[MASK]", 103),
];

/// First id handed to a vocabulary word
const FIRST_WORD_ID: u32 = 104;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load a tokenizer file; a missing file is `InputMissing`.
    pub fn load_file(path: &Path) -> Result<Tokenizer> {
        if !path.is_file() {
            return Err(InputError::InputMissing { path: resolved(path) }.into());
        }
        Tokenizer::from_file(path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })
    }

    /// Load the stored tokenizer, or build one from `texts`.
    pub fn load_or_build(&self, texts: &[&str], vocab_size: usize) -> Result<Tokenizer> {
        let tok_path = self.path();
        if tok_path.exists() {
            tracing::info!("Loading existing tokenizer from '{}'", tok_path.display());
            Self::load_file(&tok_path)
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    fn build_and_save(&self, texts: &[&str], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))?;

        // ── Step 1: Count pre-tokenised words ─────────────────────────────────
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in pre_tokenize(text) {
                *freq.entry(word.to_lowercase()).or_insert(0) += 1;
            }
        }

        // Most frequent first; ties broken alphabetically so the
        // same corpus always yields the same ids
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(SPECIAL_TOKENS.len()));

        // ── Step 2: Build vocab JSON ──────────────────────────────────────────
        let mut vocab = serde_json::Map::new();
        for (token, id) in SPECIAL_TOKENS {
            vocab.insert(token.to_string(), serde_json::json!(id));
        }
        let mut next_id = FIRST_WORD_ID;
        for (word, _) in &words {
            if !vocab.contains_key(word) {
                vocab.insert(word.clone(), serde_json::json!(next_id));
                next_id += 1;
            }
        }

        // ── Step 3: Write tokenizer JSON in Hugging Face format ───────────────
        let added_tokens: Vec<serde_json::Value> = SPECIAL_TOKENS
            .iter()
            .map(|(content, id)| {
                serde_json::json!({
                    "id": id, "content": content, "single_word": false,
                    "lstrip": false, "rstrip": false, "normalized": false, "special": true
                })
            })
            .collect();

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": false,
                "strip_accents": false,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": {
                "type": "TemplateProcessing",
                "single": [
                    {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                    {"Sequence":     {"id": "A",     "type_id": 0}},
                    {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
                ],
                "pair": [
                    {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                    {"Sequence":     {"id": "A",     "type_id": 0}},
                    {"SpecialToken": {"id": "[SEP]", "type_id": 0}},
                    {"Sequence":     {"id": "B",     "type_id": 1}},
                    {"SpecialToken": {"id": "[SEP]", "type_id": 1}}
                ],
                "special_tokens": {
                    "[CLS]": {"id": "[CLS]", "ids": [101], "tokens": ["[CLS]"]},
                    "[SEP]": {"id": "[SEP]", "ids": [102], "tokens": ["[SEP]"]}
                }
            },
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.path();
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", tok_path.display()))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            vocab.len(),
            tok_path.display()
        );

        Self::load_file(&tok_path)
    }
}

/// Split text the way the `Whitespace` pre-tokenizer does:
/// runs of word characters, and runs of other non-space characters.
fn pre_tokenize(text: &str) -> Vec<&str> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut pieces = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some((s, _)) = start.take() {
                pieces.push(&text[s..i]);
            }
            continue;
        }
        let word = is_word(c);
        match start {
            Some((s, kind)) if kind != word => {
                pieces.push(&text[s..i]);
                start = Some((i, word));
            }
            None => start = Some((i, word)),
            _ => {}
        }
    }
    if let Some((s, _)) = start {
        pieces.push(&text[s..]);
    }
    pieces
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pre_tokenize_splits_punctuation() {
        assert_eq!(pre_tokenize("Hello, world!!"), vec!["Hello", ",", "world", "!!"]);
        assert_eq!(pre_tokenize("  €50 fee_a "), vec!["€", "50", "fee_a"]);
        assert!(pre_tokenize("   ").is_empty());
    }

    #[test]
    fn test_build_then_reload() {
        let dir   = tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = store.load_or_build(&["The fox jumps.", "the dog sleeps"], 100).unwrap();

        assert_eq!(tok.token_to_id("[CLS]"), Some(101));
        assert_eq!(tok.token_to_id("the"), Some(FIRST_WORD_ID));
        assert!(tok.token_to_id("fox").is_some());
        assert!(store.path().exists());

        // second call loads the saved file instead of rebuilding
        let again = store.load_or_build(&[], 100).unwrap();
        assert_eq!(again.token_to_id("fox"), tok.token_to_id("fox"));
    }

    #[test]
    fn test_vocab_size_caps_words() {
        let dir   = tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = store.load_or_build(&["a a a b b c"], 7).unwrap();
        // 5 special tokens + the 2 most frequent words
        assert!(tok.token_to_id("a").is_some());
        assert!(tok.token_to_id("b").is_some());
        assert!(tok.token_to_id("c").is_none());
    }

    #[test]
    fn test_accented_and_cjk_words_keep_their_ids() {
        let dir = tempdir().unwrap();
        let tok = TokenizerStore::new(dir.path())
            .load_or_build(&["Le Café ouvre", "図書館 opens"], 100)
            .unwrap();

        for word in ["café", "図書館"] {
            let id = tok.token_to_id(word).unwrap();
            assert_ne!(id, 1);
            assert_eq!(tok.encode(word, false).unwrap().get_ids(), &[id]);
        }
        // lowercasing still applies
        let cafe = tok.token_to_id("café").unwrap();
        assert_eq!(tok.encode("CAFÉ", false).unwrap().get_ids(), &[cafe]);
    }

    #[test]
    fn test_missing_tokenizer_file() {
        let dir = tempdir().unwrap();
        let err = TokenizerStore::load_file(&dir.path().join("tokenizer.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::InputMissing { .. })
        ));
    }
}

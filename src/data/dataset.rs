// ============================================================
// Layer 4 — Dataset Files
// ============================================================
// On-disk formats produced and consumed by the pipeline:
//
//   SquadFile   {"data": [SquadRecord, ...]}
//               the character-offset dataset written by `prepare`
//               and `focus`, read by `focus` and `label`
//
//   SquadRecord {"id", "title", "context", "question",
//                "answers": {"text": [..], "answer_start": [..]}}
//               the answers arrays always hold exactly one entry
//               when written; on read, anything else is malformed
//
//   QaSample    one labelled token window, written by `label`
//
// The partial-match log is a plain JSON array of
// PartialMatchRecord and is only written when non-empty.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::data::loader::{read_required, resolved};
use crate::domain::errors::InputError;
use crate::domain::example::{Example, PartialMatchRecord};

/// The answers object of a record: parallel arrays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Answers {
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default)]
    pub answer_start: Vec<usize>,
}

/// One record of the dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadRecord {
    pub id:       String,
    pub title:    String,
    pub context:  String,
    pub question: String,
    #[serde(default)]
    pub answers:  Answers,
}

impl SquadRecord {
    /// Convert back to an Example, or None when the answers are
    /// empty, inconsistent, or point outside the context.
    pub fn to_example(&self) -> Option<Example> {
        let (text, start) = match (self.answers.text.as_slice(), self.answers.answer_start.as_slice()) {
            ([text], [start]) if !text.is_empty() => (text, *start),
            _ => return None,
        };

        let example = Example {
            id:           self.id.clone(),
            title:        self.title.clone(),
            context:      self.context.clone(),
            question:     self.question.clone(),
            answer_text:  text.clone(),
            answer_start: start,
        };

        let fits = start
            .checked_add(example.answer_len())
            .map_or(false, |end| end <= self.context.chars().count());
        if !fits {
            return None;
        }
        Some(example)
    }
}

impl From<Example> for SquadRecord {
    fn from(e: Example) -> Self {
        Self {
            id:       e.id,
            title:    e.title,
            context:  e.context,
            question: e.question,
            answers:  Answers {
                text:         vec![e.answer_text],
                answer_start: vec![e.answer_start],
            },
        }
    }
}

/// The whole dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SquadFile {
    pub data: Vec<SquadRecord>,
}

impl SquadFile {
    pub fn from_examples(examples: Vec<Example>) -> Self {
        Self {
            data: examples.into_iter().map(SquadRecord::from).collect(),
        }
    }

    /// Read a dataset file; missing or unparsable files are errors.
    pub fn read(path: &Path) -> Result<Self> {
        let json = read_required(path)?;
        let file = serde_json::from_str(&json).map_err(|e| InputError::MalformedInput {
            path:   resolved(path),
            reason: e.to_string(),
        })?;
        Ok(file)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// One tokenised, labelled overflow window.
/// Sequence format: [CLS] question [SEP] context [SEP] [PAD]...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaSample {
    /// Id of the record this window was split from
    pub example_id:     String,
    /// Index of that record within its partition
    pub sample_index:   usize,
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    /// Per-token character offsets into the context; (0, 0) outside it
    pub offsets:        Vec<(usize, usize)>,
    pub start_position: usize,
    pub end_position:   usize,
}

/// Write the partial-match log; does nothing when there are no records.
/// Returns whether a file was written.
pub fn write_partial_log(path: &Path, partials: &[PartialMatchRecord]) -> Result<bool> {
    if partials.is_empty() {
        return Ok(false);
    }
    write_json(path, partials)?;
    Ok(true)
}

/// Pretty-print `value` as JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

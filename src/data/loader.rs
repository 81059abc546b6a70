// ============================================================
// Layer 4 — Input Loaders
// ============================================================
// Reads the two inputs of the `prepare` stage:
//
//   TextDirLoader → every .txt file in a directory becomes a
//                   Document keyed by its filename
//   QaFileLoader  → a JSON array of {"question", "answer"} objects
//
// Text extraction (PDF, OCR) happens before this point; the
// loader only ever sees plain UTF-8 files.
//
// Directory order from `read_dir` differs between platforms and
// filesystems, so documents are sorted by filename. The
// assembler searches documents in this order, which makes
// "first matching document" reproducible.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::document::Document;
use crate::domain::errors::InputError;
use crate::domain::qa_pair::QaPair;
use crate::domain::traits::{DocumentSource, QaSource};

/// Loads all .txt files from a given directory.
pub struct TextDirLoader {
    dir: PathBuf,
}

impl TextDirLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSource for TextDirLoader {
    fn load_all(&self) -> Result<Vec<Document>> {
        let dir = self.dir.as_path();

        // Unlike a best-effort corpus, a missing knowledge base
        // makes the whole run meaningless
        if !dir.is_dir() {
            return Err(InputError::InputMissing { path: resolved(dir) }.into());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("txt") {
                paths.push(path);
            } else {
                tracing::debug!("Skipping unsupported file: {}", path.display());
            }
        }
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    let id = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown")
                        .to_string();
                    tracing::debug!("Loaded: {} ({} chars)", id, text.chars().count());
                    docs.push(Document::new(id, text));
                }
                // Log a warning but continue; one unreadable file
                // should not sink the run
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", path.display(), e);
                }
            }
        }

        tracing::info!("Loaded {} documents from '{}'", docs.len(), dir.display());
        Ok(docs)
    }
}

/// Loads question/answer pairs from a JSON file.
pub struct QaFileLoader {
    path: PathBuf,
}

impl QaFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QaSource for QaFileLoader {
    fn load_pairs(&self) -> Result<Vec<QaPair>> {
        let json = read_required(&self.path)?;
        let pairs: Vec<QaPair> = serde_json::from_str(&json).map_err(|e| {
            InputError::MalformedInput {
                path:   resolved(&self.path),
                reason: e.to_string(),
            }
        })?;

        tracing::info!("Loaded {} question/answer pairs", pairs.len());
        Ok(pairs)
    }
}

/// Read a file that must exist; a missing file is `InputMissing`.
pub fn read_required(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(InputError::InputMissing { path: resolved(path) }.into());
    }
    fs::read_to_string(path).with_context(|| format!("Cannot read '{}'", path.display()))
}

/// Absolute form of a path for error messages.
pub fn resolved(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_loads_txt_files_sorted_by_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();
        fs::write(dir.path().join("scan.pdf"), "%PDF").unwrap();

        let docs = TextDirLoader::new(dir.path()).load_all().unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "b.txt"]);
        assert_eq!(docs[0].text, "first");
    }

    #[test]
    fn test_missing_directory_is_input_missing() {
        let dir = tempdir().unwrap();
        let err = TextDirLoader::new(dir.path().join("nope")).load_all().unwrap_err();
        let input = err.downcast_ref::<InputError>().unwrap();
        assert!(matches!(input, InputError::InputMissing { path } if path.ends_with("nope")));
    }

    #[test]
    fn test_loads_qa_pairs() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("qa.json");
        fs::write(
            &path,
            r#"[{"question": "Capital?", "answer": "Paris"},
                {"question": "River?", "answer": "Seine"}]"#,
        )
        .unwrap();

        let pairs = QaFileLoader::new(&path).load_pairs().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], QaPair::new("River?", "Seine"));
    }

    #[test]
    fn test_missing_qa_file_is_input_missing() {
        let dir = tempdir().unwrap();
        let err = QaFileLoader::new(dir.path().join("qa.json")).load_pairs().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::InputMissing { .. })
        ));
    }

    #[test]
    fn test_malformed_qa_file() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("qa.json");
        fs::write(&path, r#"{"question": "not an array"}"#).unwrap();
        let err = QaFileLoader::new(&path).load_pairs().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::MalformedInput { .. })
        ));
    }
}

// ============================================================
// Layer 3 — Document and KnowledgeBase
// ============================================================
// A Document is one source text, keyed by its identifier
// (the filename it was loaded from). The KnowledgeBase is the
// full collection of documents, kept in a stable order so that
// answer lookup always visits documents in the same sequence.
//
// Reference: Rust Book §5 (Structs and Methods)
//            Rust Book §8 (Vectors)

use serde::{Deserialize, Serialize};

/// A raw document, already extracted to UTF-8 text.
/// Immutable once loaded; the pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The filename or title, unique within a knowledge base
    pub id: String,

    /// The full document text
    pub text: String,
}

impl Document {
    /// Create a new Document with an identifier and text content.
    ///
    /// Example:
    ///   let doc = Document::new("rules.txt", "Mobile phones are forbidden...");
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id:   id.into(),
            text: text.into(),
        }
    }
}

/// Every document available for answer lookup, in iteration order.
///
/// Insertion order is the search order; a loader that wants a
/// platform-independent order must sort before building.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    documents: Vec<Document>,
}

impl KnowledgeBase {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Iterate documents in search order
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for KnowledgeBase {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

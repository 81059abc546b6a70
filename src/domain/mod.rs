// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that name the concepts
// of the span-resolution pipeline:
//
//   Document / KnowledgeBase → the source texts answers are sought in
//   QaPair                   → one question with its free-text answer
//   Example                  → a question anchored to a character span
//   TokenWindow              → one overflow window of a tokenised example
//   TokenSpanLabel           → the start/end token labels of a window
//   PipelineEvent            → diagnostics reported through an EventSink
//   PipelineConfig           → thresholds, window sizes, sequence length
//
// Rules for this layer:
//   - NO tokenizer types here
//   - NO file I/O
//   - Only data and the traits other layers implement
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A loaded source document and the ordered collection of them
pub mod document;

// A question with its literal answer text
pub mod qa_pair;

// Character-offset examples and partial-match audit records
pub mod example;

// Tokenised overflow windows and their span labels
pub mod window;

// Structured diagnostics and the sinks that receive them
pub mod events;

// Explicit pipeline settings passed into each component
pub mod config;

// Error taxonomy shared by all layers
pub mod errors;

// Core abstractions (traits) that other layers implement
pub mod traits;

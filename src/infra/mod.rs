// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats and third-party integrations that the stages
// share but that are not part of span resolution itself:
//
//   tokenizer_store.rs — loads a Hugging Face tokenizer file, or
//                        builds and saves a word-level one from
//                        the dataset text
//
//   window_encoder.rs  — WindowEncoder over `tokenizers`: joint
//                        encoding, context-only truncation,
//                        overflow windows, character offsets
//
//   config_store.rs    — PipelineConfig as JSON: `--config`
//                        input and the saved effective settings
//
//   run_report.rs      — per-stage counts appended to a CSV
//
// Reference: Rust Book §7 (Modules)

/// Tokenizer loading, building, and saving
pub mod tokenizer_store;

/// Overflow window encoding with character offsets
pub mod window_encoder;

/// Pipeline configuration persistence
pub mod config_store;

/// Stage counts CSV logger
pub mod run_report;

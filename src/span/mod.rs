// ============================================================
// Layer 5 — Span Resolution
// ============================================================
// The core of the system. Two stages turn free-text answers
// into labels a sequence model can train on:
//
//   QaPair + KnowledgeBase
//       │
//       ▼
//   SpanLocator / DatasetAssembler  → character spans (Examples)
//       │
//       ▼
//   ContextFocuser (optional)       → shorter contexts, re-aligned
//       │
//       ▼
//   TokenOffsetAligner              → token spans per overflow window
//
// Everything here is pure: no file I/O, no logging. Diagnostics
// leave through the EventSink trait.
//
// Reference: Rust Book §8 (Strings), §13 (Iterators)

/// Byte/char offset conversion and case folding
pub mod offsets;

/// Ratcliff/Obershelp similarity ratio
pub mod similarity;

/// Tiered answer search inside one context
pub mod locator;

/// QaPairs × KnowledgeBase → Examples
pub mod assembler;

/// Trims contexts to a window around the answer
pub mod focuser;

/// Character spans → token spans per overflow window
pub mod aligner;

// ============================================================
// Layer 4 — Data Files
// ============================================================
// Everything that touches the filesystem for pipeline inputs
// and outputs:
//
//   knowledge-base dir ─┐
//                       ├─ loader    → Documents, QaPairs
//   qa.json ────────────┘
//
//   squad.json        ←→ dataset   → SquadFile / SquadRecord
//   partial log        ← dataset
//   train/validation   ← dataset   (labelled QaSamples)
//
//   splitter                       → seeded train/validation split
//
// Reference: Rust Book §9 (Error Handling), §12 (I/O)

/// Loads .txt knowledge bases and QA pair files
pub mod loader;

/// Dataset file formats and JSON writing
pub mod dataset;

/// Shuffles and splits records into train/validation sets
pub mod splitter;

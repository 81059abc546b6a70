// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per pipeline stage. Each wires the loaders,
// the span core and the infrastructure together, then writes
// its output, the effective configuration and a report row:
//
//   prepare → QA pairs + knowledge base → character-offset dataset
//   focus   → dataset → dataset with shortened contexts
//   label   → dataset → labelled token windows (train/validation)
//
// Rules for this layer:
//   - No span matching or token math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

use std::path::{Path, PathBuf};

/// Knowledge base + QA pairs → dataset
pub mod prepare_use_case;

/// Dataset → focused dataset
pub mod focus_use_case;

/// Dataset → labelled overflow windows
pub mod label_use_case;

/// Directory an output file lives in; `.` for bare file names.
pub(crate) fn output_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

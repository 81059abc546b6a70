// ============================================================
// Layer 5 — Character / Byte Offset Helpers
// ============================================================
// Rust strings are indexed by BYTE, but every span the pipeline
// stores is a CHARACTER offset:
//
//   Text:   "café €50"
//   bytes:   c a f [é ] _ [€    ] 5 0
//            0 1 2 3-4 5 6-7-8  9 10
//   chars:   c a f  é  _   €    5 0
//            0 1 2  3  4   5    6 7
//
// Searching happens with `str::find` (bytes); results are
// converted here before they leave the span layer.

/// Number of characters before byte index `byte_idx`.
///
/// `byte_idx` must lie on a char boundary (as returned by `find`).
pub fn byte_to_char(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// Byte index of character `char_idx`, or `text.len()` past the end.
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(b, _)| b)
}

/// The characters `[start, end)` of `text`, clamped to its length.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let b_start = char_to_byte(text, start);
    let b_end   = char_to_byte(text, end.max(start));
    &text[b_start..b_end]
}

/// Character index of the first occurrence of `needle` in `haystack`.
pub fn find_char(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|b| byte_to_char(haystack, b))
}

/// Lowercase `text` keeping exactly one character per character.
///
/// `str::to_lowercase` may expand a character into several
/// (e.g. 'İ'), which would shift every later index. Taking the
/// first lowercase char keeps indices in the folded text equal
/// to indices in the original.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Character index of the first case-insensitive occurrence.
pub fn find_char_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    find_char(&fold_case(haystack), &fold_case(needle))
}

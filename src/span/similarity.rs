// ============================================================
// Layer 5 — Character Similarity Ratio
// ============================================================
// Ratcliff/Obershelp "gestalt pattern matching":
//
//   1. find the longest common contiguous block of a and b
//   2. recurse on the pieces left and right of that block
//   3. M = total characters in all matched blocks
//
//   ratio = 2 * M / (len(a) + len(b))        ∈ [0, 1]
//
// Example:
//   a = "students carry id cards"       (23 chars)
//   b = "students must carry id cards"  (28 chars)
//   blocks: " carry id cards" (15) + "students" (8) → M = 23
//   ratio = 46 / 51 ≈ 0.90
//
// No junk heuristics are applied: every character counts.

/// Similarity of two strings in [0, 1]; 1.0 for two empty strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total size of all matching blocks, found recursively
/// (iteratively here, with an explicit work stack).
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0usize;
    let mut stack   = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = stack.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            stack.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            stack.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(i, j, k)` with `a[i..i+k] == b[j..j+k]`. Among equally long
/// blocks the one starting earliest in `a`, then in `b`, wins.
fn longest_match(
    a:   &[char],
    b:   &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0usize);

    // prev[x] = length of the common suffix ending at a[i-1], b[blo+x-1]
    let mut prev = vec![0usize; width + 1];
    let mut cur  = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let x = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[x - 1] + 1;
                cur[x] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            } else {
                cur[x] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(ratio("paris", "paris"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_near_duplicate_sentence() {
        let r = ratio("students carry id cards", "students must carry id cards");
        assert!((r - 46.0 / 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_is_order_sensitive_but_bounded() {
        // "abcd" vs "bcda": longest block "bcd" (3) → 6/8
        assert!((ratio("abcd", "bcda") - 0.75).abs() < 1e-9);
        assert!(ratio("abcd", "dcba") <= 1.0);
    }
}

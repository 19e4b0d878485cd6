//! Normalized string similarity
//!
//! Classic edit distance scaled to [0.0, 1.0]. The matcher itself is
//! case-sensitive by contract; callers case-fold before comparing.

/// Similarity between two strings in [0.0, 1.0]
///
/// Symmetric; 1.0 for identical strings. Two empty strings carry no
/// information and score 1.0 by convention so absent fields are not
/// penalized.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b).min(max_len);
    (max_len - distance) as f64 / max_len as f64
}

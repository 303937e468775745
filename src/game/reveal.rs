//! Opening letters in the reveal mask

use super::{normalize_letter, PLACEHOLDER};

/// Open every position of `word` holding `letter`, case-insensitively.
///
/// Positions that don't match keep whatever `mask` shows. The true
/// character from `word` is emitted for matches.
pub fn reveal(word: &str, mask: &str, letter: char) -> String {
    let target = normalize_letter(letter);
    word.chars()
        .zip(mask.chars())
        .map(|(w, m)| if normalize_letter(w) == target { w } else { m })
        .collect()
}

/// Number of positions hidden in `before` and shown in `after`.
pub fn opened_count(before: &str, after: &str) -> usize {
    before
        .chars()
        .zip(after.chars())
        .filter(|&(b, a)| b == PLACEHOLDER && a != PLACEHOLDER)
        .count()
}

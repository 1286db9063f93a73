//! Name ordering shared by the store and the view projection.
//!
//! Both sorts go through [`compare_names`] so a freshly mutated store and the
//! next projection never disagree on ties. The ordering follows the shape of
//! root-locale Unicode collation: punctuation and symbols sort before digits,
//! digits before letters; accents and case only break ties, with lowercase
//! ahead of uppercase.

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Accent- and case-folded form of a name, used as the primary sort key.
pub fn fold_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Primary weight of one folded character.
fn primary(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c)
}

/// Accent-insensitive, case-insensitive comparison first; then accents,
/// then case (lowercase first), then the raw text.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (key_a, key_b) = (fold_key(a), fold_key(b));
    key_a
        .chars()
        .map(primary)
        .cmp(key_b.chars().map(primary))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| {
            let upper = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();
            upper(a).cmp(&upper(b))
        })
        .then_with(|| a.cmp(b))
}

//! User-supplied name sanitization.
//!
//! Rules, applied in order:
//! 1. lowercase;
//! 2. strip diacritics (canonical decomposition, drop combining marks, recompose);
//! 3. drop control characters and every character of [`SPECIAL_CHARACTERS`];
//! 4. replace spaces with `_`;
//! 5. optionally replace `/` with `_` (leaf names).

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Shell and HTML special characters removed from names.
pub const SPECIAL_CHARACTERS: &[char] = &[
    '[', ']', '(', ')', '{', '}', '<', '>', '&', '"', '\'', '§', '!', '$', '*', '€', '^', '%',
    '+', '=', '\\', ';', '?', '`', '|', '#',
];

/// Sanitize a user-supplied name.
///
/// With `remove_slash`, path separators are collapsed to `_` so the result is
/// a single leaf name. The function is idempotent.
pub fn sanitize_name(name: &str, remove_slash: bool) -> String {
    let lowered = name.to_lowercase();

    let without_diacritics: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect();

    let sanitized: String = without_diacritics
        .chars()
        .filter(|c| !c.is_control() && !SPECIAL_CHARACTERS.contains(c))
        .map(|c| match c {
            ' ' => '_',
            '/' if remove_slash => '_',
            other => other,
        })
        .collect();

    sanitized
}

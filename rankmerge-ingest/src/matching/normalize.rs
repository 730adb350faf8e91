//! Name normalization
//!
//! - Unicode NFKD fold with combining marks removed ("Acuña" → "acuna")
//! - Lowercase conversion
//! - Punctuation replaced by whitespace
//! - Whitespace collapsed

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Generational suffixes ignored by relaxed comparison
const GENERATIONAL_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// Normalize a player name for comparison
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<String>()
            } else {
                " ".to_string()
            }
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized tokens of a name
pub fn name_tokens(name: &str) -> Vec<String> {
    normalize_name(name)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Normalized tokens with trailing generational suffixes removed
///
/// At least two tokens are always kept, so "John V" stays a two-token name.
pub fn relaxed_tokens(name: &str) -> Vec<String> {
    strip_generational_suffixes(name_tokens(name))
}

fn strip_generational_suffixes(mut tokens: Vec<String>) -> Vec<String> {
    while tokens.len() > 2 {
        match tokens.last() {
            Some(last) if GENERATIONAL_SUFFIXES.contains(&last.as_str()) => {
                tokens.pop();
            }
            _ => break,
        }
    }
    tokens
}

//! Question-name validation and repair.

use once_cell::sync::Lazy;
use regex::Regex;

static VALID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name pattern"));

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid separator pattern"));

/// Longest name produced by [`sanitize_name`].
const MAX_NAME_LEN: usize = 64;

/// Whether `name` can be used as a question name.
pub fn is_valid_name(name: &str) -> bool {
    VALID_NAME.is_match(name)
}

/// Turn an arbitrary column header into a question name.
///
/// Returns `None` when nothing usable is left (e.g. a header of only
/// punctuation); callers pick a positional fallback.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let lower = raw.trim().replace('#', " num ").to_lowercase();
    let joined = NON_WORD.replace_all(&lower, "_");
    let mut name = joined.trim_matches('_').to_string();

    if name.is_empty() {
        return None;
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name = format!("q_{}", name);
    }
    if name.len() > MAX_NAME_LEN {
        name.truncate(MAX_NAME_LEN);
        name = name.trim_end_matches('_').to_string();
    }
    Some(name)
}

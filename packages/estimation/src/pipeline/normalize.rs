//! Text normalization for fuzzy name and address comparison.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Corporate legal suffixes, whole words only
    static ref SUFFIX_REGEX: Regex = Regex::new(
        r"(?i)\b(inc|llc|ltd|corp|co|group|holdings|plc|limited|company|corporation|incorporated)\b"
    ).unwrap();

    static ref PUNCTUATION_REGEX: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Strip corporate suffixes and punctuation, lowercase and trim.
///
/// `"Acme Corp., LLC"` becomes `"acme"`.
pub fn normalize(text: &str) -> String {
    let without_suffixes = SUFFIX_REGEX.replace_all(text, "");
    let lowered = without_suffixes.to_lowercase();
    PUNCTUATION_REGEX.replace_all(&lowered, "").trim().to_string()
}

//! Revenue extraction from free-form snippet text.
//!
//! Patterns are tried in a fixed priority order and the first one that
//! yields a parseable number wins. All values come out in currency-millions.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "$10 - $20 million", "500-900k"
    static ref RANGE_REGEX: Regex = Regex::new(
        r"(?i)\$?\s*([\d,\.]+)\s*-\s*\$?\s*([\d,\.]+)\s*(million|billion|m|b|k)\b"
    ).unwrap();

    // Single-value patterns: group 1 is the number, group 2 the unit.
    static ref SINGLE_PATTERNS: Vec<Regex> = vec![
        // "USD 12m", "€2.5b"
        Regex::new(r"(?i)(?:USD|€|£)\s*([\d,\.]+)\s*([mbk])\b").unwrap(),
        // "~$3 million", "approx. 40 bil"
        Regex::new(r"(?i)(?:~|approx\.?|about|around)\s*\$?\s*([\d,\.]+)\s*(m|b|k)il").unwrap(),
        // "$5.2 million", "$1,200k"
        Regex::new(r"(?i)\$\s*([\d,\.]+)\s*(million|billion|m|b|k)\b").unwrap(),
        // "annual revenue of $4 million"
        Regex::new(r"(?i)(?:revenue|sales)[^\$]{0,20}\$?\s*([\d,\.]+)\s*(m|b|k)il").unwrap(),
        // "$7 USD million"
        Regex::new(r"(?i)\$\s*([\d,\.]+)\s*(?:USD|US D|Dollars?)\s*(m|b|k)il").unwrap(),
    ];
}

/// Extract a revenue figure in currency-millions.
///
/// Returns `None` when no pattern matches or every matching pattern holds an
/// unparseable number.
pub fn extract(text: &str) -> Option<f64> {
    extract_range(text).or_else(|| {
        SINGLE_PATTERNS
            .iter()
            .find_map(|pattern| extract_single(pattern, text))
    })
}

/// Lower bound of a range, scaled by its unit.
fn extract_range(text: &str) -> Option<f64> {
    let caps = RANGE_REGEX.captures(text)?;
    let low = parse_number(caps.get(1)?.as_str())?;
    let high = parse_number(caps.get(2)?.as_str())?;
    Some(low.min(high) * unit_multiplier(caps.get(3)?.as_str()))
}

fn extract_single(pattern: &Regex, text: &str) -> Option<f64> {
    let caps = pattern.captures(text)?;
    let value = parse_number(caps.get(1)?.as_str())?;
    Some(value * unit_multiplier(caps.get(2)?.as_str()))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Multiplier into millions, keyed on the unit's first letter.
fn unit_multiplier(unit: &str) -> f64 {
    match unit.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('k') => 0.001,
        Some('m') => 1.0,
        Some('b') => 1000.0,
        _ => 1.0,
    }
}

//! Confidence scoring of a snippet against the target company.

use crate::pipeline::normalize::normalize;
use crate::pipeline::similarity::similarity_ratio;
use crate::types::config::ScoringConfig;
use crate::types::observation::ConfidenceTier;

/// Score a snippet with the default thresholds.
pub fn score(observation_text: &str, company_name: &str, company_address: &str) -> ConfidenceTier {
    score_with(observation_text, company_name, company_address, &ScoringConfig::default())
}

/// Score a snippet: `High` when name and address both match, `Medium` for one, `Low` for neither.
pub fn score_with(
    observation_text: &str,
    company_name: &str,
    company_address: &str,
    config: &ScoringConfig,
) -> ConfidenceTier {
    let text = normalize(observation_text);
    let name = normalize(company_name);
    let address = normalize(company_address);

    ConfidenceTier::from_matches(
        name_matches(&text, &name, config),
        address_matches(&text, &address, config),
    )
}

fn name_matches(text: &str, name: &str, config: &ScoringConfig) -> bool {
    if text.contains(name) {
        return true;
    }

    let ratio = similarity_ratio(name, text);
    let single_token = name.split_whitespace().count() == 1;

    ratio > config.name_ratio || (single_token && ratio > config.single_token_ratio)
}

/// Counts every qualifying address token found, so a repeated token counts twice.
fn address_matches(text: &str, address: &str, config: &ScoringConfig) -> bool {
    if address.is_empty() {
        return false;
    }

    let text_tokens: Vec<&str> = text.split_whitespace().collect();
    let hits = address
        .split_whitespace()
        .filter(|token| token.chars().count() >= config.min_address_token_len)
        .filter(|token| text_tokens.contains(token))
        .count();

    hits >= config.min_address_hits
}

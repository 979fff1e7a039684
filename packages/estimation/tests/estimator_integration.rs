//! Integration tests for the per-company estimation flow.
//!
//! These tests drive the full pipeline through a mock snippet source:
//! 1. Primary pass with location
//! 2. Fallback pass without location
//! 3. Scoring into confidence tiers
//! 4. Reconciliation

use estimation::{
    Company, ConfidenceTier, EstimationConfig, Estimate, Estimator, MockSnippetSource, SearchPlan,
};

const SITES: [&str; 5] = ["zoom info", "rocket reach", "zippia", "duns & bradstreet", "estimate"];

fn clover_meadow() -> Company {
    Company::new("Clover Meadow LLC")
        .with_address("23396 Thompson Rd")
        .with_city("Shell Lake")
}

fn primary(site: &str) -> String {
    format!("Clover Meadow LLC revenue 23396 Thompson Rd Shell Lake {site}")
}

fn fallback(site: &str) -> String {
    format!("Clover Meadow LLC revenue {site}")
}

#[tokio::test]
async fn test_high_confidence_hit_wins() {
    let source = MockSnippetSource::new()
        .with_snippets(
            primary("zoom info"),
            &["Clover Meadow revenue is $4.5 million. 23396 Thompson Rd, Shell Lake"],
        )
        .with_snippets(primary("rocket reach"), &["Clover Meadow annual revenue $5 million"])
        .with_snippets(primary("zippia"), &["Clover Meadow revenue $5 million"]);

    let estimator = Estimator::new(source, EstimationConfig::default());
    let estimate = estimator.estimate(&clover_meadow()).await;

    assert_eq!(estimate, Estimate::Value(4.5));
    // Three observations: no fallback pass
    assert_eq!(estimator.source().calls().len(), SITES.len());
}

#[tokio::test]
async fn test_fallback_pass_runs_when_primary_is_thin() {
    let source = MockSnippetSource::new()
        .with_snippets(primary("zippia"), &["Clover Meadow revenue $2 million"])
        .with_snippets(fallback("zoom info"), &["Clover Meadow revenue: $2 million"]);

    let estimator = Estimator::new(source, EstimationConfig::default());
    let company = clover_meadow();

    let observations = estimator.gather(&company).await;
    assert_eq!(observations.len(), 2);

    let groups = estimator.group(&company, &observations);
    assert_eq!(groups.values(ConfidenceTier::Medium), &[2.0, 2.0]);

    let calls = estimator.source().calls();
    assert_eq!(calls.len(), SITES.len() * 2);
    assert_eq!(calls[0], primary("zoom info"));
    assert_eq!(calls[SITES.len()], fallback("zoom info"));
}

#[tokio::test]
async fn test_consensus_across_passes() {
    let source = MockSnippetSource::new()
        .with_snippets(primary("zippia"), &["Clover Meadow revenue $2 million"])
        .with_snippets(fallback("zoom info"), &["Clover Meadow revenue: $2 million"]);

    let estimator = Estimator::new(source, EstimationConfig::default());
    assert_eq!(estimator.estimate(&clover_meadow()).await, Estimate::Value(2.0));
}

#[tokio::test]
async fn test_source_failures_degrade_to_unknown() {
    let source = SITES
        .iter()
        .fold(MockSnippetSource::new(), |source, site| {
            source.with_failure(primary(site)).with_failure(fallback(site))
        });

    let estimator = Estimator::new(source, EstimationConfig::default());
    assert_eq!(estimator.estimate(&clover_meadow()).await, Estimate::Unknown);
    assert_eq!(estimator.source().calls().len(), SITES.len() * 2);
}

#[tokio::test]
async fn test_lone_medium_hit_is_not_trusted() {
    let source = MockSnippetSource::new()
        .with_snippets(primary("estimate"), &["Clover Meadow revenue $3 million"]);

    let estimator = Estimator::new(source, EstimationConfig::default());
    assert_eq!(estimator.estimate(&clover_meadow()).await, Estimate::Unknown);
}

#[tokio::test]
async fn test_no_location_skips_fallback() {
    let source = MockSnippetSource::new();
    let estimator = Estimator::new(source, EstimationConfig::default());

    let estimate = estimator.estimate(&Company::new("Acme")).await;

    assert_eq!(estimate, Estimate::Unknown);
    assert_eq!(estimator.source().calls().len(), SITES.len());
}

#[tokio::test]
async fn test_backup_name_used_when_primary_unknown() {
    let source = MockSnippetSource::new().with_snippets(
        primary("zoom info"),
        &["Clover Meadow revenue is $4.5 million. 23396 Thompson Rd, Shell Lake"],
    );

    let estimator = Estimator::new(source, EstimationConfig::default());
    let dba = clover_meadow().renamed("Meadow Sweets");

    let estimate = estimator
        .estimate_with_backup(&dba, Some("Clover Meadow LLC"))
        .await;

    assert_eq!(estimate, Estimate::Value(4.5));
    let calls = estimator.source().calls();
    assert!(calls[0].starts_with("Meadow Sweets revenue"));
    assert!(calls.contains(&primary("zoom info")));
}

#[tokio::test]
async fn test_invalid_names_are_skipped() {
    let estimator = Estimator::new(MockSnippetSource::new(), EstimationConfig::default());
    let company = clover_meadow().renamed("N/A");

    let estimate = estimator.estimate_with_backup(&company, Some("none")).await;

    assert_eq!(estimate, Estimate::Unknown);
    assert!(estimator.source().calls().is_empty());
}

#[tokio::test]
async fn test_custom_search_plan() {
    let config = EstimationConfig::default().with_search(
        SearchPlan::new()
            .with_sites(["zippia"])
            .with_min_primary_observations(1)
            .with_observations_per_query(3),
    );
    let source = MockSnippetSource::new().with_snippets(
        primary("zippia"),
        &[
            "Clover Meadow revenue $10 million",
            "Clover Meadow revenue $11 million",
            "Clover Meadow revenue $12 million",
        ],
    );

    let estimator = Estimator::new(source, config);
    let estimate = estimator.estimate(&clover_meadow()).await;

    // Low spread, no repeats: the median
    assert_eq!(estimate, Estimate::Value(11.0));
    assert_eq!(estimator.source().calls(), vec![primary("zippia")]);
}

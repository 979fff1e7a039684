//! End-to-end ledger runs against a mock snippet source.

use estimation::{EstimationConfig, Estimator, MockSnippetSource};
use revenue_cli::{run, Ledger, RunOptions, RunSummary};
use std::path::Path;

const INPUT: &str = "\
DBA NAME,BUSINESS NAME,ADDRESS,CITY
Clover Meadow,,23396 THOMPSON RD,SHELL LAKE
Meadow Sweets,Clover Meadow LLC,23396 THOMPSON RD,SHELL LAKE
N/A,none,,
";

fn clover_source() -> MockSnippetSource {
    MockSnippetSource::new()
        .with_snippets(
            "Clover Meadow revenue 23396 THOMPSON RD SHELL LAKE zoom info",
            &["Clover Meadow revenue is $4.5 million. 23396 Thompson Rd"],
        )
        .with_snippets(
            "Clover Meadow LLC revenue 23396 THOMPSON RD SHELL LAKE zoom info",
            &["Clover Meadow revenue is $4.5 million. 23396 Thompson Rd"],
        )
}

fn options(output: &Path, checkpoint_every: usize) -> RunOptions {
    RunOptions {
        output: output.to_path_buf(),
        checkpoint_every,
        min_delay: 0.0,
        max_delay: 0.0,
    }
}

#[tokio::test]
async fn test_full_run_writes_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Updated.csv");

    let estimator = Estimator::new(clover_source(), EstimationConfig::default());
    let mut ledger = Ledger::from_reader(INPUT.as_bytes()).unwrap();

    let summary = run(&estimator, &mut ledger, 0, &options(&output, 10)).await.unwrap();

    assert_eq!(
        summary,
        RunSummary {
            processed: 3,
            estimated: 2,
            unknown: 1,
        }
    );

    let saved = Ledger::load(&output).unwrap();
    assert_eq!(saved.revenue(0), "4.5");
    assert_eq!(saved.revenue(1), "4.5");
    assert_eq!(saved.revenue(2), "N/A");

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("DBA NAME,BUSINESS NAME,ADDRESS,CITY,Revenue(millions)"));
}

#[tokio::test]
async fn test_resume_skips_processed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Updated.csv");

    // First run stops after one row, as if interrupted after a checkpoint
    let mut partial = Ledger::from_reader(INPUT.as_bytes()).unwrap();
    partial.set_estimate(0, estimation::Estimate::Value(9.0));
    partial.save_atomic(&output).unwrap();

    let source = clover_source();
    let estimator = Estimator::new(source, EstimationConfig::default());
    let mut ledger = Ledger::from_reader(INPUT.as_bytes()).unwrap();
    let start = ledger.resume_from(&output);
    assert_eq!(start, 1);

    let summary = run(&estimator, &mut ledger, start, &options(&output, 1)).await.unwrap();
    assert_eq!(summary.processed, 2);

    // Row 0 kept its earlier value and was never searched again
    let saved = Ledger::load(&output).unwrap();
    assert_eq!(saved.revenue(0), "9");
    assert!(estimator
        .source()
        .calls()
        .iter()
        .all(|q| !q.starts_with("Clover Meadow revenue")));
}

#[tokio::test]
async fn test_workbook_run_uses_business_name_for_missing_dba() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Test.xlsx");
    let output = dir.path().join("Updated.xlsx");

    Ledger::from_reader("DBA NAME,BUSINESS NAME,ADDRESS,CITY\nNaN,Acme Corp,nan,nan\n".as_bytes())
        .unwrap()
        .save_atomic(&input)
        .unwrap();

    let snippet = "Acme Corp revenue is $12 million";
    let source = MockSnippetSource::new()
        .with_snippets("Acme Corp revenue zoom info", &[snippet])
        .with_snippets("Acme Corp revenue rocket reach", &[snippet]);
    let estimator = Estimator::new(source, EstimationConfig::default());

    let mut ledger = Ledger::load(&input).unwrap();
    let summary = run(&estimator, &mut ledger, 0, &options(&output, 10)).await.unwrap();
    assert_eq!(summary.estimated, 1);

    let calls = estimator.source().calls();
    assert_eq!(calls.first().map(String::as_str), Some("Acme Corp revenue zoom info"));
    assert!(calls.iter().all(|q| !q.to_lowercase().starts_with("nan")));

    let saved = Ledger::load(&output).unwrap();
    assert_eq!(saved.revenue(0), "12");
}

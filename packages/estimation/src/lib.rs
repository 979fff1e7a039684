//! Revenue Estimation Core
//!
//! Turns noisy search-result snippets into a single revenue estimate for a
//! company, expressed in millions of currency units.
//!
//! # Pipeline
//!
//! ```text
//! snippets ──► extract ──► score ──► ConfidenceGroups ──► reconcile ──► Estimate
//! ```
//!
//! Every stage is a small pure function that can be tested without network
//! or file access. The only asynchronous seam is [`SnippetSource`], which the
//! application implements to fetch snippets for a query.
//!
//! # Usage
//!
//! ```rust,ignore
//! use estimation::{Company, Estimator, EstimationConfig};
//! use estimation::testing::MockSnippetSource;
//!
//! let source = MockSnippetSource::new()
//!     .with_snippets("Acme revenue 123 Main St Springfield zippia", &["Acme revenue: $5.2 million"]);
//!
//! let estimator = Estimator::new(source, EstimationConfig::default());
//! let company = Company::new("Acme Corp").with_address("123 Main St").with_city("Springfield");
//!
//! let estimate = estimator.estimate(&company).await;
//! ```
//!
//! # Modules
//!
//! - [`pipeline`] - normalize, extract, score, reconcile and the per-company estimator
//! - [`types`] - observations, tiers, estimates, companies and configuration
//! - [`traits`] - the snippet source seam
//! - [`testing`] - mock snippet source for tests

pub mod error;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

pub use error::{EstimationError, Result, SourceError, SourceResult};
pub use pipeline::{
    extract, normalize, reconcile, reconcile_with, score, score_with, similarity_ratio,
    Estimator,
};
pub use traits::source::SnippetSource;
pub use types::{
    company::{is_valid_name, Company},
    config::{EstimationConfig, ReconcileConfig, ScoringConfig, SearchPlan},
    observation::{ConfidenceGroups, ConfidenceTier, Estimate, Observation},
};

pub use testing::MockSnippetSource;

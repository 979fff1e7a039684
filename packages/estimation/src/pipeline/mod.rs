//! Estimation pipeline - the core of the library.
//!
//! The pipeline stages, leaf first:
//! - Normalize company names, addresses and snippets for fuzzy comparison
//! - Extract a revenue value in currency-millions from a snippet
//! - Score each snippet against the company identity
//! - Reconcile tiered values into one estimate
//! - Estimate: run the search plan for a company end to end

pub mod estimate;
pub mod extract;
pub mod normalize;
pub mod reconcile;
pub mod score;
pub mod similarity;

pub use estimate::Estimator;
pub use extract::extract;
pub use normalize::normalize;
pub use reconcile::{discrepancy, reconcile, reconcile_tier, reconcile_with, to_millions};
pub use score::{score, score_with};
pub use similarity::similarity_ratio;

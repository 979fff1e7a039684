//! Configuration types for scoring, reconciliation and search planning.

use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};

/// Thresholds used by the confidence scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Similarity ratio above which any name counts as matched.
    ///
    /// Default: 0.85.
    pub name_ratio: f64,

    /// Similarity ratio above which a single-token name counts as matched.
    ///
    /// Default: 0.75.
    pub single_token_ratio: f64,

    /// Address tokens shorter than this are ignored as noise ("st", "rd", house numbers).
    ///
    /// Default: 4.
    pub min_address_token_len: usize,

    /// Address tokens that must appear in the snippet for an address match.
    ///
    /// Default: 2.
    pub min_address_hits: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name_ratio: 0.85,
            single_token_ratio: 0.75,
            min_address_token_len: 4,
            min_address_hits: 2,
        }
    }
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_ratio(mut self, ratio: f64) -> Self {
        self.name_ratio = ratio;
        self
    }

    pub fn with_single_token_ratio(mut self, ratio: f64) -> Self {
        self.single_token_ratio = ratio;
        self
    }

    pub fn with_min_address_hits(mut self, hits: usize) -> Self {
        self.min_address_hits = hits;
        self
    }
}

/// Spread thresholds used by the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Values at or above this are raw currency units and get divided by 1e6.
    ///
    /// Default: 1,000,000.
    pub raw_unit_threshold: f64,

    /// Discrepancy above which the minimum wins outright.
    ///
    /// Default: 0.5.
    pub high_spread: f64,

    /// Discrepancy below which the median is trusted when nothing repeats.
    ///
    /// Default: 0.3.
    pub low_spread: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            raw_unit_threshold: 1e6,
            high_spread: 0.5,
            low_spread: 0.3,
        }
    }
}

impl ReconcileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spreads(mut self, low: f64, high: f64) -> Self {
        self.low_spread = low;
        self.high_spread = high;
        self
    }
}

/// Which queries to issue for a company and how to read their snippets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPlan {
    /// Aggregator sites appended to every query.
    pub sites: Vec<String>,

    /// Snippets must mention this word (case-insensitive) to be extracted.
    pub keyword: String,

    /// Below this many observations the location-free fallback pass runs.
    ///
    /// Default: 3.
    pub min_primary_observations: usize,

    /// Observations kept per query, in snippet order.
    ///
    /// Default: 1.
    pub observations_per_query: usize,
}

impl Default for SearchPlan {
    fn default() -> Self {
        Self {
            sites: vec![
                "zoom info".to_string(),
                "rocket reach".to_string(),
                "zippia".to_string(),
                "duns & bradstreet".to_string(),
                "estimate".to_string(),
            ],
            keyword: "revenue".to_string(),
            min_primary_observations: 3,
            observations_per_query: 1,
        }
    }
}

impl SearchPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sites(mut self, sites: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sites = sites.into_iter().map(|s| s.into()).collect();
        self
    }

    pub fn with_min_primary_observations(mut self, min: usize) -> Self {
        self.min_primary_observations = min;
        self
    }

    pub fn with_observations_per_query(mut self, count: usize) -> Self {
        self.observations_per_query = count;
        self
    }
}

/// Top-level configuration for the per-company estimator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    pub scoring: ScoringConfig,
    pub reconcile: ReconcileConfig,
    pub search: SearchPlan,
}

impl EstimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_reconcile(mut self, reconcile: ReconcileConfig) -> Self {
        self.reconcile = reconcile;
        self
    }

    pub fn with_search(mut self, search: SearchPlan) -> Self {
        self.search = search;
        self
    }

    /// Reject thresholds that would make the policy meaningless.
    pub fn validate(&self) -> Result<()> {
        let unit = |v: f64| (0.0..=1.0).contains(&v);

        if !unit(self.scoring.name_ratio) {
            return Err(EstimationError::invalid_config("scoring.name_ratio", "must be within 0..=1"));
        }
        if !unit(self.scoring.single_token_ratio) {
            return Err(EstimationError::invalid_config(
                "scoring.single_token_ratio",
                "must be within 0..=1",
            ));
        }
        if self.reconcile.raw_unit_threshold <= 0.0 {
            return Err(EstimationError::invalid_config(
                "reconcile.raw_unit_threshold",
                "must be positive",
            ));
        }
        if self.reconcile.low_spread > self.reconcile.high_spread {
            return Err(EstimationError::invalid_config(
                "reconcile.low_spread",
                "must not exceed high_spread",
            ));
        }
        if self.search.sites.is_empty() {
            return Err(EstimationError::invalid_config("search.sites", "at least one site is required"));
        }
        if self.search.observations_per_query == 0 {
            return Err(EstimationError::invalid_config(
                "search.observations_per_query",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

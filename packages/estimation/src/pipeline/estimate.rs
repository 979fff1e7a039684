//! Per-company estimation: search plan, extraction, scoring, reconciliation.
//!
//! ```text
//! primary pass (name + location, every site)
//!        │  fewer than `min_primary_observations`?
//!        ▼
//! fallback pass (name only, every site)
//!        │
//!        ▼
//! score each observation ──► ConfidenceGroups ──► reconcile
//! ```

use tracing::{debug, info, warn};

use crate::pipeline::{extract::extract, reconcile::reconcile_with, score::score_with};
use crate::traits::source::SnippetSource;
use crate::types::company::{is_valid_name, Company};
use crate::types::config::EstimationConfig;
use crate::types::observation::{ConfidenceGroups, Estimate, Observation};

/// Runs the search plan for a company against a snippet source.
pub struct Estimator<S: SnippetSource> {
    source: S,
    config: EstimationConfig,
}

impl<S: SnippetSource> Estimator<S> {
    pub fn new(source: S, config: EstimationConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Estimate revenue for one company.
    pub async fn estimate(&self, company: &Company) -> Estimate {
        let observations = self.gather(company).await;
        let groups = self.group(company, &observations);
        let estimate = reconcile_with(&groups, &self.config.reconcile);

        info!(
            company = %company.name,
            observations = observations.len(),
            estimate = %estimate,
            "Estimated revenue"
        );
        estimate
    }

    /// Estimate under the primary name, retrying under `backup_name` when
    /// the primary name is unusable or yields nothing.
    pub async fn estimate_with_backup(&self, company: &Company, backup_name: Option<&str>) -> Estimate {
        let mut estimate = Estimate::Unknown;

        if is_valid_name(&company.name) {
            estimate = self.estimate(company).await;
        }

        match backup_name {
            Some(backup) if estimate.is_unknown() && is_valid_name(backup) => {
                debug!(company = %company.name, backup, "Falling back to backup name");
                self.estimate(&company.renamed(backup)).await
            }
            _ => estimate,
        }
    }

    /// Collect observations from the primary pass and, if it comes up
    /// short, the location-free fallback pass.
    pub async fn gather(&self, company: &Company) -> Vec<Observation> {
        let plan = &self.config.search;
        let mut observations = Vec::new();

        for site in &plan.sites {
            let query = primary_query(company, site);
            observations.extend(self.observe(&query).await);
        }

        // Without a location the fallback queries would repeat the primary ones.
        if observations.len() < plan.min_primary_observations && company.has_location() {
            debug!(
                company = %company.name,
                found = observations.len(),
                "Too few observations, retrying without location"
            );
            for site in &plan.sites {
                let query = fallback_query(company, site);
                observations.extend(self.observe(&query).await);
            }
        }

        observations
    }

    /// Bucket observations by how well they match the company.
    pub fn group(&self, company: &Company, observations: &[Observation]) -> ConfidenceGroups {
        observations
            .iter()
            .map(|obs| {
                let tier = score_with(
                    &obs.source_text,
                    &company.name,
                    &company.address,
                    &self.config.scoring,
                );
                debug!(value = obs.value, tier = tier.as_u8(), "Scored observation");
                (tier, obs.value)
            })
            .collect()
    }

    /// Source failures count as a query that found nothing.
    async fn observe(&self, query: &str) -> Vec<Observation> {
        match self.source.fetch_snippets(query).await {
            Ok(snippets) => observations_from_snippets(
                &snippets,
                &self.config.search.keyword,
                self.config.search.observations_per_query,
            ),
            Err(e) => {
                warn!("Snippet fetch failed for {}: {}", query, e);
                Vec::new()
            }
        }
    }
}

/// Extract observations from snippets that mention `keyword`, keeping at
/// most `limit` in snippet order. A zero value is no answer.
pub fn observations_from_snippets(snippets: &[String], keyword: &str, limit: usize) -> Vec<Observation> {
    let keyword = keyword.to_lowercase();

    snippets
        .iter()
        .filter(|snippet| snippet.to_lowercase().contains(&keyword))
        .filter_map(|snippet| {
            extract(snippet)
                .filter(|&value| value != 0.0)
                .map(|value| Observation::new(value, snippet.as_str()))
        })
        .take(limit)
        .collect()
}

/// `"{name} revenue {address} {city} {site}"`, skipping blank parts.
pub fn primary_query(company: &Company, site: &str) -> String {
    join_query(&[&company.name, "revenue", &company.address, &company.city, site])
}

/// `"{name} revenue {site}"`.
pub fn fallback_query(company: &Company, site: &str) -> String {
    join_query(&[&company.name, "revenue", site])
}

fn join_query(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

//! Observations, confidence tiers and the final estimate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A revenue value pulled from one snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Revenue in currency-millions.
    pub value: f64,

    /// The snippet the value was extracted from.
    pub source_text: String,
}

impl Observation {
    pub fn new(value: f64, source_text: impl Into<String>) -> Self {
        Self {
            value,
            source_text: source_text.into(),
        }
    }
}

/// How strongly a snippet appears to refer to the target company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// Neither name nor address matched
    Low = 0,

    /// Exactly one of name or address matched
    Medium = 1,

    /// Both name and address matched
    High = 2,
}

impl ConfidenceTier {
    /// Tiers in reconciliation order, highest first.
    pub const DESCENDING: [ConfidenceTier; 3] =
        [ConfidenceTier::High, ConfidenceTier::Medium, ConfidenceTier::Low];

    /// Tier from the number of identity signals that matched.
    pub fn from_matches(name_match: bool, address_match: bool) -> Self {
        match (name_match, address_match) {
            (true, true) => Self::High,
            (true, false) | (false, true) => Self::Medium,
            (false, false) => Self::Low,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ConfidenceTier {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(other),
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Values bucketed by confidence tier.
///
/// Built once per company and consumed by [`crate::reconcile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfidenceGroups {
    groups: BTreeMap<ConfidenceTier, Vec<f64>>,
}

impl ConfidenceGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a tier.
    pub fn push(&mut self, tier: ConfidenceTier, value: f64) {
        self.groups.entry(tier).or_default().push(value);
    }

    /// Values recorded for a tier, in insertion order.
    pub fn values(&self, tier: ConfidenceTier) -> &[f64] {
        self.groups.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of values across all tiers.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> From<[(ConfidenceTier, Vec<f64>); N]> for ConfidenceGroups {
    fn from(entries: [(ConfidenceTier, Vec<f64>); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl FromIterator<(ConfidenceTier, Vec<f64>)> for ConfidenceGroups {
    fn from_iter<I: IntoIterator<Item = (ConfidenceTier, Vec<f64>)>>(iter: I) -> Self {
        let mut groups = Self::new();
        for (tier, values) in iter {
            groups.groups.entry(tier).or_default().extend(values);
        }
        groups
    }
}

impl FromIterator<(ConfidenceTier, f64)> for ConfidenceGroups {
    fn from_iter<I: IntoIterator<Item = (ConfidenceTier, f64)>>(iter: I) -> Self {
        let mut groups = Self::new();
        for (tier, value) in iter {
            groups.push(tier, value);
        }
        groups
    }
}

/// Final revenue answer for one company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "millions", rename_all = "lowercase")]
pub enum Estimate {
    /// Revenue in currency-millions
    Value(f64),

    /// No tier produced a trustworthy answer
    Unknown,
}

impl Estimate {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<Option<f64>> for Estimate {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unknown, Self::Value)
    }
}

/// Renders as the number, or `N/A` when unknown.
impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Unknown => f.write_str("N/A"),
        }
    }
}

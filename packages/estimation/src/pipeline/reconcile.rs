//! Tiered reconciliation of noisy revenue values.
//!
//! Tiers are consulted from `High` down to `Low`; the first tier that
//! produces an answer wins. Within a tier the policy leans conservative:
//! consensus first, then the lower bound, and the median only when the
//! values agree closely.

use tracing::debug;

use crate::types::config::ReconcileConfig;
use crate::types::observation::{ConfidenceGroups, ConfidenceTier, Estimate};

/// Reconcile with the default spread thresholds.
pub fn reconcile(groups: &ConfidenceGroups) -> Estimate {
    reconcile_with(groups, &ReconcileConfig::default())
}

pub fn reconcile_with(groups: &ConfidenceGroups, config: &ReconcileConfig) -> Estimate {
    ConfidenceTier::DESCENDING
        .iter()
        .find_map(|&tier| reconcile_tier(tier, groups.values(tier), config))
        .into()
}

/// Answer for a single tier, or `None` to fall through to the next one.
pub fn reconcile_tier(tier: ConfidenceTier, raw: &[f64], config: &ReconcileConfig) -> Option<f64> {
    // Sorted so every statistic below depends only on the multiset of values.
    let mut values: Vec<f64> = raw
        .iter()
        .map(|&v| to_millions(v, config.raw_unit_threshold))
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));

    match values.as_slice() {
        [] => None,
        [only] => (tier == ConfidenceTier::High).then_some(*only),
        _ => {
            let spread = discrepancy(&values);
            let (mode_count, mode_min) = most_frequent(&values);

            let answer = if spread > config.high_spread {
                minimum(&values)
            } else if mode_count >= 2 {
                mode_min
            } else if spread < config.low_spread {
                median(&values)
            } else {
                minimum(&values)
            };

            debug!(
                tier = tier.as_u8(),
                count = values.len(),
                discrepancy = spread,
                answer,
                "Reconciled tier"
            );
            Some(answer)
        }
    }
}

/// Currency units in one currency-million.
pub const RAW_UNITS_PER_MILLION: f64 = 1e6;

/// Treat values at or above `threshold` as raw currency units.
pub fn to_millions(value: f64, threshold: f64) -> f64 {
    if value < threshold {
        value
    } else {
        value / RAW_UNITS_PER_MILLION
    }
}

/// Coefficient of variation: population standard deviation over mean.
///
/// Zero for fewer than two values or a zero mean.
pub fn discrepancy(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// Highest frequency and the smallest value reaching it. Expects sorted input.
fn most_frequent(values: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NAN);

    let mut start = 0;
    while start < values.len() {
        let run = values[start..]
            .iter()
            .take_while(|&&v| v == values[start])
            .count()
            .max(1);
        // Ascending order: a later run only wins with a strictly higher count.
        if run > best.0 {
            best = (run, values[start]);
        }
        start += run;
    }

    best
}

fn minimum(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Expects sorted input.
fn median(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::types::observation::ConfidenceTier::{High, Low, Medium};

    #[test]
    fn test_high_tier_single_value_wins() {
        let groups = ConfidenceGroups::from([(High, vec![5.0]), (Medium, vec![3.0, 3.0, 9.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(5.0));
    }

    #[test]
    fn test_medium_tier_consensus() {
        let groups = ConfidenceGroups::from([(Medium, vec![3.0, 3.0, 9.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(3.0));
    }

    #[test]
    fn test_high_spread_takes_minimum() {
        let groups = ConfidenceGroups::from([(Low, vec![1.0, 100.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(1.0));
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(reconcile(&ConfidenceGroups::new()), Estimate::Unknown);
    }

    #[test]
    fn test_lone_lower_tier_value_is_not_trusted() {
        let groups = ConfidenceGroups::from([(Medium, vec![4.0]), (Low, vec![7.0])]);
        assert_eq!(reconcile(&groups), Estimate::Unknown);
    }

    #[test]
    fn test_falls_through_to_lower_tier() {
        let groups = ConfidenceGroups::from([(Medium, vec![4.0]), (Low, vec![7.0, 7.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(7.0));
    }

    #[test]
    fn test_tied_modes_take_smaller() {
        // discrepancy ~0.2, modes 10 and 12 both occur twice
        let groups = ConfidenceGroups::from([(High, vec![12.0, 10.0, 12.0, 10.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(10.0));
    }

    #[test]
    fn test_low_spread_without_repeats_takes_median() {
        let groups = ConfidenceGroups::from([(High, vec![10.0, 12.0, 11.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(11.0));

        let even = ConfidenceGroups::from([(High, vec![10.0, 11.0, 12.0, 13.0])]);
        assert_eq!(reconcile(&even), Estimate::Value(11.5));
    }

    #[test]
    fn test_moderate_spread_without_repeats_takes_minimum() {
        // discrepancy 0.4: between the low and high spread thresholds
        let groups = ConfidenceGroups::from([(High, vec![6.0, 14.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(6.0));
    }

    #[test]
    fn test_raw_units_are_scaled() {
        let groups = ConfidenceGroups::from([(High, vec![5_000_000.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(5.0));

        let mixed = ConfidenceGroups::from([(Medium, vec![5_000_000.0, 5.0])]);
        assert_eq!(reconcile(&mixed), Estimate::Value(5.0));
    }

    #[test]
    fn test_raw_unit_threshold_only_moves_the_cutoff() {
        let config = ReconcileConfig {
            raw_unit_threshold: 500_000.0,
            ..ReconcileConfig::default()
        };

        let groups = ConfidenceGroups::from([(High, vec![2_000_000.0])]);
        assert_eq!(reconcile_with(&groups, &config), Estimate::Value(2.0));

        let below = ConfidenceGroups::from([(High, vec![400_000.0])]);
        assert_eq!(reconcile_with(&below, &config), Estimate::Value(400_000.0));

        assert_eq!(to_millions(750_000.0, 500_000.0), 0.75);
    }

    #[test]
    fn test_discrepancy() {
        assert_eq!(discrepancy(&[]), 0.0);
        assert_eq!(discrepancy(&[4.0]), 0.0);
        assert_eq!(discrepancy(&[-1.0, 1.0]), 0.0);
        assert!((discrepancy(&[6.0, 14.0]) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_custom_spreads() {
        // discrepancy ~0.51: the default policy takes the floor
        let groups = ConfidenceGroups::from([(Low, vec![20.0, 20.0, 4.0])]);
        assert_eq!(reconcile(&groups), Estimate::Value(4.0));

        // A wider high-spread bar lets the repeated value through
        let config = ReconcileConfig::new().with_spreads(0.3, 2.0);
        assert_eq!(reconcile_with(&groups, &config), Estimate::Value(20.0));
    }

    proptest! {
        #[test]
        fn prop_tier_result_ignores_order(
            values in prop::collection::vec(0.0f64..1e7, 0..12),
            seed in any::<u64>(),
        ) {
            let mut shuffled = values.clone();
            // Deterministic Fisher-Yates driven by the seed
            let mut state = seed | 1;
            for i in (1..shuffled.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let j = (state % (i as u64 + 1)) as usize;
                shuffled.swap(i, j);
            }

            let config = ReconcileConfig::default();
            for tier in ConfidenceTier::DESCENDING {
                prop_assert_eq!(
                    reconcile_tier(tier, &values, &config),
                    reconcile_tier(tier, &shuffled, &config)
                );
            }
        }

        #[test]
        fn prop_unit_correction_is_idempotent(value in 0.0f64..1e12) {
            let once = to_millions(value, 1e6);
            let twice = to_millions(once, 1e6);
            prop_assert!(once < 1e6);
            prop_assert_eq!(once, twice);
        }
    }
}

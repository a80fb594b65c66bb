use scoring_core::{Industry, InvestorPreference};

use crate::config::{MetricTable, ScoringConfig};

/// Base weights, times the industry multipliers, then overwritten by the
/// preference overrides.
pub fn effective_weights(
    config: &ScoringConfig,
    industry: Option<Industry>,
    preference: InvestorPreference,
) -> MetricTable<f64> {
    let mut weights = config.base_weights;

    if let Some(multipliers) = industry.and_then(|i| config.industry_multipliers.get(&i)) {
        for (metric, factor) in multipliers {
            weights.set(*metric, weights.get(*metric) * factor);
        }
    }

    if let Some(overrides) = config.preference_overrides.get(&preference) {
        for (metric, weight) in overrides {
            weights.set(*metric, *weight);
        }
    }

    weights
}

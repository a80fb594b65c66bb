use chrono::Utc;
use scoring_core::{
    Metric, MetricEvaluation, Recommendation, ScoreBreakdown, Scorer, ScoringError, ScoringInput,
};
use std::sync::OnceLock;

use crate::config::ScoringConfig;
use crate::weights::effective_weights;

/// Weighted rule-based scorer. Holds no mutable state, so one instance can
/// be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct InvestmentScorer {
    config: ScoringConfig,
}

impl InvestmentScorer {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn evaluate_metric(&self, input: &ScoringInput, metric: Metric, weight: f64) -> MetricEvaluation {
        let supplied = input.value(metric);
        let usable = supplied.filter(|_| !self.config.ignored_inputs.contains(&metric));
        let value = usable.unwrap_or(self.config.defaults[metric]);
        let credit = self.config.thresholds[metric].credit(value);
        let contribution = credit.factor() * weight;

        tracing::trace!(
            metric = metric.as_str(),
            value,
            default = usable.is_none(),
            ?credit,
            weight,
            contribution,
            "Scored metric"
        );

        MetricEvaluation {
            metric,
            supplied,
            value,
            used_default: usable.is_none(),
            credit,
            weight,
            contribution,
        }
    }

    pub fn evaluate(&self, input: &ScoringInput) -> ScoreBreakdown {
        let weights = effective_weights(&self.config, input.industry, input.investor_preference);

        let mut score = 0.0;
        let mut total_weight = 0.0;
        let mut metrics = Vec::with_capacity(Metric::ALL.len());

        for metric in Metric::ALL {
            let eval = self.evaluate_metric(input, metric, weights[metric]);
            score += eval.contribution;
            total_weight += eval.weight;
            metrics.push(eval);
        }

        let (recommendation, normalized_score) = if total_weight > 0.0 {
            let normalized = score / total_weight;
            (self.config.label_cutoffs.classify(normalized), Some(normalized))
        } else {
            (Recommendation::InsufficientData, None)
        };

        tracing::debug!(
            industry = ?input.industry,
            preference = input.investor_preference.as_str(),
            score,
            total_weight,
            normalized = ?normalized_score,
            "Recommendation: {}",
            recommendation
        );

        ScoreBreakdown {
            recommendation,
            score,
            total_weight,
            normalized_score,
            industry: input.industry,
            investor_preference: input.investor_preference,
            metrics,
            evaluated_at: Utc::now(),
        }
    }

    pub fn recommend(&self, input: &ScoringInput) -> Recommendation {
        self.evaluate(input).recommendation
    }
}

impl Scorer for InvestmentScorer {
    fn evaluate(&self, input: &ScoringInput) -> ScoreBreakdown {
        InvestmentScorer::evaluate(self, input)
    }
}

/// Score `input` against the canonical tables.
pub fn should_invest(input: &ScoringInput) -> Recommendation {
    static DEFAULT_SCORER: OnceLock<InvestmentScorer> = OnceLock::new();
    DEFAULT_SCORER
        .get_or_init(InvestmentScorer::default)
        .recommend(input)
}

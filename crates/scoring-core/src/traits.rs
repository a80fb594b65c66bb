use async_trait::async_trait;
use crate::{CompanyFundamentals, Recommendation, ScoreBreakdown, ScoringError, ScoringInput};

/// Trait for recommendation engines over a set of ratios
pub trait Scorer: Send + Sync {
    fn evaluate(&self, input: &ScoringInput) -> ScoreBreakdown;

    fn recommend(&self, input: &ScoringInput) -> Recommendation {
        self.evaluate(input).recommendation
    }
}

/// Trait for market-data providers that deliver per-ticker fundamentals
#[async_trait]
pub trait FundamentalsSource: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<CompanyFundamentals, ScoringError>;
}

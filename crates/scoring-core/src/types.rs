use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ScoringError;

/// The nine ratios the scorer looks at, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CurrentRatio,
    DebtToEquity,
    Roe,
    PeRatio,
    EpsGrowth,
    FreeCashFlow,
    NetProfitMargin,
    DividendYield,
    Beta,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::CurrentRatio,
        Metric::DebtToEquity,
        Metric::Roe,
        Metric::PeRatio,
        Metric::EpsGrowth,
        Metric::FreeCashFlow,
        Metric::NetProfitMargin,
        Metric::DividendYield,
        Metric::Beta,
    ];

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::CurrentRatio => "current_ratio",
            Metric::DebtToEquity => "debt_to_equity",
            Metric::Roe => "roe",
            Metric::PeRatio => "pe_ratio",
            Metric::EpsGrowth => "eps_growth",
            Metric::FreeCashFlow => "free_cash_flow",
            Metric::NetProfitMargin => "net_profit_margin",
            Metric::DividendYield => "dividend_yield",
            Metric::Beta => "beta",
        }
    }

    /// Human-readable name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::CurrentRatio => "Current Ratio",
            Metric::DebtToEquity => "Debt to Equity",
            Metric::Roe => "ROE",
            Metric::PeRatio => "P/E Ratio",
            Metric::EpsGrowth => "EPS Growth",
            Metric::FreeCashFlow => "Free Cash Flow",
            Metric::NetProfitMargin => "Net Profit Margin",
            Metric::DividendYield => "Dividend Yield",
            Metric::Beta => "Beta",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| ScoringError::UnknownTag(format!("metric '{}'", s)))
    }
}

/// Industry tag. Only tech, finance and energy carry weight multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Tech,
    Finance,
    Energy,
    Other,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Tech => "tech",
            Industry::Finance => "finance",
            Industry::Energy => "energy",
            Industry::Other => "other",
        }
    }

    /// Map a provider sector/industry string onto a tag. Never fails:
    /// anything unrecognised lands in `Other`.
    pub fn from_sector(sector: &str) -> Self {
        let s = sector.trim().to_lowercase();
        if s.is_empty() {
            return Industry::Other;
        }
        if s == "tech" || s.contains("technology") || s.contains("software") || s.contains("semiconductor") {
            Industry::Tech
        } else if s == "finance"
            || s.starts_with("financial")
            || s.starts_with("bank")
            || s.contains("insurance")
            || s.contains("capital markets")
        {
            Industry::Finance
        } else if s.starts_with("energy") || s.starts_with("oil") || s.contains("oil & gas") {
            Industry::Energy
        } else {
            Industry::Other
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tech" | "technology" => Ok(Industry::Tech),
            "finance" | "financial" | "financials" => Ok(Industry::Finance),
            "energy" => Ok(Industry::Energy),
            "other" | "" => Ok(Industry::Other),
            _ => Err(ScoringError::UnknownTag(format!("industry '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorPreference {
    #[default]
    Balanced,
    Growth,
    Value,
    Dividend,
}

impl InvestorPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorPreference::Balanced => "balanced",
            InvestorPreference::Growth => "growth",
            InvestorPreference::Value => "value",
            InvestorPreference::Dividend => "dividend",
        }
    }
}

impl fmt::Display for InvestorPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestorPreference {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(InvestorPreference::Balanced),
            "growth" => Ok(InvestorPreference::Growth),
            "value" => Ok(InvestorPreference::Value),
            "dividend" => Ok(InvestorPreference::Dividend),
            _ => Err(ScoringError::UnknownTag(format!("investor preference '{}'", s))),
        }
    }
}

/// Ratios fed to the scorer. `None` means unknown, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringInput {
    pub current_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub roe: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub eps_growth: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub net_profit_margin: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
    pub industry: Option<Industry>,
    pub investor_preference: InvestorPreference,
}

impl ScoringInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::CurrentRatio => self.current_ratio,
            Metric::DebtToEquity => self.debt_to_equity,
            Metric::Roe => self.roe,
            Metric::PeRatio => self.pe_ratio,
            Metric::EpsGrowth => self.eps_growth,
            Metric::FreeCashFlow => self.free_cash_flow,
            Metric::NetProfitMargin => self.net_profit_margin,
            Metric::DividendYield => self.dividend_yield,
            Metric::Beta => self.beta,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::CurrentRatio => &mut self.current_ratio,
            Metric::DebtToEquity => &mut self.debt_to_equity,
            Metric::Roe => &mut self.roe,
            Metric::PeRatio => &mut self.pe_ratio,
            Metric::EpsGrowth => &mut self.eps_growth,
            Metric::FreeCashFlow => &mut self.free_cash_flow,
            Metric::NetProfitMargin => &mut self.net_profit_margin,
            Metric::DividendYield => &mut self.dividend_yield,
            Metric::Beta => &mut self.beta,
        };
        *slot = value;
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    pub fn with_preference(mut self, preference: InvestorPreference) -> Self {
        self.investor_preference = preference;
        self
    }
}

/// Recommendation label. The four real labels are ordered Sell < Hold < Buy < StrongBuy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    InsufficientData,
}

impl Recommendation {
    /// Ordinal rank, `None` for the insufficient-data sentinel.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Recommendation::Sell => Some(0),
            Recommendation::Hold => Some(1),
            Recommendation::Buy => Some(2),
            Recommendation::StrongBuy => Some(3),
            Recommendation::InsufficientData => None,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
            Recommendation::InsufficientData => "Insufficient Data",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

/// Credit tier awarded by a threshold rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credit {
    Full,
    Half,
    None,
}

impl Credit {
    pub fn factor(&self) -> f64 {
        match self {
            Credit::Full => 1.0,
            Credit::Half => 0.5,
            Credit::None => 0.0,
        }
    }
}

/// Per-metric outcome of one scoring pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEvaluation {
    pub metric: Metric,
    pub supplied: Option<f64>,
    pub value: f64,
    pub used_default: bool,
    pub credit: Credit,
    pub weight: f64,
    pub contribution: f64,
}

/// Full result of a scoring pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub recommendation: Recommendation,
    pub score: f64,
    pub total_weight: f64,
    /// `None` when total weight is zero
    pub normalized_score: Option<f64>,
    pub industry: Option<Industry>,
    pub investor_preference: InvestorPreference,
    pub metrics: Vec<MetricEvaluation>,
    pub evaluated_at: DateTime<Utc>,
}

impl ScoreBreakdown {
    pub fn metric(&self, metric: Metric) -> Option<&MetricEvaluation> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

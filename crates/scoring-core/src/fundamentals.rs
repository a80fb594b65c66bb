use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{FundamentalsSource, Industry, InvestorPreference, ScoringError, ScoringInput};

/// Per-ticker snapshot as delivered by a market-data provider.
///
/// Return on equity, profit margin, dividend yield and earnings growth are
/// fractions here (0.18 = 18%); the scorer works in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFundamentals {
    pub symbol: String,
    pub name: Option<String>,
    pub business_summary: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,

    // Balance sheet
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub long_term_debt: Option<f64>,

    // Ratios
    pub eps: Option<f64>,
    pub current_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub profit_margin: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
}

fn to_percent(fraction: Option<f64>) -> Option<f64> {
    fraction.map(|f| f * 100.0)
}

impl CompanyFundamentals {
    /// Sector wins over the finer-grained industry string when it maps to a tag.
    pub fn industry_tag(&self) -> Option<Industry> {
        let from_sector = self.sector.as_deref().map(Industry::from_sector);
        let from_industry = self.industry.as_deref().map(Industry::from_sector);
        match (from_sector, from_industry) {
            (Some(s), _) if s != Industry::Other => Some(s),
            (_, Some(i)) if i != Industry::Other => Some(i),
            (None, None) => None,
            _ => Some(Industry::Other),
        }
    }

    pub fn to_scoring_input(&self, preference: InvestorPreference) -> ScoringInput {
        ScoringInput {
            current_ratio: self.current_ratio,
            debt_to_equity: self.debt_to_equity,
            roe: to_percent(self.return_on_equity),
            pe_ratio: self.pe_ratio,
            eps_growth: to_percent(self.earnings_growth),
            free_cash_flow: self.free_cash_flow,
            net_profit_margin: to_percent(self.profit_margin),
            dividend_yield: to_percent(self.dividend_yield),
            beta: self.beta,
            industry: self.industry_tag(),
            investor_preference: preference,
        }
    }
}

/// In-memory fundamentals keyed by upper-cased symbol
#[derive(Debug, Clone, Default)]
pub struct StaticFundamentals {
    entries: HashMap<String, CompanyFundamentals>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FundamentalsFile {
    Keyed(HashMap<String, CompanyFundamentals>),
    List(Vec<CompanyFundamentals>),
}

impl StaticFundamentals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut fundamentals: CompanyFundamentals) {
        fundamentals.symbol = fundamentals.symbol.trim().to_uppercase();
        self.entries.insert(fundamentals.symbol.clone(), fundamentals);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accepts either an object keyed by symbol or an array of snapshots.
    pub fn from_json_str(json: &str) -> Result<Self, ScoringError> {
        let mut source = Self::new();
        match serde_json::from_str::<FundamentalsFile>(json)? {
            // The map key is the lookup symbol; an inner `symbol` is overwritten
            FundamentalsFile::Keyed(map) => {
                for (symbol, mut f) in map {
                    if symbol.trim().is_empty() {
                        return Err(ScoringError::InvalidConfig(
                            "fundamentals keyed by an empty symbol".to_string(),
                        ));
                    }
                    f.symbol = symbol;
                    source.insert(f);
                }
            }
            FundamentalsFile::List(list) => {
                for f in list {
                    if f.symbol.trim().is_empty() {
                        return Err(ScoringError::InvalidConfig(
                            "fundamentals entry without a symbol".to_string(),
                        ));
                    }
                    source.insert(f);
                }
            }
        }
        tracing::debug!("Loaded fundamentals for {} symbols", source.len());
        Ok(source)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScoringError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[async_trait]
impl FundamentalsSource for StaticFundamentals {
    async fn fundamentals(&self, symbol: &str) -> Result<CompanyFundamentals, ScoringError> {
        let key = symbol.trim().to_uppercase();
        self.entries
            .get(&key)
            .cloned()
            .ok_or(ScoringError::SymbolNotFound(key))
    }
}

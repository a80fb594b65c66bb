use scoring_core::{Industry, InvestorPreference, Metric, Recommendation, ScoringError};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::ops::Index;
use std::path::Path;

use crate::rules::{default_rule, ThresholdRule};

const CONFIG_PATH_VAR: &str = "SCORER_CONFIG";
const IGNORED_INPUTS_VAR: &str = "SCORER_IGNORED_INPUTS";

/// One value per metric, indexed by `Metric`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricTable<T>([T; 9]);

impl<T: Copy> MetricTable<T> {
    pub fn from_fn(f: impl Fn(Metric) -> T) -> Self {
        Self(Metric::ALL.map(f))
    }

    pub fn get(&self, metric: Metric) -> T {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: T) {
        self.0[metric.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, T)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    fn overlay(&mut self, overrides: &BTreeMap<Metric, T>) {
        for (metric, value) in overrides {
            self.set(*metric, *value);
        }
    }
}

impl<T> Index<Metric> for MetricTable<T> {
    type Output = T;

    fn index(&self, metric: Metric) -> &T {
        &self.0[metric.index()]
    }
}

impl<T: Serialize> Serialize for MetricTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Metric::ALL.len()))?;
        for (metric, value) in Metric::ALL.into_iter().zip(self.0.iter()) {
            map.serialize_entry(&metric, value)?;
        }
        map.end()
    }
}

/// Lower bounds on the normalized score for each label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelCutoffs {
    pub strong_buy: f64,
    pub buy: f64,
    pub hold: f64,
}

impl Default for LabelCutoffs {
    fn default() -> Self {
        Self {
            strong_buy: 0.75,
            buy: 0.55,
            hold: 0.35,
        }
    }
}

impl LabelCutoffs {
    pub fn classify(&self, normalized_score: f64) -> Recommendation {
        match normalized_score {
            s if s >= self.strong_buy => Recommendation::StrongBuy,
            s if s >= self.buy => Recommendation::Buy,
            s if s >= self.hold => Recommendation::Hold,
            _ => Recommendation::Sell,
        }
    }
}

/// Weight, default and threshold tables driving the scorer.
///
/// `Default` carries the canonical tables. JSON documents only need to name
/// what they change; everything left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile")]
pub struct ScoringConfig {
    /// Substituted when a metric is absent
    pub defaults: MetricTable<f64>,
    pub base_weights: MetricTable<f64>,
    /// Multiplied into the base weights
    pub industry_multipliers: BTreeMap<Industry, BTreeMap<Metric, f64>>,
    /// Replace the industry-adjusted weights outright
    pub preference_overrides: BTreeMap<InvestorPreference, BTreeMap<Metric, f64>>,
    pub thresholds: MetricTable<ThresholdRule>,
    pub label_cutoffs: LabelCutoffs,
    /// Supplied values for these metrics are discarded in favour of the default
    pub ignored_inputs: BTreeSet<Metric>,
}

fn default_value(metric: Metric) -> f64 {
    match metric {
        Metric::CurrentRatio => 1.5,
        Metric::DebtToEquity => 1.0,
        Metric::Roe => 12.0,
        Metric::PeRatio => 20.0,
        Metric::EpsGrowth => 5.0,
        Metric::FreeCashFlow => 0.0,
        Metric::NetProfitMargin => 8.0,
        Metric::DividendYield => 2.0,
        Metric::Beta => 1.0,
    }
}

fn base_weight(metric: Metric) -> f64 {
    match metric {
        Metric::CurrentRatio => 1.0,
        Metric::DebtToEquity => 1.5,
        Metric::Roe => 1.5,
        Metric::PeRatio => 1.2,
        Metric::EpsGrowth => 1.5,
        Metric::FreeCashFlow => 1.3,
        Metric::NetProfitMargin => 1.2,
        Metric::DividendYield => 1.2,
        Metric::Beta => 1.0,
    }
}

fn default_industry_multipliers() -> BTreeMap<Industry, BTreeMap<Metric, f64>> {
    BTreeMap::from([
        (
            Industry::Tech,
            BTreeMap::from([(Metric::PeRatio, 1.5), (Metric::EpsGrowth, 2.0), (Metric::Roe, 1.2)]),
        ),
        (
            Industry::Finance,
            BTreeMap::from([
                (Metric::DebtToEquity, 1.8),
                (Metric::Roe, 1.5),
                (Metric::DividendYield, 1.5),
            ]),
        ),
        (
            Industry::Energy,
            BTreeMap::from([
                (Metric::FreeCashFlow, 1.5),
                (Metric::DebtToEquity, 1.5),
                (Metric::DividendYield, 1.5),
            ]),
        ),
    ])
}

fn default_preference_overrides() -> BTreeMap<InvestorPreference, BTreeMap<Metric, f64>> {
    BTreeMap::from([
        (
            InvestorPreference::Growth,
            BTreeMap::from([(Metric::EpsGrowth, 2.0), (Metric::PeRatio, 1.7)]),
        ),
        (
            InvestorPreference::Value,
            BTreeMap::from([(Metric::DividendYield, 2.0), (Metric::PeRatio, 0.8)]),
        ),
        (
            InvestorPreference::Dividend,
            BTreeMap::from([(Metric::DividendYield, 2.5), (Metric::FreeCashFlow, 1.7)]),
        ),
    ])
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            defaults: MetricTable::from_fn(default_value),
            base_weights: MetricTable::from_fn(base_weight),
            industry_multipliers: default_industry_multipliers(),
            preference_overrides: default_preference_overrides(),
            thresholds: MetricTable::from_fn(default_rule),
            label_cutoffs: LabelCutoffs::default(),
            ignored_inputs: BTreeSet::new(),
        }
    }
}

/// Sparse on-disk form of `ScoringConfig`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    defaults: BTreeMap<Metric, f64>,
    base_weights: BTreeMap<Metric, f64>,
    industry_multipliers: BTreeMap<Industry, BTreeMap<Metric, f64>>,
    preference_overrides: BTreeMap<InvestorPreference, BTreeMap<Metric, f64>>,
    thresholds: BTreeMap<Metric, ThresholdRule>,
    label_cutoffs: Option<LabelCutoffs>,
    ignored_inputs: Option<BTreeSet<Metric>>,
}

impl TryFrom<ConfigFile> for ScoringConfig {
    type Error = ScoringError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let mut config = ScoringConfig::default();
        config.defaults.overlay(&file.defaults);
        config.base_weights.overlay(&file.base_weights);
        config.thresholds.overlay(&file.thresholds);
        // A named industry or preference replaces that entry wholesale
        config.industry_multipliers.extend(file.industry_multipliers);
        config.preference_overrides.extend(file.preference_overrides);
        if let Some(cutoffs) = file.label_cutoffs {
            config.label_cutoffs = cutoffs;
        }
        if let Some(ignored) = file.ignored_inputs {
            config.ignored_inputs = ignored;
        }
        config.validate()?;
        Ok(config)
    }
}

fn check_weight(what: &str, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScoringError::InvalidConfig(format!(
            "{} must be a finite, non-negative number (got {})",
            what, value
        )));
    }
    Ok(())
}

impl ScoringConfig {
    /// Matches the dashboards, whose call sites never pass EPS growth or
    /// free cash flow.
    pub fn dashboard_compat() -> Self {
        Self {
            ignored_inputs: BTreeSet::from([Metric::EpsGrowth, Metric::FreeCashFlow]),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        for (metric, default) in self.defaults.iter() {
            if !default.is_finite() {
                return Err(ScoringError::InvalidConfig(format!(
                    "default for {} must be finite",
                    metric
                )));
            }
        }
        for (metric, weight) in self.base_weights.iter() {
            check_weight(&format!("base weight for {}", metric), weight)?;
        }
        for (industry, multipliers) in &self.industry_multipliers {
            for (metric, m) in multipliers {
                check_weight(&format!("{} multiplier for {}", industry, metric), *m)?;
            }
        }
        for (preference, overrides) in &self.preference_overrides {
            for (metric, w) in overrides {
                check_weight(&format!("{} override for {}", preference, metric), *w)?;
            }
        }
        for (metric, rule) in self.thresholds.iter() {
            let half_ok = rule.half.map_or(true, |h| h.threshold().is_finite());
            if !rule.full.threshold().is_finite() || !half_ok {
                return Err(ScoringError::InvalidConfig(format!(
                    "threshold for {} must be finite",
                    metric
                )));
            }
        }

        let c = &self.label_cutoffs;
        let in_range = [c.strong_buy, c.buy, c.hold]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v));
        if !in_range || !(c.strong_buy > c.buy && c.buy > c.hold) {
            return Err(ScoringError::InvalidConfig(format!(
                "label cutoffs must be strictly descending within [0, 1] (got {} / {} / {})",
                c.strong_buy, c.buy, c.hold
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScoringError> {
        // Deserialize the sparse form first so validation errors keep their variant
        let file: ConfigFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScoringError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!("Loaded scoring config from {}", path.display());
        Ok(config)
    }

    /// Reads `SCORER_CONFIG` (JSON file path) and `SCORER_IGNORED_INPUTS`
    /// (comma-separated metric names). The latter wins over the file.
    pub fn from_env() -> Result<Self, ScoringError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Applies `SCORER_IGNORED_INPUTS` to a config loaded some other way.
    pub fn with_env_overrides(self) -> Result<Self, ScoringError> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ScoringError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match lookup(CONFIG_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.with_overrides_from(&lookup)
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ScoringError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(IGNORED_INPUTS_VAR) {
            self.ignored_inputs = parse_metric_list(&raw)?;
            tracing::debug!("Ignored inputs from environment: {:?}", self.ignored_inputs);
        }
        self.validate()?;
        Ok(self)
    }
}

pub fn parse_metric_list(raw: &str) -> Result<BTreeSet<Metric>, ScoringError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Bound;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_tables() {
        let config = ScoringConfig::default();
        assert_eq!(config.defaults[Metric::Roe], 12.0);
        assert_eq!(config.defaults[Metric::FreeCashFlow], 0.0);
        assert_eq!(config.base_weights[Metric::DebtToEquity], 1.5);
        assert_eq!(config.base_weights[Metric::Beta], 1.0);
        assert_eq!(config.industry_multipliers[&Industry::Finance][&Metric::DebtToEquity], 1.8);
        assert!(!config.industry_multipliers.contains_key(&Industry::Other));
        assert!(!config.preference_overrides.contains_key(&InvestorPreference::Balanced));
        assert!(config.ignored_inputs.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ScoringConfig::from_json_str(
            r#"{
                "base_weights": {"roe": 2.5},
                "thresholds": {"beta": {"full": {"below": 0.8}, "half": {"below": 1.2}}},
                "ignored_inputs": ["eps_growth"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.base_weights[Metric::Roe], 2.5);
        assert_eq!(config.base_weights[Metric::PeRatio], 1.2);
        assert_eq!(config.thresholds[Metric::Beta].full, Bound::Below(0.8));
        assert_eq!(config.thresholds[Metric::Roe], default_rule(Metric::Roe));
        assert_eq!(config.label_cutoffs, LabelCutoffs::default());
        assert!(config.ignored_inputs.contains(&Metric::EpsGrowth));
    }

    #[test]
    fn test_industry_entry_is_replaced_not_merged() {
        let config =
            ScoringConfig::from_json_str(r#"{"industry_multipliers": {"tech": {"beta": 0.5}}}"#).unwrap();
        let tech = &config.industry_multipliers[&Industry::Tech];
        assert_eq!(tech.len(), 1);
        assert_eq!(tech[&Metric::Beta], 0.5);
        assert_eq!(config.industry_multipliers[&Industry::Energy].len(), 3);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = ScoringConfig::from_json_str(r#"{"base_weights": {"beta": -1.0}}"#).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidConfig(_)), "got {:?}", err);
        assert!(err.to_string().contains("base weight for beta"));
    }

    #[test]
    fn test_rejects_unordered_cutoffs() {
        let mut config = ScoringConfig::default();
        config.label_cutoffs = LabelCutoffs { strong_buy: 0.5, buy: 0.6, hold: 0.35 };
        assert!(matches!(config.validate(), Err(ScoringError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(ScoringConfig::from_json_str(r#"{"weights": {}}"#).is_err());
    }

    #[test]
    fn test_all_zero_weights_are_valid() {
        let mut config = ScoringConfig::default();
        for metric in Metric::ALL {
            config.base_weights.set(metric, 0.0);
        }
        config.validate().unwrap();
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"label_cutoffs": {{"strong_buy": 0.8, "buy": 0.6, "hold": 0.4}}}}"#).unwrap();
        let config = ScoringConfig::from_file(file.path()).unwrap();
        assert_eq!(config.label_cutoffs.strong_buy, 0.8);
    }

    #[test]
    fn test_serialized_config_reloads() {
        let config = ScoringConfig::dashboard_compat();
        let json = serde_json::to_string(&config).unwrap();
        let reloaded = ScoringConfig::from_json_str(&json).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_parse_metric_list() {
        let set = parse_metric_list(" eps_growth, free-cash-flow ,").unwrap();
        assert_eq!(set, BTreeSet::from([Metric::EpsGrowth, Metric::FreeCashFlow]));
        assert!(parse_metric_list("eps_growth,ebitda").is_err());
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_lookup_defaults_when_unset() {
        let config = ScoringConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ScoringConfig::default());

        let blank = ScoringConfig::from_lookup(lookup_from(&[("SCORER_CONFIG", "  ")])).unwrap();
        assert_eq!(blank, ScoringConfig::default());
    }

    #[test]
    fn test_env_lookup_reads_config_and_ignored_inputs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ignored_inputs": ["beta"], "base_weights": {{"roe": 3.0}}}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let from_file = ScoringConfig::from_lookup(lookup_from(&[("SCORER_CONFIG", &path)])).unwrap();
        assert_eq!(from_file.base_weights[Metric::Roe], 3.0);
        assert_eq!(from_file.ignored_inputs, BTreeSet::from([Metric::Beta]));

        let overridden = ScoringConfig::from_lookup(lookup_from(&[
            ("SCORER_CONFIG", &path),
            ("SCORER_IGNORED_INPUTS", "eps_growth,free_cash_flow"),
        ]))
        .unwrap();
        assert_eq!(overridden.base_weights[Metric::Roe], 3.0);
        assert_eq!(
            overridden.ignored_inputs,
            BTreeSet::from([Metric::EpsGrowth, Metric::FreeCashFlow])
        );
    }

    #[test]
    fn test_env_lookup_errors() {
        let err = ScoringConfig::from_lookup(lookup_from(&[("SCORER_IGNORED_INPUTS", "ebitda")]))
            .unwrap_err();
        assert!(matches!(err, ScoringError::UnknownTag(_)), "got {:?}", err);

        let err = ScoringConfig::from_lookup(lookup_from(&[(
            "SCORER_CONFIG",
            "/nonexistent/scorer-config.json",
        )]))
        .unwrap_err();
        assert!(matches!(err, ScoringError::Io(_)), "got {:?}", err);
    }

    #[test]
    fn test_overrides_apply_to_loaded_config() {
        let config = ScoringConfig::from_json_str(r#"{"ignored_inputs": ["beta"]}"#).unwrap();
        let config = config
            .with_overrides_from(lookup_from(&[("SCORER_IGNORED_INPUTS", "eps_growth")]))
            .unwrap();
        assert_eq!(config.ignored_inputs, BTreeSet::from([Metric::EpsGrowth]));

        let untouched = ScoringConfig::dashboard_compat()
            .with_overrides_from(lookup_from(&[]))
            .unwrap();
        assert_eq!(untouched, ScoringConfig::dashboard_compat());
    }

    #[test]
    fn test_classify() {
        let cutoffs = LabelCutoffs::default();
        assert_eq!(cutoffs.classify(0.75), Recommendation::StrongBuy);
        assert_eq!(cutoffs.classify(0.7499), Recommendation::Buy);
        assert_eq!(cutoffs.classify(0.55), Recommendation::Buy);
        assert_eq!(cutoffs.classify(0.35), Recommendation::Hold);
        assert_eq!(cutoffs.classify(0.3499), Recommendation::Sell);
        assert_eq!(cutoffs.classify(0.0), Recommendation::Sell);
    }
}

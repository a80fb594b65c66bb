use scoring_core::{Credit, Metric};
use serde::{Deserialize, Serialize};

/// One side of a threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    AtLeast(f64),
    Above(f64),
    Below(f64),
    AtMost(f64),
}

impl Bound {
    /// NaN never passes.
    pub fn passes(&self, value: f64) -> bool {
        match *self {
            Bound::AtLeast(t) => value >= t,
            Bound::Above(t) => value > t,
            Bound::Below(t) => value < t,
            Bound::AtMost(t) => value <= t,
        }
    }

    pub fn threshold(&self) -> f64 {
        match *self {
            Bound::AtLeast(t) | Bound::Above(t) | Bound::Below(t) | Bound::AtMost(t) => t,
        }
    }
}

/// Full credit when `full` passes, else half credit when `half` passes.
/// Binary metrics leave `half` empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub full: Bound,
    #[serde(default)]
    pub half: Option<Bound>,
}

impl ThresholdRule {
    pub const fn tiered(full: Bound, half: Bound) -> Self {
        Self { full, half: Some(half) }
    }

    pub const fn binary(full: Bound) -> Self {
        Self { full, half: None }
    }

    pub fn credit(&self, value: f64) -> Credit {
        if self.full.passes(value) {
            Credit::Full
        } else if self.half.map_or(false, |h| h.passes(value)) {
            Credit::Half
        } else {
            Credit::None
        }
    }
}

pub fn default_rule(metric: Metric) -> ThresholdRule {
    use Bound::*;
    match metric {
        Metric::CurrentRatio => ThresholdRule::tiered(AtLeast(1.5), AtLeast(1.0)),
        Metric::DebtToEquity => ThresholdRule::tiered(Below(1.0), Below(2.0)),
        Metric::Roe => ThresholdRule::tiered(Above(15.0), Above(10.0)),
        Metric::PeRatio => ThresholdRule::tiered(Below(15.0), Below(25.0)),
        Metric::EpsGrowth => ThresholdRule::tiered(Above(0.0), Above(-10.0)),
        Metric::FreeCashFlow => ThresholdRule::binary(Above(0.0)),
        Metric::NetProfitMargin => ThresholdRule::tiered(Above(10.0), Above(5.0)),
        Metric::DividendYield => ThresholdRule::binary(Above(2.0)),
        Metric::Beta => ThresholdRule::tiered(Below(1.0), Below(1.5)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(metric: Metric, value: f64) -> Credit {
        default_rule(metric).credit(value)
    }

    #[test]
    fn test_current_ratio_boundary_is_inclusive() {
        assert_eq!(credit(Metric::CurrentRatio, 1.5), Credit::Full);
        assert_eq!(credit(Metric::CurrentRatio, 1.4999), Credit::Half);
        assert_eq!(credit(Metric::CurrentRatio, 1.0), Credit::Half);
        assert_eq!(credit(Metric::CurrentRatio, 0.99), Credit::None);
    }

    #[test]
    fn test_strict_bounds() {
        // debt_to_equity: <1.0 full, <2.0 half
        assert_eq!(credit(Metric::DebtToEquity, 0.99), Credit::Full);
        assert_eq!(credit(Metric::DebtToEquity, 1.0), Credit::Half);
        assert_eq!(credit(Metric::DebtToEquity, 2.0), Credit::None);

        // roe: >15 full, >10 half
        assert_eq!(credit(Metric::Roe, 15.0), Credit::Half);
        assert_eq!(credit(Metric::Roe, 10.0), Credit::None);

        // pe: <15 full, <25 half
        assert_eq!(credit(Metric::PeRatio, 15.0), Credit::Half);
        assert_eq!(credit(Metric::PeRatio, 25.0), Credit::None);

        // eps growth: >0 full, >-10 half
        assert_eq!(credit(Metric::EpsGrowth, 0.0), Credit::Half);
        assert_eq!(credit(Metric::EpsGrowth, -10.0), Credit::None);

        // margin: >10 full, >5 half
        assert_eq!(credit(Metric::NetProfitMargin, 10.0), Credit::Half);
        assert_eq!(credit(Metric::NetProfitMargin, 5.0), Credit::None);

        // beta: <1.0 full, <1.5 half
        assert_eq!(credit(Metric::Beta, 1.0), Credit::Half);
        assert_eq!(credit(Metric::Beta, 1.5), Credit::None);
    }

    #[test]
    fn test_binary_metrics_have_no_half_tier() {
        assert_eq!(credit(Metric::FreeCashFlow, 0.0), Credit::None);
        assert_eq!(credit(Metric::FreeCashFlow, -5e6), Credit::None);
        assert_eq!(credit(Metric::FreeCashFlow, 1.0), Credit::Full);
        assert_eq!(credit(Metric::DividendYield, 2.0), Credit::None);
        assert_eq!(credit(Metric::DividendYield, 2.01), Credit::Full);
    }

    #[test]
    fn test_nan_earns_nothing() {
        for metric in Metric::ALL {
            assert_eq!(credit(metric, f64::NAN), Credit::None);
        }
    }

    #[test]
    fn test_bound_json_shape() {
        let rule: ThresholdRule =
            serde_json::from_str(r#"{"full": {"at_least": 2.0}, "half": {"above": 1.2}}"#).unwrap();
        assert_eq!(rule.full, Bound::AtLeast(2.0));
        assert_eq!(rule.half, Some(Bound::Above(1.2)));

        let binary: ThresholdRule = serde_json::from_str(r#"{"full": {"below": 0.5}}"#).unwrap();
        assert_eq!(binary.half, None);
    }
}

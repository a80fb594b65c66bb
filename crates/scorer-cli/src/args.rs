use anyhow::{anyhow, bail, Context, Result};
use scoring_core::{Industry, InvestorPreference, Metric};
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub input: Option<PathBuf>,
    pub fundamentals: Option<PathBuf>,
    pub symbol: Option<String>,
    pub config: Option<PathBuf>,
    pub industry: Option<Industry>,
    pub preference: Option<InvestorPreference>,
    pub metrics: Vec<(Metric, f64)>,
    pub json: bool,
    pub rationale: bool,
    pub explain: bool,
    pub help: bool,
}

pub const USAGE: &str = "\
Usage:
  should-invest [--input FILE | --fundamentals FILE --symbol SYM] [OPTIONS]

Input:
  --input FILE            ScoringInput JSON
  --fundamentals FILE     Provider snapshots (object keyed by symbol, or array)
  --symbol SYM            Symbol to look up in --fundamentals
  --current-ratio N       Override a single ratio (likewise --debt-to-equity,
                          --roe, --pe-ratio, --eps-growth, --free-cash-flow,
                          --net-profit-margin, --dividend-yield, --beta)
  --industry TAG          tech | finance | energy | other
  --preference TAG        balanced | growth | value | dividend

Options:
  --config FILE           Scoring config JSON (default: $SCORER_CONFIG);
                          $SCORER_IGNORED_INPUTS applies on top of either
  --json                  Print the full breakdown as JSON
  --rationale             Append rationale text to the label
  --explain               Describe each ratio and balance-sheet item
  -h, --help              Show this message";

fn value_for<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} expects a value", flag))
}

/// `args` excludes the program name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => {
                parsed.help = true;
                i += 1;
                continue;
            }
            "--json" => {
                parsed.json = true;
                i += 1;
                continue;
            }
            "--rationale" => {
                parsed.rationale = true;
                i += 1;
                continue;
            }
            "--explain" => {
                parsed.explain = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let value = value_for(args, i, flag)?;
        match flag {
            "--input" => parsed.input = Some(PathBuf::from(value)),
            "--fundamentals" => parsed.fundamentals = Some(PathBuf::from(value)),
            "--symbol" => parsed.symbol = Some(value.to_uppercase()),
            "--config" => parsed.config = Some(PathBuf::from(value)),
            "--industry" => parsed.industry = Some(value.parse()?),
            "--preference" => parsed.preference = Some(value.parse()?),
            other => {
                let name = other
                    .strip_prefix("--")
                    .ok_or_else(|| anyhow!("unexpected argument '{}'", other))?;
                let metric: Metric = name
                    .parse()
                    .map_err(|_| anyhow!("unknown option '{}'", other))?;
                let n: f64 = value
                    .parse()
                    .with_context(|| format!("{} expects a number, got '{}'", other, value))?;
                parsed.metrics.push((metric, n));
            }
        }
        i += 2;
    }

    if parsed.input.is_some() && parsed.fundamentals.is_some() {
        bail!("--input and --fundamentals are mutually exclusive");
    }
    if parsed.fundamentals.is_some() != parsed.symbol.is_some() {
        bail!("--fundamentals and --symbol must be given together");
    }
    Ok(parsed)
}

//! should-invest: score a company's fundamentals into Buy/Hold/Sell.
//!
//! Usage:
//!   cargo run -p scorer-cli -- --roe 18 --pe-ratio 14 --industry tech
//!   cargo run -p scorer-cli -- --input ratios.json --json
//!   cargo run -p scorer-cli -- --fundamentals snapshots.json --symbol RELIANCE.NS --rationale

mod args;

use anyhow::{Context, Result};
use investment_scorer::{
    metric_explanation, render_company, render_text, InvestmentScorer, LabelStyle, ScoringConfig,
};
use scoring_core::{CompanyFundamentals, FundamentalsSource, Metric, ScoringInput, StaticFundamentals};

use crate::args::{parse_args, CliArgs, USAGE};

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "should_invest=info,investment_scorer=warn".into());
    // Logs go to stderr so stdout stays clean for --json
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Assemble the scoring input from (in order) the fundamentals snapshot or
/// input file, then the per-metric and tag flags.
async fn build_input(args: &CliArgs) -> Result<(ScoringInput, Option<CompanyFundamentals>)> {
    let preference = args.preference.unwrap_or_default();

    let (mut input, company) = match (&args.fundamentals, &args.symbol) {
        (Some(path), Some(symbol)) => {
            let source = StaticFundamentals::from_file(path)
                .with_context(|| format!("loading fundamentals from {}", path.display()))?;
            let company = source.fundamentals(symbol).await?;
            tracing::info!("Loaded fundamentals for {}", company.symbol);
            (company.to_scoring_input(preference), Some(company))
        }
        _ => {
            let input = match &args.input {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str(&raw)
                        .with_context(|| format!("parsing scoring input {}", path.display()))?
                }
                None => ScoringInput::new(),
            };
            (input, None)
        }
    };

    for (metric, value) in &args.metrics {
        input.set(*metric, Some(*value));
    }
    if let Some(industry) = args.industry {
        input.industry = Some(industry);
    }
    if let Some(preference) = args.preference {
        input.investor_preference = preference;
    }
    Ok((input, company))
}

/// `--config` replaces `$SCORER_CONFIG`; `$SCORER_IGNORED_INPUTS` applies either way.
fn load_config(args: &CliArgs) -> Result<ScoringConfig> {
    match &args.config {
        Some(path) => ScoringConfig::from_file(path)
            .with_context(|| format!("loading scoring config from {}", path.display()))?
            .with_env_overrides()
            .context("applying SCORER_IGNORED_INPUTS"),
        None => ScoringConfig::from_env().context("loading scoring config from environment"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {:#}", e);
            eprintln!();
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let scorer = InvestmentScorer::new(load_config(&args)?)?;

    let (input, company) = build_input(&args).await?;
    let breakdown = scorer.evaluate(&input);
    tracing::info!(
        symbol = args.symbol.as_deref().unwrap_or("-"),
        normalized = ?breakdown.normalized_score,
        "Recommendation: {}",
        breakdown.recommendation
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    if let Some(company) = &company {
        println!("{}", render_company(company, args.explain));
    }
    let style = if args.rationale { LabelStyle::WithRationale } else { LabelStyle::Plain };
    print!("{}", render_text(&breakdown, style));

    if args.explain {
        println!();
        for metric in Metric::ALL {
            println!("  {}: {}", metric.display_name(), metric_explanation(metric));
        }
    }
    Ok(())
}

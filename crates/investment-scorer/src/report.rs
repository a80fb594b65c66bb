//! Text rendering for recommendations and the ratios behind them.

use scoring_core::{CompanyFundamentals, Credit, Metric, Recommendation, ScoreBreakdown};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    #[default]
    Plain,
    WithRationale,
}

pub trait LabelText {
    fn rationale(&self) -> Option<&'static str>;
    fn display_with(&self, style: LabelStyle) -> String;
}

impl LabelText for Recommendation {
    fn rationale(&self) -> Option<&'static str> {
        match self {
            Recommendation::StrongBuy => Some("Strong fundamentals across the board"),
            Recommendation::Buy => Some("Solid fundamentals with minor weaknesses"),
            Recommendation::Hold => Some("Mixed signals, monitor closely"),
            Recommendation::Sell => Some("Weak fundamentals, consider avoiding"),
            Recommendation::InsufficientData => None,
        }
    }

    fn display_with(&self, style: LabelStyle) -> String {
        match (style, self.rationale()) {
            (LabelStyle::WithRationale, Some(why)) => format!("{} - {}", self.to_label(), why),
            _ => self.to_label().to_string(),
        }
    }
}

pub fn metric_explanation(metric: Metric) -> &'static str {
    match metric {
        Metric::CurrentRatio => "Current assets divided by current liabilities – short-term liquidity.",
        Metric::DebtToEquity => "Total debt relative to shareholder equity – how leveraged the company is.",
        Metric::Roe => "Return on Equity – profitability based on shareholder equity.",
        Metric::PeRatio => "Price-to-Earnings ratio – compares stock price to earnings.",
        Metric::EpsGrowth => "Growth in earnings per share over the prior period.",
        Metric::FreeCashFlow => "Cash left after operating expenses and capital expenditure.",
        Metric::NetProfitMargin => "Percentage of revenue that becomes profit.",
        Metric::DividendYield => "Annual dividend payment divided by stock price.",
        Metric::Beta => "Volatility of the stock relative to the overall market.",
    }
}

/// Explanation for a company overview line, keyed by its label.
pub fn financial_explanation(label: &str) -> &'static str {
    match label {
        "Total Assets" => "The total value of everything the company owns.",
        "Total Liabilities" => "The total debt the company owes.",
        "Long Term Debt" => "Debt that is due in more than one year.",
        "EPS" => "Earnings Per Share – profit generated per share.",
        "P/E Ratio" => metric_explanation(Metric::PeRatio),
        "ROE" => metric_explanation(Metric::Roe),
        "Net Profit Margin" => metric_explanation(Metric::NetProfitMargin),
        "Dividend Yield" => metric_explanation(Metric::DividendYield),
        _ => "No explanation available.",
    }
}

/// Formats an amount in Indian numbering (Lakhs, Crores).
pub fn format_indian_currency(amount: Option<f64>) -> String {
    match amount {
        None => "Data not available".to_string(),
        Some(n) if n >= 1e12 => format!("₹{:.2} Thousand Crores", n / 1e12),
        Some(n) if n >= 1e7 => format!("₹{:.2} Crores", n / 1e7),
        Some(n) if n >= 1e5 => format!("₹{:.2} Lakhs", n / 1e5),
        Some(n) => format!("₹{:.2}", n),
    }
}

fn credit_label(credit: Credit) -> &'static str {
    match credit {
        Credit::Full => "full",
        Credit::Half => "half",
        Credit::None => "none",
    }
}

pub fn render_text(breakdown: &ScoreBreakdown, style: LabelStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recommendation: {}", breakdown.recommendation.display_with(style));
    match breakdown.normalized_score {
        Some(n) => {
            let _ = writeln!(
                out,
                "Score: {:.3} ({:.2} / {:.2})",
                n, breakdown.score, breakdown.total_weight
            );
        }
        None => {
            let _ = writeln!(out, "Score: n/a (total weight is zero)");
        }
    }
    let _ = writeln!(
        out,
        "Industry: {} | Preference: {}",
        breakdown.industry.map_or("unspecified", |i| i.as_str()),
        breakdown.investor_preference
    );
    let _ = writeln!(out);

    for eval in &breakdown.metrics {
        let _ = writeln!(
            out,
            "  {:<18} {:>12.2}{:<10} {:<5} w={:.2} +{:.2}",
            eval.metric.display_name(),
            eval.value,
            if eval.used_default { " (default)" } else { "" },
            credit_label(eval.credit),
            eval.weight,
            eval.contribution
        );
    }
    out
}

fn ratio_text(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "Data not available".to_string(),
    }
}

/// Company overview, fundamentals and balance-sheet lines for a provider
/// snapshot. Fractional ratios are shown as percentages.
pub fn render_company(company: &CompanyFundamentals, explain: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Company Overview: {}",
        company.name.as_deref().unwrap_or(&company.symbol)
    );
    if let Some(summary) = &company.business_summary {
        let _ = writeln!(out, "Business Summary: {}", summary);
    }
    let _ = writeln!(out, "Sector: {}", company.sector.as_deref().unwrap_or("Data not available"));
    let _ = writeln!(out, "Industry: {}", company.industry.as_deref().unwrap_or("Data not available"));
    let _ = writeln!(out, "Market Cap: {}", format_indian_currency(company.market_cap));

    let percent = |v: Option<f64>| v.map(|v| v * 100.0);
    let fundamentals = [
        ("EPS", company.eps),
        ("P/E Ratio", company.pe_ratio),
        ("ROE", percent(company.return_on_equity)),
        ("Net Profit Margin", percent(company.profit_margin)),
        ("Dividend Yield", percent(company.dividend_yield)),
    ];
    let _ = writeln!(out);
    let _ = writeln!(out, "Fundamentals:");
    for (label, value) in fundamentals {
        let _ = writeln!(out, "  {}: {}", label, ratio_text(value));
        if explain {
            let _ = writeln!(out, "    {}", financial_explanation(label));
        }
    }

    let financials = [
        ("Total Assets", company.total_assets),
        ("Total Liabilities", company.total_liabilities),
        ("Long Term Debt", company.long_term_debt),
    ];
    let _ = writeln!(out);
    let _ = writeln!(out, "Financials:");
    for (label, value) in financials {
        let _ = writeln!(out, "  {}: {}", label, format_indian_currency(value));
        if explain {
            let _ = writeln!(out, "    {}", financial_explanation(label));
        }
    }
    out
}

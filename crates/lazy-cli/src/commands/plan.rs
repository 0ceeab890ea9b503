//! `lazy plan`: layered portfolio files → allocation report.

use anyhow::{Context, Result};
use lazy_config::{cleanse_rows, load_layered_yaml, report_unused_keys, UnusedKeyPolicy};

use super::{allocate_report, print_report};

pub struct PlanArgs {
    pub portfolio_paths: Vec<String>,
    pub contribution: Option<f64>,
    pub decimals: Option<u32>,
    pub json: bool,
    pub strict_keys: bool,
}

pub fn run_plan(args: PlanArgs) -> Result<()> {
    let path_refs: Vec<&str> = args.portfolio_paths.iter().map(|s| s.as_str()).collect();
    let loaded = load_layered_yaml(&path_refs)?;

    let policy = if args.strict_keys {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    report_unused_keys(&loaded.config_json, policy)?;

    let portfolio = loaded.portfolio()?;
    let contribution = args
        .contribution
        .or(portfolio.contribution)
        .context("no contribution: set `contribution:` in a portfolio file or pass --contribution")?;
    let decimals = args.decimals.or(portfolio.output.decimals);

    let inputs = cleanse_rows(&portfolio.assets)?;
    tracing::debug!(
        rows = portfolio.assets.len(),
        kept = inputs.len(),
        dropped = inputs.dropped.len(),
        portfolio_hash = %loaded.portfolio_hash,
        "portfolio rows cleansed"
    );

    let report = allocate_report(
        &inputs,
        contribution,
        decimals,
        Some(loaded.portfolio_hash.clone()),
    )?;
    print_report(&report, args.json)
}

//! Command handler modules for the `lazy` CLI.
//!
//! Shared report building and rendering live here.
//! Input sourcing lives in the submodules.

pub mod alloc;
pub mod plan;

use anyhow::{bail, Context, Result};
use lazy_alloc::{plan_contribution, round_deltas, AllocationPlan, MAX_DECIMALS};
use lazy_config::{CleanedInputs, DropReason};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AssetLine {
    pub asset: String,
    pub current_value: f64,
    pub target_fraction: f64,
    pub delta: f64,
    pub new_value: f64,
}

#[derive(Debug, Serialize)]
pub struct DroppedLine {
    pub asset: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct PlanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_hash: Option<String>,
    pub direction: &'static str,
    pub contribution: f64,
    pub portfolio_total: f64,
    pub funded_count: usize,
    pub asset_count: usize,
    pub final_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    pub assets: Vec<AssetLine>,
    pub dropped: Vec<DroppedLine>,
}

/// Run the allocator on cleansed inputs and shape the result for output.
pub fn allocate_report(
    inputs: &CleanedInputs,
    contribution: f64,
    decimals: Option<u32>,
    portfolio_hash: Option<String>,
) -> Result<PlanReport> {
    if let Some(d) = decimals {
        if d > MAX_DECIMALS {
            bail!("decimals must be at most {MAX_DECIMALS}, got {d}");
        }
    }

    let plan = plan_contribution(&inputs.current_values, &inputs.target_allocs, contribution)
        .context("allocation failed")?;

    tracing::info!(
        direction = plan.direction.as_str(),
        contribution,
        funded = plan.funded_count,
        assets = plan.len(),
        final_ratio = plan.final_ratio,
        "allocation planned"
    );

    Ok(build_report(inputs, &plan, contribution, decimals, portfolio_hash))
}

fn build_report(
    inputs: &CleanedInputs,
    plan: &AllocationPlan,
    contribution: f64,
    decimals: Option<u32>,
    portfolio_hash: Option<String>,
) -> PlanReport {
    let deltas = match decimals {
        Some(d) => round_deltas(&plan.deltas, d),
        None => plan.deltas.clone(),
    };

    let assets = inputs
        .labels
        .iter()
        .zip(&inputs.current_values)
        .zip(&inputs.target_allocs)
        .zip(&deltas)
        .map(|(((label, value), target), delta)| AssetLine {
            asset: label.clone(),
            current_value: *value,
            target_fraction: *target,
            delta: *delta,
            new_value: value + delta,
        })
        .collect();

    let dropped = inputs
        .dropped
        .iter()
        .map(|d| DroppedLine {
            asset: d.label.clone(),
            reason: match &d.reason {
                DropReason::Blank => "blank".to_string(),
                DropReason::NonNumeric(raw) => format!("non_numeric:{raw}"),
            },
        })
        .collect();

    PlanReport {
        portfolio_hash,
        direction: plan.direction.as_str(),
        contribution,
        portfolio_total: plan.portfolio_total,
        funded_count: plan.funded_count,
        asset_count: plan.len(),
        final_ratio: plan.final_ratio,
        decimals,
        assets,
        dropped,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn print_report(report: &PlanReport, json: bool) -> Result<()> {
    if json {
        let s = serde_json::to_string_pretty(report).context("serialize report json failed")?;
        println!("{s}");
        return Ok(());
    }

    if let Some(h) = &report.portfolio_hash {
        println!("portfolio_hash={h}");
    }
    println!(
        "direction={} contribution={} portfolio_total={} funded={}/{} final_ratio={}",
        report.direction,
        report.contribution,
        report.portfolio_total,
        report.funded_count,
        report.asset_count,
        report.final_ratio
    );
    for a in &report.assets {
        println!(
            "asset={} value={} target={} delta={} new_value={}",
            a.asset,
            a.current_value,
            a.target_fraction,
            fmt_amount(a.delta, report.decimals),
            fmt_amount(a.new_value, report.decimals)
        );
    }
    for d in &report.dropped {
        println!("dropped={} reason={}", d.asset, d.reason);
    }
    Ok(())
}

fn fmt_amount(v: f64, decimals: Option<u32>) -> String {
    match decimals {
        Some(d) => format!("{:.*}", d as usize, v),
        None => v.to_string(),
    }
}

/// Split an inline column keeping empty cells: "100,,250" → ["100", "", "250"].
///
/// Cells are separated by ';' when the column contains one, so amounts may keep
/// thousands separators ("$1,200;$800"). Otherwise ',' separates.
pub fn split_column(raw: &str) -> Vec<String> {
    let sep = if raw.contains(';') { ';' } else { ',' };
    raw.split(sep).map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_column_keeps_blank_cells() {
        assert_eq!(split_column("100,,250"), vec!["100", "", "250"]);
        assert_eq!(split_column(" 1 , 2 "), vec!["1", "2"]);
    }

    #[test]
    fn semicolon_column_keeps_thousands_separators() {
        assert_eq!(split_column("$1,200;;$800"), vec!["$1,200", "", "$800"]);
        assert_eq!(split_column("1,200;"), vec!["1,200", ""]);
    }

    #[test]
    fn fmt_amount_pads_to_decimals() {
        assert_eq!(fmt_amount(5.0, Some(2)), "5.00");
        assert_eq!(fmt_amount(705.88, Some(2)), "705.88");
        assert_eq!(fmt_amount(5.0, None), "5");
    }

    #[test]
    fn report_rounds_and_keeps_labels() {
        let inputs = CleanedInputs {
            labels: vec!["A".into(), "B".into()],
            current_values: vec![100.0, 200.0],
            target_allocs: vec![0.5, 0.5],
            dropped: vec![],
        };
        let r = allocate_report(&inputs, 110.0, Some(2), None).unwrap();
        assert_eq!(r.direction, "DEPOSIT");
        assert_eq!(r.assets[0].asset, "A");
        assert_eq!(r.assets[0].delta, 105.0);
        assert_eq!(r.assets[1].delta, 5.0);
        assert_eq!(r.funded_count, 2);
    }

    #[test]
    fn allocation_error_carries_context() {
        let inputs = CleanedInputs {
            labels: vec!["A".into()],
            current_values: vec![1.0],
            target_allocs: vec![],
            dropped: vec![],
        };
        let err = allocate_report(&inputs, 1.0, None, None).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("allocation failed"), "msg={msg}");
        assert!(msg.contains("shape mismatch"), "msg={msg}");
    }

    #[test]
    fn excess_decimals_are_rejected() {
        let inputs = CleanedInputs {
            labels: vec!["A".into(), "B".into()],
            current_values: vec![0.0, 100.0],
            target_allocs: vec![0.5, 0.5],
            dropped: vec![],
        };
        let err = allocate_report(&inputs, 10.0, Some(400), None).unwrap_err();
        assert!(err.to_string().contains("decimals must be at most 15"), "err={err}");

        let r = allocate_report(&inputs, 10.0, Some(MAX_DECIMALS), None).unwrap();
        assert_eq!(r.assets[0].delta, 10.0);
    }
}

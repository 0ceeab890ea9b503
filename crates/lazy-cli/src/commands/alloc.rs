//! `lazy alloc`: inline columns, cleansed the way a sheet range would be.

use anyhow::Result;
use lazy_config::cleanse_columns;

use super::{allocate_report, print_report, split_column};

pub fn run_alloc(
    values: &str,
    targets: &str,
    contribution: f64,
    decimals: Option<u32>,
    json: bool,
) -> Result<()> {
    let raw_values = split_column(values);
    let raw_targets = split_column(targets);
    let inputs = cleanse_columns(&raw_values, &raw_targets)?;

    tracing::debug!(
        raw = raw_values.len(),
        kept = inputs.len(),
        dropped = inputs.dropped.len(),
        "value column cleansed"
    );

    let report = allocate_report(&inputs, contribution, decimals, None)?;
    print_report(&report, json)
}

//! Row cleansing: raw sheet cells → aligned `current_values` / `target_allocs`.
//!
//! Two shapes are supported:
//! - Columns (`cleanse_columns`): a value column and a target column, as a
//!   spreadsheet range would hand them over. Blank value cells are removed and
//!   targets are then read index-for-index against the *cleaned* values, so a
//!   target column longer than the data is fine (extra cells are ignored).
//! - Rows (`cleanse_rows`): named holdings; a row with a blank value is dropped
//!   whole, keeping name and target aligned.
//!
//! Non-numeric value cells are dropped like blanks but logged at WARN.
//! Blank target cells read as 0 (the allocator floors them).

use anyhow::{bail, Result};

use crate::portfolio::{AssetRow, Cell};

/// Why a value cell did not reach the allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    Blank,
    NonNumeric(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCell {
    /// 0-based position in the raw input.
    pub position: usize,
    pub label: String,
    pub reason: DropReason,
}

/// Aligned allocator inputs.
///
/// `labels[i]` names the asset behind `current_values[i]` / `target_allocs[i]`:
/// the row name, or the 1-based raw row number in column mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedInputs {
    pub labels: Vec<String>,
    pub current_values: Vec<f64>,
    pub target_allocs: Vec<f64>,
    pub dropped: Vec<DroppedCell>,
}

impl CleanedInputs {
    pub fn len(&self) -> usize {
        self.current_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_values.is_empty()
    }
}

/// Parse a money-like cell: `1200`, ` 1,200.50 `, `$1,200`, `-$35`.
/// Returns `None` for blank or non-numeric text.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    let (neg, body) = match t.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, t),
    };
    let body = body.strip_prefix('$').unwrap_or(body);
    let digits: String = body.chars().filter(|c| *c != ',').collect();
    let v: f64 = digits.parse().ok()?;
    if !v.is_finite() {
        return None;
    }
    Some(if neg { -v } else { v })
}

/// Parse a target cell: `0.55`, `55%`, blank (= 0).
pub fn parse_fraction(raw: &str) -> Result<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(0.0);
    }
    if let Some(pct) = t.strip_suffix('%') {
        return match pct.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v / 100.0),
            _ => bail!("invalid target allocation '{}'", raw),
        };
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => bail!("invalid target allocation '{}'", raw),
    }
}

fn classify(raw: &str) -> std::result::Result<f64, DropReason> {
    if raw.trim().is_empty() {
        return Err(DropReason::Blank);
    }
    parse_amount(raw).ok_or_else(|| DropReason::NonNumeric(raw.to_string()))
}

fn value_cell(cell: Option<&Cell>) -> std::result::Result<f64, DropReason> {
    match cell {
        None => Err(DropReason::Blank),
        Some(Cell::Number(n)) if n.is_finite() => Ok(*n),
        Some(Cell::Text(s)) => classify(s),
        Some(other) => Err(DropReason::NonNumeric(other.raw())),
    }
}

fn target_cell(cell: Option<&Cell>) -> Result<f64> {
    match cell {
        None => Ok(0.0),
        Some(Cell::Number(n)) if n.is_finite() => Ok(*n),
        Some(Cell::Text(s)) => parse_fraction(s),
        Some(other) => bail!("invalid target allocation '{}'", other.raw()),
    }
}

fn log_drop(d: &DroppedCell) {
    match &d.reason {
        DropReason::Blank => {
            tracing::debug!(position = d.position, label = %d.label, "blank value cell dropped")
        }
        DropReason::NonNumeric(raw) => tracing::warn!(
            position = d.position,
            label = %d.label,
            raw = %raw,
            "non-numeric value cell dropped"
        ),
    }
}

/// Column-mode cleansing.
///
/// If fewer targets than cleaned values are supplied, the shorter target list
/// is returned as-is and the allocator reports the shape mismatch.
pub fn cleanse_columns(raw_values: &[String], raw_targets: &[String]) -> Result<CleanedInputs> {
    let mut out = CleanedInputs::default();

    for (position, raw) in raw_values.iter().enumerate() {
        let label = (position + 1).to_string();
        match classify(raw) {
            Ok(v) => {
                out.labels.push(label);
                out.current_values.push(v);
            }
            Err(reason) => {
                let d = DroppedCell {
                    position,
                    label,
                    reason,
                };
                log_drop(&d);
                out.dropped.push(d);
            }
        }
    }

    let keep = out.current_values.len().min(raw_targets.len());
    for raw in &raw_targets[..keep] {
        out.target_allocs.push(parse_fraction(raw)?);
    }
    if raw_targets.len() > keep {
        tracing::debug!(
            ignored = raw_targets.len() - keep,
            "trailing target cells ignored"
        );
    }

    Ok(out)
}

/// Row-mode cleansing for named holdings.
pub fn cleanse_rows(rows: &[AssetRow]) -> Result<CleanedInputs> {
    let mut out = CleanedInputs::default();

    for (position, row) in rows.iter().enumerate() {
        if row.name.trim().is_empty() {
            bail!("asset row {} has an empty name", position + 1);
        }
        match value_cell(row.value.as_ref()) {
            Ok(v) => {
                let target = target_cell(row.target.as_ref())
                    .map_err(|e| e.context(format!("asset '{}'", row.name)))?;
                out.labels.push(row.name.clone());
                out.current_values.push(v);
                out.target_allocs.push(target);
            }
            Err(reason) => {
                let d = DroppedCell {
                    position,
                    label: row.name.clone(),
                    reason,
                };
                log_drop(&d);
                out.dropped.push(d);
            }
        }
    }

    Ok(out)
}
